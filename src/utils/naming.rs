// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Derive display labels and serialization keys from user-provided names.

/// Turn a generated or technical field name into a readable label.
///
/// # Steps
/// - Split camelCase humps, `_` separators, and digit runs into words.
/// - Drop a trailing all-digit word (the timestamp of generated names).
/// - Capitalize the first letter of every word.
///
/// `text_1712345678901` becomes `Text`, `firstName` becomes `First Name`.
/// Falls back to the input when nothing readable remains.
pub fn label_from_name(name: &str) -> String {
    let mut spaced = String::with_capacity(name.len() + 8);
    let mut in_digits = false;

    for ch in name.chars() {
        if ch.is_ascii_digit() {
            if !in_digits {
                spaced.push(' ');
            }
            spaced.push(ch);
            in_digits = true;
            continue;
        }
        if in_digits && ch.is_alphabetic() {
            spaced.push(' ');
        }
        in_digits = false;
        if ch == '_' {
            spaced.push(' ');
        } else if ch.is_uppercase() {
            spaced.push(' ');
            spaced.push(ch);
        } else {
            spaced.push(ch);
        }
    }

    let mut words: Vec<&str> = spaced.split_whitespace().collect();
    if words.len() > 1
        && words
            .last()
            .is_some_and(|w| w.chars().all(|c| c.is_ascii_digit()))
    {
        words.pop();
    }

    let label = words
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    if label.is_empty() {
        name.to_string()
    } else {
        label
    }
}

/// Produce a camelCase object key from a section heading.
///
/// # Steps
/// - Transliterate Unicode to ASCII with `deunicode` (e.g., "Å" → "A").
/// - Treat every non-alphanumeric character as a word break.
/// - Lowercase the first word, capitalize the rest, and join.
/// - Prefix `_` when the key would start with a digit.
///
/// Returns an empty string when the heading has no usable characters; callers
/// then fall back to the heading itself or a positional key.
pub fn object_name_from(heading: &str) -> String {
    let transliterated = deunicode::deunicode(heading);
    let mut out = String::with_capacity(transliterated.len());

    for (idx, word) in transliterated
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .enumerate()
    {
        let lower = word.to_ascii_lowercase();
        if idx == 0 {
            out.push_str(&lower);
        } else {
            let mut chars = lower.chars();
            if let Some(first) = chars.next() {
                out.push(first.to_ascii_uppercase());
                out.extend(chars);
            }
        }
    }

    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{label_from_name, object_name_from};

    // Generated names lose their timestamp suffix.
    #[test]
    fn label_drops_generated_timestamp() {
        assert_eq!(label_from_name("text_1712345678901"), "Text");
        assert_eq!(label_from_name("dropdown_1712345678901"), "Dropdown");
    }

    // camelCase and snake_case split into capitalized words.
    #[test]
    fn label_splits_camel_and_snake_case() {
        assert_eq!(label_from_name("firstName"), "First Name");
        assert_eq!(label_from_name("zip_code"), "Zip Code");
        assert_eq!(label_from_name("line2address"), "Line 2 Address");
        assert_eq!(label_from_name("address2Line"), "Address 2 Line");
    }

    // A lone number is kept rather than erased.
    #[test]
    fn label_keeps_single_numeric_word() {
        assert_eq!(label_from_name("42"), "42");
        assert_eq!(label_from_name(""), "");
    }

    #[test]
    fn object_name_is_camel_case() {
        assert_eq!(object_name_from("User Details"), "userDetails");
        assert_eq!(object_name_from("Section 3"), "section3");
        assert_eq!(object_name_from("  billing--ADDRESS "), "billingAddress");
    }

    #[test]
    fn object_name_transliterates_and_guards_leading_digit() {
        assert_eq!(object_name_from("Größe & Maße"), "grosseMasse");
        assert_eq!(object_name_from("2nd contact"), "_2ndContact");
        assert_eq!(object_name_from("!!!"), "");
    }
}
