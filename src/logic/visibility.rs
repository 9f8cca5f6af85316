// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Conditional section visibility.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::models::{Form, Section, SectionPath, Walk};

/// Evaluate a section's own condition against the current values.
///
/// Only the section itself is considered; ancestor visibility is the caller's
/// job, which [`visit_visible_sections`] takes care of.
///
/// Comparison order: string/string exact match, then boolean (condition parsed
/// case-insensitively as `true`), then number (condition parsed as a float),
/// then both sides stringified.
pub fn is_section_visible(section: &Section, values: &BTreeMap<String, Value>) -> bool {
    let Some((field, expected)) = section.condition() else {
        return true;
    };
    matches_condition(values.get(field), expected)
}

fn matches_condition(actual: Option<&Value>, expected: &str) -> bool {
    match actual {
        Some(Value::String(s)) => s == expected,
        Some(Value::Bool(b)) => *b == expected.eq_ignore_ascii_case("true"),
        Some(Value::Number(n)) => match (n.as_f64(), parse_float_prefix(expected)) {
            (Some(lhs), Some(rhs)) => lhs == rhs,
            _ => false,
        },
        Some(other) => stringify(other) == expected,
        None => expected == "undefined",
    }
}

/// Leading-float parse: `"12abc"` reads as 12, blank or non-numeric text as no number.
fn parse_float_prefix(raw: &str) -> Option<f64> {
    let trimmed = raw.trim_start();
    if let Ok(v) = trimmed.trim_end().parse::<f64>() {
        return Some(v);
    }
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (idx, ch) in trimmed.char_indices() {
        match ch {
            '+' | '-' if idx == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = idx + ch.len_utf8();
    }
    if !seen_digit {
        return None;
    }
    trimmed[..end].parse::<f64>().ok()
}

fn stringify(value: &Value) -> String {
    match value {
        Value::Null => "null".into(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".into(),
        other => other.to_string(),
    }
}

/// Visit visible sections in document order.
///
/// A hidden section prunes its whole subtree, so a nested section is never
/// reported visible under a hidden ancestor, whatever its own condition says.
pub fn visit_visible_sections<F>(form: &Form, values: &BTreeMap<String, Value>, mut visit: F)
where
    F: FnMut(&SectionPath, &Section),
{
    form.visit_sections(|path, section| {
        if is_section_visible(section, values) {
            visit(path, section);
            Walk::Descend
        } else {
            Walk::SkipChildren
        }
    });
}

/// Paths of all currently visible sections.
pub fn visible_section_paths(form: &Form, values: &BTreeMap<String, Value>) -> Vec<SectionPath> {
    let mut paths = Vec::new();
    visit_visible_sections(form, values, |path, _| paths.push(path.clone()));
    paths
}

/// Whether the section at `path` and every ancestor are visible.
pub fn is_path_visible(form: &Form, path: &SectionPath, values: &BTreeMap<String, Value>) -> bool {
    let indices = path.indices();
    if indices.is_empty() {
        return false;
    }
    (1..=indices.len()).all(|len| {
        form.section(&SectionPath::new(indices[..len].to_vec()))
            .is_some_and(|s| is_section_visible(s, values))
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn conditional(field: &str, value: &str) -> Section {
        let mut section = Section::new("Conditional");
        section.condition_field = Some(field.into());
        section.condition_value = Some(value.into());
        section
    }

    fn values(pairs: &[(&str, Value)]) -> BTreeMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn unconditioned_section_is_visible() {
        assert!(is_section_visible(&Section::new("Plain"), &BTreeMap::new()));
    }

    #[test]
    fn string_values_match_exactly() {
        let section = conditional("answer", "yes");
        assert!(is_section_visible(&section, &values(&[("answer", json!("yes"))])));
        assert!(!is_section_visible(&section, &values(&[("answer", json!("Yes"))])));
        assert!(!is_section_visible(&section, &BTreeMap::new()));
    }

    #[test]
    fn booleans_parse_condition_case_insensitively() {
        let section = conditional("agree", "TRUE");
        assert!(is_section_visible(&section, &values(&[("agree", json!(true))])));
        assert!(!is_section_visible(&section, &values(&[("agree", json!(false))])));

        let unchecked = conditional("agree", "false");
        assert!(is_section_visible(&unchecked, &values(&[("agree", json!(false))])));
    }

    #[test]
    fn numbers_compare_as_floats() {
        let section = conditional("count", "3.0");
        assert!(is_section_visible(&section, &values(&[("count", json!(3))])));
        assert!(!is_section_visible(&section, &values(&[("count", json!(4))])));

        let prefix = conditional("count", "12 items");
        assert!(is_section_visible(&prefix, &values(&[("count", json!(12))])));

        let text = conditional("count", "many");
        assert!(!is_section_visible(&text, &values(&[("count", json!(12))])));
    }

    #[test]
    fn other_values_compare_stringified() {
        let section = conditional("tags", "a,b");
        assert!(is_section_visible(&section, &values(&[("tags", json!(["a", "b"]))])));
        let null = conditional("gone", "null");
        assert!(is_section_visible(&null, &values(&[("gone", Value::Null)])));
    }

    // A hidden ancestor hides every descendant.
    #[test]
    fn hidden_ancestor_hides_unconditioned_child() {
        let mut parent = conditional("x", "yes");
        let child = Section::nested_in(&parent, "Child");
        parent.nested_sections.push(child);
        let form = Form {
            sections: vec![parent],
        };
        let vals = values(&[("x", json!("no"))]);

        assert!(is_section_visible(&form.sections[0].nested_sections[0], &vals));
        assert!(!is_path_visible(&form, &SectionPath::root(0).child(0), &vals));
        assert!(visible_section_paths(&form, &vals).is_empty());

        let shown = values(&[("x", json!("yes"))]);
        assert_eq!(
            visible_section_paths(&form, &shown),
            vec![SectionPath::root(0), SectionPath::root(0).child(0)]
        );
    }
}
