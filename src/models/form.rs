// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! The form root, its JSON wire format, and positional lookups.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::field::Field;
use super::path::{FieldLocation, SectionPath};
use super::section::Section;

/// Root of ownership for the whole section tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// Visitor verdict for [`Form::visit_sections`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Walk {
    Descend,
    SkipChildren,
}

impl Form {
    /// Parse a form from its JSON wire format.
    ///
    /// # Errors
    ///
    /// Returns an error when the text is not valid JSON or does not match the
    /// form shape. Nothing is modified on failure; callers keep their current form.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse form JSON")
    }

    /// Pretty-printed JSON used for file save, clipboard export, and the JSON view.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize form")
    }

    /// Starter configuration with a single empty section.
    pub fn sample() -> Self {
        let mut section = Section::new("User Details");
        section.object_name = "userDetails".into();
        Self {
            sections: vec![section],
        }
    }

    pub fn section(&self, path: &SectionPath) -> Option<&Section> {
        let (first, rest) = path.indices().split_first()?;
        let mut current = self.sections.get(*first)?;
        for idx in rest {
            current = current.nested_sections.get(*idx)?;
        }
        Some(current)
    }

    pub fn section_mut(&mut self, path: &SectionPath) -> Option<&mut Section> {
        let (first, rest) = path.indices().split_first()?;
        let mut current = self.sections.get_mut(*first)?;
        for idx in rest {
            current = current.nested_sections.get_mut(*idx)?;
        }
        Some(current)
    }

    /// The list that holds the section at `path` (the form root for top-level sections).
    pub fn siblings_mut(&mut self, path: &SectionPath) -> Option<&mut Vec<Section>> {
        match path.parent() {
            None if !path.is_empty() => Some(&mut self.sections),
            None => None,
            Some(parent) => self.section_mut(&parent).map(|s| &mut s.nested_sections),
        }
    }

    pub fn siblings(&self, path: &SectionPath) -> Option<&[Section]> {
        match path.parent() {
            None if !path.is_empty() => Some(&self.sections),
            None => None,
            Some(parent) => self.section(&parent).map(|s| s.nested_sections.as_slice()),
        }
    }

    pub fn field(&self, loc: &FieldLocation) -> Option<&Field> {
        self.section(&loc.section)?.fields.get(loc.index)
    }

    pub fn field_mut(&mut self, loc: &FieldLocation) -> Option<&mut Field> {
        self.section_mut(&loc.section)?.fields.get_mut(loc.index)
    }

    /// Visit every section in document order, letting the visitor prune subtrees.
    ///
    /// This is the single traversal used by visibility filtering, validation,
    /// serialization, and dependency analysis, so ordering and pruning rules
    /// live in one place.
    pub fn visit_sections<F>(&self, mut visit: F)
    where
        F: FnMut(&SectionPath, &Section) -> Walk,
    {
        fn walk<F>(sections: &[Section], prefix: &SectionPath, visit: &mut F)
        where
            F: FnMut(&SectionPath, &Section) -> Walk,
        {
            for (idx, section) in sections.iter().enumerate() {
                let path = if prefix.is_empty() {
                    SectionPath::root(idx)
                } else {
                    prefix.child(idx)
                };
                if visit(&path, section) == Walk::Descend {
                    walk(&section.nested_sections, &path, visit);
                }
            }
        }

        walk(&self.sections, &SectionPath::default(), &mut visit);
    }

    /// First field with `name` in document order.
    pub fn find_field(&self, name: &str) -> Option<FieldLocation> {
        let mut found = None;
        self.visit_sections(|path, section| {
            if found.is_some() {
                return Walk::SkipChildren;
            }
            if let Some(index) = section.field_index(name) {
                found = Some(FieldLocation::new(path.clone(), index));
                return Walk::SkipChildren;
            }
            Walk::Descend
        });
        found
    }

    /// Every section path in document order.
    pub fn section_paths(&self) -> Vec<SectionPath> {
        let mut paths = Vec::new();
        self.visit_sections(|path, _| {
            paths.push(path.clone());
            Walk::Descend
        });
        paths
    }

    /// All field names in document order, including duplicates.
    pub fn field_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.visit_sections(|_, section| {
            names.extend(section.fields.iter().map(|f| f.name.clone()));
            Walk::Descend
        });
        names
    }

    pub fn contains_field_name(&self, name: &str) -> bool {
        self.find_field(name).is_some()
    }

    /// Path of the section carrying `id`.
    pub fn find_section_by_id(&self, id: &str) -> Option<SectionPath> {
        let mut found = None;
        self.visit_sections(|path, section| {
            if found.is_none() && section.id == id {
                found = Some(path.clone());
            }
            if found.is_some() {
                Walk::SkipChildren
            } else {
                Walk::Descend
            }
        });
        found
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::field::{Choices, FieldKind, GridColumn, GridSpec, ColumnType, NumberRules, TextRules, Bound};

    fn rich_form() -> Form {
        let mut account = Section::new("Account");
        account.object_name = "acct".into();
        let mut balance = Field::new("balance", FieldKind::Number(NumberRules {
            min: Some(Bound::Number(0.into())),
            max: Some(Bound::Text("1000".into())),
        }));
        balance.required = true;
        account.fields.push(balance);
        account.fields.push(Field::new(
            "kind",
            FieldKind::Dropdown(Choices {
                options: vec!["savings".into(), "checking".into()],
            }),
        ));

        let mut sub = Section::nested_in(&account, "Sub-section 1");
        sub.condition_field = Some("kind".into());
        sub.condition_value = Some("savings".into());
        sub.fields.push(Field::new(
            "currency",
            FieldKind::Text(TextRules {
                pattern: Some("^[A-Z]{3}$".into()),
                ..TextRules::default()
            }),
        ));
        sub.fields.push(Field::new(
            "items",
            FieldKind::Grid(GridSpec {
                columns: vec![
                    GridColumn::new("Item", ColumnType::Text),
                    GridColumn::new("Quantity", ColumnType::Number),
                ],
                default_rows: Some(2),
            }),
        ));
        account.nested_sections.push(sub);

        let mut extras = Section::new("Extras");
        extras.fields.push(Field::new("agree", FieldKind::Checkbox));
        Form {
            sections: vec![account, extras],
        }
    }

    // Serialize then parse yields the same tree.
    #[test]
    fn json_round_trip_preserves_tree() {
        let form = rich_form();
        let json = form.to_json_pretty().unwrap();
        let parsed = Form::from_json(&json).unwrap();
        assert_eq!(parsed, form);
        assert_eq!(parsed.to_json_pretty().unwrap(), json);
    }

    #[test]
    fn parses_wire_format_and_fills_defaults() {
        let json = json!({
            "sections": [{
                "id": "section_1",
                "name": "User Details",
                "objectName": "userDetails",
                "fields": [
                    { "name": "first", "type": "text", "label": "First" },
                    { "name": "born", "type": "date", "label": "Born", "min": "1900-01-01" }
                ],
                "nestedSections": [{
                    "id": "section_2",
                    "name": "Sub",
                    "objectName": "",
                    "fields": [],
                    "isSubSection": true,
                    "parentId": "section_1"
                }]
            }]
        })
        .to_string();

        let form = Form::from_json(&json).unwrap();
        assert_eq!(form.sections.len(), 1);
        let top = &form.sections[0];
        assert_eq!(top.fields.len(), 2);
        assert!(!top.fields[0].required);
        assert_eq!(top.nested_sections[0].parent_id.as_deref(), Some("section_1"));
        assert!(top.nested_sections[0].is_sub_section);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = Form::from_json("{ \"sections\": [ { \"fields\": 3 } ] }").unwrap_err();
        assert!(err.to_string().contains("Failed to parse form JSON"));
    }

    #[test]
    fn lookups_follow_paths() {
        let form = rich_form();
        let sub = SectionPath::root(0).child(0);
        assert_eq!(form.section(&sub).map(|s| s.name.as_str()), Some("Sub-section 1"));
        assert!(form.section(&SectionPath::root(0).child(5)).is_none());
        assert_eq!(
            form.find_field("currency"),
            Some(FieldLocation::new(sub.clone(), 0))
        );
        assert_eq!(form.find_field("missing"), None);
        assert_eq!(
            form.field_names(),
            vec!["balance", "kind", "currency", "items", "agree"]
        );
        assert_eq!(form.siblings(&sub).map(|s| s.len()), Some(1));
        let id = form.sections[1].id.clone();
        assert_eq!(form.find_section_by_id(&id), Some(SectionPath::root(1)));
    }

    #[test]
    fn visit_can_prune_subtrees() {
        let form = rich_form();
        let mut seen = Vec::new();
        form.visit_sections(|path, section| {
            seen.push(section.name.clone());
            if path.top() == Some(0) {
                Walk::SkipChildren
            } else {
                Walk::Descend
            }
        });
        assert_eq!(seen, vec!["Account", "Extras"]);
    }
}
