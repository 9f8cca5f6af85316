// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Rebuild nested, object-keyed output from the flat runtime values.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

use super::validation::{ValidationReport, validate_and_mark};
use super::visibility::visit_visible_sections;
use crate::models::{Form, FormState, GridValue, Section, SectionPath};

/// Payload handed to the submission collaborator.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub raw_values: Value,
    pub structured_data: Value,
}

/// Key a section's data lives under: its object key, else a positional fallback.
fn section_key(path: &SectionPath, section: &Section) -> String {
    match section.object_key() {
        Some(key) => key.to_string(),
        None if path.depth() == 0 => format!("section_{}", path.last().unwrap_or_default()),
        None => format!("nested_section_{}", path.last().unwrap_or_default()),
    }
}

/// Walk down `keys`, creating (or replacing non-object values with) empty objects.
fn object_at<'a>(root: &'a mut Map<String, Value>, keys: &[String]) -> Option<&'a mut Map<String, Value>> {
    let mut current = root;
    for key in keys {
        let slot = current
            .entry(key.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        current = slot.as_object_mut()?;
    }
    Some(current)
}

fn write_fields(
    target: &mut Map<String, Value>,
    section: &Section,
    form_values: &BTreeMap<String, Value>,
    grid_values: &BTreeMap<String, GridValue>,
) {
    for field in section.fields.iter().filter(|f| !f.name.is_empty()) {
        if field.is_grid() {
            let rows = grid_values
                .get(&field.name)
                .map(GridValue::rows_as_json)
                .unwrap_or_else(|| Value::Array(Vec::new()));
            target.insert(field.name.clone(), rows);
        } else if let Some(value) = form_values.get(&field.name).filter(|v| !v.is_null()) {
            target.insert(field.name.clone(), value.clone());
        }
    }
}

/// Nested output for every visible section.
///
/// Each section gets an object under its key inside its parent's object; a
/// sub-section has no object of its own and writes into its parent's. Hidden
/// sections and everything below them are left out, whatever values they hold.
pub fn build_structured_data(
    form: &Form,
    form_values: &BTreeMap<String, Value>,
    grid_values: &BTreeMap<String, GridValue>,
) -> Value {
    let mut root = Map::new();
    let mut destinations: HashMap<SectionPath, Vec<String>> = HashMap::new();

    visit_visible_sections(form, form_values, |path, section| {
        let parent_dest = path.parent().and_then(|p| destinations.get(&p).cloned());
        let dest = match parent_dest {
            Some(parent) if section.is_sub_section => parent,
            Some(mut parent) => {
                parent.push(section_key(path, section));
                reset_object(&mut root, &parent);
                parent
            }
            None => {
                let dest = vec![section_key(path, section)];
                reset_object(&mut root, &dest);
                dest
            }
        };
        if let Some(target) = object_at(&mut root, &dest) {
            write_fields(target, section, form_values, grid_values);
        }
        destinations.insert(path.clone(), dest);
    });

    Value::Object(root)
}

/// A later section with the same key replaces the earlier one's object.
fn reset_object(root: &mut Map<String, Value>, keys: &[String]) {
    let Some((last, parents)) = keys.split_last() else {
        return;
    };
    if let Some(parent) = object_at(root, parents) {
        parent.insert(last.clone(), Value::Object(Map::new()));
    }
}

/// Validate (marking every visible field touched), then build the payload.
///
/// # Errors
///
/// Returns the failing report when any visible field is invalid; nothing is built.
pub fn submit(form: &Form, state: &mut FormState) -> Result<Submission, ValidationReport> {
    let report = validate_and_mark(form, state);
    if !report.valid {
        info!(errors = report.errors.len(), "Submission blocked by validation");
        return Err(report);
    }
    let raw_values = Value::Object(
        state
            .form_values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
    );
    let structured_data = build_structured_data(form, &state.form_values, &state.grid_values);
    info!("Form submitted");
    Ok(Submission {
        raw_values,
        structured_data,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::{ColumnType, Field, FieldKind, GridColumn, GridSpec, TextRules};

    fn text(name: &str) -> Field {
        Field::new(name, FieldKind::Text(TextRules::default()))
    }

    fn values(pairs: &[(&str, Value)]) -> BTreeMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    // Sub-section fields land in the parent's object.
    #[test]
    fn sub_section_merges_into_parent() {
        let mut parent = Section::new("Parent");
        parent.object_name = "p".into();
        parent.fields.push(text("a"));
        let mut sub = Section::nested_in(&parent, "Sub");
        sub.fields.push(text("b"));
        parent.nested_sections.push(sub);
        let form = Form {
            sections: vec![parent],
        };

        let data = build_structured_data(
            &form,
            &values(&[("a", json!(1)), ("b", json!(2))]),
            &BTreeMap::new(),
        );
        assert_eq!(data, json!({ "p": { "a": 1, "b": 2 } }));
    }

    // Nested, non-sub sections get their own key; missing keys fall back positionally.
    #[test]
    fn nested_section_gets_own_object() {
        let mut parent = Section::new("Parent");
        parent.object_name = "p".into();
        let mut nested = Section::nested_in(&parent, "Child");
        nested.is_sub_section = false;
        nested.object_name = "c".into();
        nested.fields.push(text("x"));
        let mut unnamed = Section::nested_in(&parent, "");
        unnamed.is_sub_section = false;
        unnamed.object_name.clear();
        unnamed.fields.push(text("y"));
        parent.nested_sections.push(nested);
        parent.nested_sections.push(unnamed);

        let mut anonymous = Section::new("");
        anonymous.object_name.clear();
        anonymous.fields.push(text("z"));

        let form = Form {
            sections: vec![parent, anonymous],
        };
        let data = build_structured_data(
            &form,
            &values(&[("x", json!("v")), ("y", json!("w")), ("z", json!("q"))]),
            &BTreeMap::new(),
        );
        assert_eq!(
            data,
            json!({
                "p": { "c": { "x": "v" }, "nested_section_1": { "y": "w" } },
                "section_1": { "z": "q" }
            })
        );
    }

    // Values left behind in a hidden section never reach the output.
    #[test]
    fn hidden_section_values_are_excluded() {
        let mut gate = Section::new("Gate");
        gate.object_name = "gate".into();
        gate.fields.push(text("mode"));
        let mut extra = Section::new("Extra");
        extra.object_name = "extra".into();
        extra.condition_field = Some("mode".into());
        extra.condition_value = Some("advanced".into());
        extra.fields.push(text("level"));
        let form = Form {
            sections: vec![gate, extra],
        };

        let shown = values(&[("mode", json!("advanced")), ("level", json!("9"))]);
        assert_eq!(
            build_structured_data(&form, &shown, &BTreeMap::new()),
            json!({ "gate": { "mode": "advanced" }, "extra": { "level": "9" } })
        );

        let hidden = values(&[("mode", json!("basic")), ("level", json!("9"))]);
        assert_eq!(
            build_structured_data(&form, &hidden, &BTreeMap::new()),
            json!({ "gate": { "mode": "basic" } })
        );
    }

    #[test]
    fn grids_emit_rows_and_nulls_are_skipped() {
        let mut section = Section::new("Order");
        section.fields.push(Field::new(
            "items",
            FieldKind::Grid(GridSpec {
                columns: vec![GridColumn::new("Item", ColumnType::Text)],
                default_rows: None,
            }),
        ));
        section.fields.push(Field::new(
            "lines",
            FieldKind::Grid(GridSpec::default()),
        ));
        section.fields.push(text("note"));
        let form = Form {
            sections: vec![section],
        };
        let mut grids = BTreeMap::new();
        grids.insert(
            "items".to_string(),
            GridValue {
                rows: vec![json!({ "Item": "bolt" }).as_object().cloned().unwrap()],
            },
        );

        let data = build_structured_data(&form, &values(&[("note", Value::Null)]), &grids);
        assert_eq!(
            data,
            json!({ "order": { "items": [{ "Item": "bolt" }], "lines": [] } })
        );
    }

    #[test]
    fn submit_builds_payload_only_when_valid() {
        let mut section = Section::new("Contact");
        let mut email = text("email");
        email.required = true;
        section.fields.push(email);
        let form = Form {
            sections: vec![section],
        };
        let mut state = FormState::for_form(&form, 1);

        let report = submit(&form, &mut state).unwrap_err();
        assert!(!report.valid);

        state.handle_change("email", json!("a@b.c"));
        let submission = submit(&form, &mut state).unwrap();
        assert_eq!(submission.raw_values, json!({ "email": "a@b.c" }));
        assert_eq!(
            submission.structured_data,
            json!({ "contact": { "email": "a@b.c" } })
        );
        let payload = serde_json::to_value(&submission).unwrap();
        assert!(payload.get("rawValues").is_some());
        assert!(payload.get("structuredData").is_some());
    }
}
