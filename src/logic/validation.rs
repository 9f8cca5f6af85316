// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Per-field validation and the submit-time validation pass.

use std::collections::BTreeMap;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use time::Date;
use time::macros::format_description;
use tracing::warn;

use super::visibility::visit_visible_sections;
use crate::models::{
    DateRules, Field, FieldKind, Form, FormState, GridSpec, GridValue, NumberRules, TextRules,
};

pub const REQUIRED_MESSAGE: &str = "This field is required";

/// Outcome of a validation pass over the visible fields.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    /// Failing fields and their first error message.
    pub errors: BTreeMap<String, String>,
    /// Every visible field that was checked, in document order.
    #[serde(skip)]
    pub checked: Vec<String>,
}

fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        _ => false,
    }
}

/// Validate one field. Returns the first failing rule's message.
///
/// Rule order: required, then the kind's own rules. An empty value on an
/// optional field skips the remaining rules.
pub fn validate_field_value(
    field: &Field,
    value: Option<&Value>,
    grid: Option<&GridValue>,
) -> Option<String> {
    let empty = match &field.kind {
        FieldKind::Grid(_) => grid.is_none_or(|g| g.rows.is_empty()),
        FieldKind::Checkbox => is_empty_value(value) || value == Some(&Value::Bool(false)),
        _ => is_empty_value(value),
    };
    if empty {
        return field.required.then(|| REQUIRED_MESSAGE.to_string());
    }

    match &field.kind {
        FieldKind::Text(rules) | FieldKind::Textarea(rules) => value.and_then(|v| check_text(rules, v)),
        FieldKind::Number(rules) => value.and_then(|v| check_number(rules, v)),
        FieldKind::Date(rules) => value.and_then(|v| check_date(rules, v)),
        FieldKind::Dropdown(choices) | FieldKind::Radio(choices) => {
            let picked = value.map(as_text).unwrap_or_default();
            (!choices.options.is_empty() && !choices.options.contains(&picked))
                .then(|| "Select one of the available options".to_string())
        }
        FieldKind::Checkbox => None,
        FieldKind::Grid(spec) => grid.and_then(|g| check_grid(spec, g)),
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn check_text(rules: &TextRules, value: &Value) -> Option<String> {
    let text = as_text(value);
    let len = text.chars().count();
    if let Some(min) = rules.min_length.as_ref().and_then(|b| b.as_len())
        && len < min
    {
        return Some(format!("Minimum length is {min} characters"));
    }
    if let Some(max) = rules.max_length.as_ref().and_then(|b| b.as_len())
        && len > max
    {
        return Some(format!("Maximum length is {max} characters"));
    }
    if let Some(pattern) = rules.pattern.as_deref().filter(|p| !p.is_empty()) {
        match Regex::new(pattern) {
            Ok(re) if !re.is_match(&text) => return Some("Invalid format".to_string()),
            Ok(_) => {}
            Err(err) => warn!(pattern, error = %err, "Ignoring invalid validation pattern"),
        }
    }
    None
}

fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

fn check_number(rules: &NumberRules, value: &Value) -> Option<String> {
    let Some(number) = parse_number(value) else {
        return Some("Must be a valid number".to_string());
    };
    if let Some(min) = &rules.min
        && min.as_f64().is_some_and(|m| number < m)
    {
        return Some(format!("Minimum value is {min}"));
    }
    if let Some(max) = &rules.max
        && max.as_f64().is_some_and(|m| number > m)
    {
        return Some(format!("Maximum value is {max}"));
    }
    None
}

/// Parse a plain `YYYY-MM-DD` calendar date.
pub fn parse_iso_date(raw: &str) -> Option<Date> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]")).ok()
}

fn check_date(rules: &DateRules, value: &Value) -> Option<String> {
    let Some(date) = value.as_str().and_then(parse_iso_date) else {
        return Some("Must be a valid date (YYYY-MM-DD)".to_string());
    };
    if let Some(min) = rules.min.as_deref()
        && parse_iso_date(min).is_some_and(|m| date < m)
    {
        return Some(format!("Date must be on or after {}", min.trim()));
    }
    if let Some(max) = rules.max.as_deref()
        && parse_iso_date(max).is_some_and(|m| date > m)
    {
        return Some(format!("Date must be on or before {}", max.trim()));
    }
    None
}

fn check_grid(spec: &GridSpec, grid: &GridValue) -> Option<String> {
    for (row_idx, row) in grid.rows.iter().enumerate() {
        for column in spec.columns.iter().filter(|c| c.required) {
            let cell = row.get(&column.name);
            let missing = is_empty_value(cell) || cell == Some(&Value::Bool(false));
            if missing {
                return Some(format!("Row {}: {} is required", row_idx + 1, column.name));
            }
        }
    }
    None
}

/// Validate every field of every visible section.
pub fn validate_form(
    form: &Form,
    form_values: &BTreeMap<String, Value>,
    grid_values: &BTreeMap<String, GridValue>,
) -> ValidationReport {
    let mut report = ValidationReport {
        valid: true,
        ..ValidationReport::default()
    };
    visit_visible_sections(form, form_values, |_, section| {
        for field in section.fields.iter().filter(|f| !f.name.is_empty()) {
            report.checked.push(field.name.clone());
            let message = validate_field_value(
                field,
                form_values.get(&field.name),
                grid_values.get(&field.name),
            );
            if let Some(message) = message {
                report.valid = false;
                report.errors.insert(field.name.clone(), message);
            }
        }
    });
    report
}

/// Run [`validate_form`] and fold the result into the runtime state: every
/// checked field becomes touched, failures are recorded, passes are cleared.
pub fn validate_and_mark(form: &Form, state: &mut FormState) -> ValidationReport {
    let report = validate_form(form, &state.form_values, &state.grid_values);
    for name in &report.checked {
        state.touched.insert(name.clone());
        match report.errors.get(name) {
            Some(message) => {
                state.errors.insert(name.clone(), message.clone());
            }
            None => {
                state.errors.remove(name);
            }
        }
    }
    report
}
