// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Field definitions and their JSON shape.
//!
//! A field is a set of common attributes plus a [`FieldKind`] discriminated by the
//! `"type"` key. Each kind carries only its own attributes, so every consumer
//! (validation, rendering, serialization) matches exhaustively on the kind.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use super::is_false;
use crate::utils::label_from_name;

/// Field kinds offered by the palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldType {
    Text,
    Textarea,
    Number,
    Dropdown,
    Radio,
    Checkbox,
    Date,
    Grid,
}

impl FieldType {
    pub const ALL: [FieldType; 8] = [
        Self::Text,
        Self::Textarea,
        Self::Number,
        Self::Dropdown,
        Self::Radio,
        Self::Checkbox,
        Self::Date,
        Self::Grid,
    ];

    /// Map a palette/wire token to its kind. Unknown tokens yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "text" => Some(Self::Text),
            "textarea" => Some(Self::Textarea),
            "number" => Some(Self::Number),
            "dropdown" => Some(Self::Dropdown),
            "radio" => Some(Self::Radio),
            "checkbox" => Some(Self::Checkbox),
            "date" => Some(Self::Date),
            "grid" => Some(Self::Grid),
            _ => None,
        }
    }

    /// String form used in JSON and generated names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Number => "number",
            Self::Dropdown => "dropdown",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
            Self::Date => "date",
            Self::Grid => "grid",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric limit that may be stored either as a JSON number or as a string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bound {
    Number(Number),
    Text(String),
}

impl Bound {
    /// Numeric value of the bound; blank or unparsable strings mean "no bound".
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Bound::Number(n) => n.as_f64(),
            Bound::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
                }
            }
        }
    }

    /// Non-negative integer view, used for length limits.
    pub fn as_len(&self) -> Option<usize> {
        self.as_f64()
            .filter(|v| *v >= 0.0)
            .map(|v| v.floor() as usize)
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Number(n) => write!(f, "{n}"),
            Bound::Text(s) => f.write_str(s.trim()),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<Bound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<Bound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Bound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Bound>,
}

/// Option list for dropdowns and radios. Order is significant.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choices {
    #[serde(default)]
    pub options: Vec<String>,
}

/// Calendar limits as ISO `YYYY-MM-DD` strings (plain dates, no time zone).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
}

/// Column kinds a grid may hold. There is no grid variant, so grids never nest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Textarea,
    Number,
    Dropdown,
    Radio,
    Checkbox,
    Date,
}

impl From<ColumnType> for FieldType {
    fn from(value: ColumnType) -> Self {
        match value {
            ColumnType::Text => FieldType::Text,
            ColumnType::Textarea => FieldType::Textarea,
            ColumnType::Number => FieldType::Number,
            ColumnType::Dropdown => FieldType::Dropdown,
            ColumnType::Radio => FieldType::Radio,
            ColumnType::Checkbox => FieldType::Checkbox,
            ColumnType::Date => FieldType::Date,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridColumn {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ColumnType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl GridColumn {
    pub fn new(name: impl Into<String>, kind: ColumnType) -> Self {
        Self {
            name: name.into(),
            kind,
            options: None,
            required: false,
            placeholder: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSpec {
    #[serde(default)]
    pub columns: Vec<GridColumn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_rows: Option<u32>,
}

/// Type-specific attributes, tagged by `"type"` in the JSON.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    Text(TextRules),
    Textarea(TextRules),
    Number(NumberRules),
    Dropdown(Choices),
    Radio(Choices),
    Checkbox,
    Date(DateRules),
    Grid(GridSpec),
}

impl FieldKind {
    /// Fresh attributes for a newly created field. Grids start with `seed_columns`.
    pub fn for_type(field_type: FieldType, seed_columns: &[GridColumn]) -> Self {
        match field_type {
            FieldType::Text => Self::Text(TextRules::default()),
            FieldType::Textarea => Self::Textarea(TextRules::default()),
            FieldType::Number => Self::Number(NumberRules::default()),
            FieldType::Dropdown => Self::Dropdown(Choices::default()),
            FieldType::Radio => Self::Radio(Choices::default()),
            FieldType::Checkbox => Self::Checkbox,
            FieldType::Date => Self::Date(DateRules::default()),
            FieldType::Grid => Self::Grid(GridSpec {
                columns: seed_columns.to_vec(),
                default_rows: None,
            }),
        }
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            Self::Text(_) => FieldType::Text,
            Self::Textarea(_) => FieldType::Textarea,
            Self::Number(_) => FieldType::Number,
            Self::Dropdown(_) => FieldType::Dropdown,
            Self::Radio(_) => FieldType::Radio,
            Self::Checkbox => FieldType::Checkbox,
            Self::Date(_) => FieldType::Date,
            Self::Grid(_) => FieldType::Grid,
        }
    }
}

/// A single form field: common attributes plus its kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Data key and dependency target; unique across the whole form.
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl Field {
    /// Build a field with type-appropriate defaults and a label derived from `name`.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        let label = match kind {
            FieldKind::Grid(_) => "Data Grid".to_string(),
            _ => label_from_name(&name),
        };
        Self {
            name,
            label,
            placeholder: None,
            tooltip: None,
            required: false,
            default_value: None,
            kind,
        }
    }

    pub fn field_type(&self) -> FieldType {
        self.kind.field_type()
    }

    pub fn is_grid(&self) -> bool {
        matches!(self.kind, FieldKind::Grid(_))
    }

    pub fn grid(&self) -> Option<&GridSpec> {
        match &self.kind {
            FieldKind::Grid(spec) => Some(spec),
            _ => None,
        }
    }

    pub fn grid_mut(&mut self) -> Option<&mut GridSpec> {
        match &mut self.kind {
            FieldKind::Grid(spec) => Some(spec),
            _ => None,
        }
    }

    /// Options for dropdown/radio fields, empty for everything else.
    pub fn options(&self) -> &[String] {
        match &self.kind {
            FieldKind::Dropdown(c) | FieldKind::Radio(c) => &c.options,
            _ => &[],
        }
    }

    /// Initial runtime value: checkboxes start unchecked, everything else empty.
    pub fn initial_value(&self) -> Value {
        match (&self.kind, &self.default_value) {
            (FieldKind::Checkbox, Some(Value::Bool(b))) => Value::Bool(*b),
            (FieldKind::Checkbox, Some(Value::String(s))) => Value::Bool(s == "true"),
            (FieldKind::Checkbox, _) => Value::Bool(false),
            (_, Some(v)) => v.clone(),
            (_, None) => Value::String(String::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_text_field_with_string_limits() {
        let field: Field = serde_json::from_value(json!({
            "name": "nickname",
            "type": "text",
            "label": "Nickname",
            "required": true,
            "minLength": "2",
            "maxLength": 10,
            "pattern": "^[a-z]+$"
        }))
        .unwrap();

        assert_eq!(field.field_type(), FieldType::Text);
        assert!(field.required);
        match &field.kind {
            FieldKind::Text(rules) => {
                assert_eq!(rules.min_length.as_ref().and_then(Bound::as_len), Some(2));
                assert_eq!(rules.max_length.as_ref().and_then(Bound::as_len), Some(10));
                assert_eq!(rules.pattern.as_deref(), Some("^[a-z]+$"));
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn grid_columns_reject_nested_grid_type() {
        let parsed: Result<Field, _> = serde_json::from_value(json!({
            "name": "items",
            "type": "grid",
            "label": "Items",
            "columns": [{ "name": "inner", "type": "grid" }]
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn checkbox_serializes_only_its_tag() {
        let field = Field::new("agree", FieldKind::Checkbox);
        let value = serde_json::to_value(&field).unwrap();
        assert_eq!(
            value,
            json!({ "name": "agree", "label": "Agree", "type": "checkbox" })
        );
    }

    #[test]
    fn initial_values_follow_kind_and_default() {
        let mut checkbox = Field::new("opt_in", FieldKind::Checkbox);
        assert_eq!(checkbox.initial_value(), json!(false));
        checkbox.default_value = Some(json!("true"));
        assert_eq!(checkbox.initial_value(), json!(true));

        let mut text = Field::new("city", FieldKind::Text(TextRules::default()));
        assert_eq!(text.initial_value(), json!(""));
        text.default_value = Some(json!("Berlin"));
        assert_eq!(text.initial_value(), json!("Berlin"));
    }

    #[test]
    fn blank_string_bound_means_unbounded() {
        assert_eq!(Bound::Text("  ".into()).as_f64(), None);
        assert_eq!(Bound::Text("4.5".into()).as_f64(), Some(4.5));
        assert_eq!(Bound::Number(Number::from(3)).as_f64(), Some(3.0));
    }

    #[test]
    fn palette_tokens_round_trip() {
        for ty in FieldType::ALL {
            assert_eq!(FieldType::parse(ty.as_str()), Some(ty));
        }
        assert_eq!(FieldType::parse("password"), None);
    }
}
