// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Rendering-adapter boundary and a plain-text outline adapter.
//!
//! Toolkits implement [`FormAdapter`]; [`render_form`] walks the visible tree
//! and hands each field and section to the adapter with its runtime props.
//! Edits made through the rendered widgets come back as MVU messages.

use serde_json::Value;

use crate::logic::selection::Selection;
use crate::logic::visibility::is_section_visible;
use crate::models::{Field, FieldKind, Form, FormState, GridValue, Section};

/// Runtime state handed to the adapter for one field.
#[derive(Clone, Copy, Debug)]
pub struct FieldProps<'a> {
    pub value: Option<&'a Value>,
    /// Rows for grid fields.
    pub grid: Option<&'a GridValue>,
    pub error: Option<&'a str>,
    pub touched: bool,
}

/// Already rendered children of a section.
#[derive(Debug)]
pub struct SectionProps<T> {
    pub fields: Vec<T>,
    pub sections: Vec<T>,
    /// Nesting depth, 0 for top-level sections.
    pub level: usize,
}

pub trait FormAdapter {
    type Output;

    fn render_field(&mut self, field: &Field, props: FieldProps<'_>) -> Self::Output;

    fn render_section(&mut self, section: &Section, props: SectionProps<Self::Output>) -> Self::Output;
}

/// Render every visible top-level section. Hidden sections and their subtrees
/// are skipped entirely.
pub fn render_form<A: FormAdapter>(form: &Form, state: &FormState, adapter: &mut A) -> Vec<A::Output> {
    form.sections
        .iter()
        .filter_map(|section| render_section(section, 0, state, adapter))
        .collect()
}

fn render_section<A: FormAdapter>(
    section: &Section,
    level: usize,
    state: &FormState,
    adapter: &mut A,
) -> Option<A::Output> {
    if !is_section_visible(section, &state.form_values) {
        return None;
    }
    let fields = section
        .fields
        .iter()
        .map(|field| {
            let props = FieldProps {
                value: state.value(&field.name),
                grid: state.grid_values.get(&field.name),
                error: state.error(&field.name),
                touched: state.is_touched(&field.name),
            };
            adapter.render_field(field, props)
        })
        .collect();
    let sections = section
        .nested_sections
        .iter()
        .filter_map(|nested| render_section(nested, level + 1, state, adapter))
        .collect();
    Some(adapter.render_section(
        section,
        SectionProps {
            fields,
            sections,
            level,
        },
    ))
}

/// Placeholder shown where a selection or reference no longer resolves.
pub fn not_found(what: &str, address: impl std::fmt::Display) -> String {
    format!("{what} {address} not found")
}

/// One-line description of the selected item for the properties panel.
pub fn describe_selection(form: &Form, selection: &Selection) -> String {
    match selection {
        Selection::Section(path) => match form.section(path) {
            Some(section) => format!("Section '{}' ({} fields)", section.display_name(), section.fields.len()),
            None => not_found("Section", path),
        },
        Selection::Field(loc) => match form.field(loc) {
            Some(field) => format!("Field '{}' [{}]", field.name, field.field_type()),
            None => not_found("Field", format!("{}#{}", loc.section, loc.index)),
        },
    }
}

/// Indented text outline, used for previews and logging.
#[derive(Clone, Debug, Default)]
pub struct OutlineAdapter;

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl FormAdapter for OutlineAdapter {
    type Output = String;

    fn render_field(&mut self, field: &Field, props: FieldProps<'_>) -> String {
        let marker = if field.required { "*" } else { "" };
        let value = match (&field.kind, props.grid) {
            (FieldKind::Grid(_), Some(grid)) => format!("{} row(s)", grid.rows.len()),
            (FieldKind::Grid(_), None) => "0 row(s)".to_string(),
            _ => props.value.map(display_value).unwrap_or_default(),
        };
        let mut line = format!("- {}{marker} [{}]: {value}", field.label, field.field_type());
        if props.touched
            && let Some(error) = props.error
        {
            line.push_str(&format!(" (! {error})"));
        }
        line
    }

    fn render_section(&mut self, section: &Section, props: SectionProps<String>) -> String {
        let indent = "  ".repeat(props.level);
        let mut lines = Vec::new();
        // Sub-sections suppress their heading.
        if !section.is_sub_section {
            lines.push(format!("{indent}{} {}", "#".repeat(props.level + 1), section.display_name()));
        }
        lines.extend(props.fields.iter().map(|f| format!("{indent}{f}")));
        lines.extend(props.sections);
        lines.join("\n")
    }
}
