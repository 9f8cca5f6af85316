// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Runtime (non-persisted) form state: entered values, grid rows, errors, touched set.
//!
//! Values are keyed by field name and kept flat regardless of nesting depth; the
//! nested shape is rebuilt only when structured data is produced.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::field::{Field, FieldKind};
use super::form::{Form, Walk};

/// Rows entered for one grid field. Each row maps column name to cell value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridValue {
    pub rows: Vec<Map<String, Value>>,
}

impl GridValue {
    /// `count` empty rows.
    pub fn with_empty_rows(count: usize) -> Self {
        Self {
            rows: vec![Map::new(); count],
        }
    }

    pub fn rows_as_json(&self) -> Value {
        Value::Array(self.rows.iter().cloned().map(Value::Object).collect())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormState {
    pub form_values: BTreeMap<String, Value>,
    pub grid_values: BTreeMap<String, GridValue>,
    pub errors: BTreeMap<String, String>,
    pub touched: BTreeSet<String>,
}

impl FormState {
    /// Fresh state for a newly loaded form.
    pub fn for_form(form: &Form, default_grid_rows: u32) -> Self {
        let mut state = Self::default();
        state.sync_with(form, default_grid_rows);
        state
    }

    /// Add defaults for fields that have no value yet, keeping everything already entered.
    ///
    /// Called after structural edits; a full form replacement uses [`FormState::for_form`].
    pub fn sync_with(&mut self, form: &Form, default_grid_rows: u32) {
        form.visit_sections(|_, section| {
            for field in &section.fields {
                if field.name.is_empty() {
                    continue;
                }
                match &field.kind {
                    FieldKind::Grid(_) => {
                        self.ensure_grid_rows(field, default_grid_rows);
                    }
                    _ => {
                        self.form_values
                            .entry(field.name.clone())
                            .or_insert_with(|| field.initial_value());
                    }
                }
            }
            Walk::Descend
        });
    }

    /// Seed a grid with its default rows when it has no entry yet.
    ///
    /// A grid without `defaultRows` gets `fallback` rows. An existing entry is
    /// left alone, even when the user removed every row.
    pub fn ensure_grid_rows(&mut self, field: &Field, fallback: u32) -> &GridValue {
        let count = field
            .grid()
            .and_then(|g| g.default_rows)
            .unwrap_or(fallback) as usize;
        self.grid_values
            .entry(field.name.clone())
            .or_insert_with(|| GridValue::with_empty_rows(count))
    }

    /// Record an edit: store the value, clear a stale error, mark touched.
    pub fn handle_change(&mut self, name: &str, value: Value) {
        self.form_values.insert(name.to_string(), value);
        self.errors.remove(name);
        self.touched.insert(name.to_string());
    }

    pub fn handle_blur(&mut self, name: &str) {
        self.touched.insert(name.to_string());
    }

    pub fn handle_grid_change(&mut self, name: &str, value: GridValue) {
        self.grid_values.insert(name.to_string(), value);
        self.touched.insert(name.to_string());
    }

    pub fn add_grid_row(&mut self, name: &str) {
        self.grid_values
            .entry(name.to_string())
            .or_default()
            .rows
            .push(Map::new());
        self.touched.insert(name.to_string());
    }

    /// Remove a row; out-of-range indices are ignored.
    pub fn remove_grid_row(&mut self, name: &str, row: usize) {
        if let Some(grid) = self.grid_values.get_mut(name)
            && row < grid.rows.len()
        {
            grid.rows.remove(row);
            self.touched.insert(name.to_string());
        }
    }

    /// Set one cell; out-of-range rows are ignored.
    pub fn set_grid_cell(&mut self, name: &str, row: usize, column: &str, value: Value) {
        if let Some(cells) = self
            .grid_values
            .get_mut(name)
            .and_then(|g| g.rows.get_mut(row))
        {
            cells.insert(column.to_string(), value);
            self.touched.insert(name.to_string());
        }
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.form_values.get(name)
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    pub fn is_touched(&self, name: &str) -> bool {
        self.touched.contains(name)
    }
}
