// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Editor settings

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::{ColumnType, FieldType, GridColumn};

/// What happens when a removed field or section is referenced by other sections' conditions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RemovalPolicy {
    /// Hold the removal until the user confirms; confirming clears the dangling conditions.
    #[default]
    Block,
    /// Remove immediately and clear the dangling conditions.
    ClearDependents,
}

/// Builder settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuilderSettings {
    /// Cascade behavior for removals
    pub removal_policy: RemovalPolicy,
    /// Rows seeded for grids without `defaultRows`
    pub default_grid_rows: u32,
    /// Columns given to a newly created grid field
    pub grid_seed_columns: Vec<GridColumn>,
    /// Placeholder for new fields; `{type}` is replaced by the field type
    pub placeholder_template: String,
}

impl Default for BuilderSettings {
    fn default() -> Self {
        Self {
            removal_policy: RemovalPolicy::Block,
            default_grid_rows: 1,
            grid_seed_columns: vec![
                GridColumn::new("Item", ColumnType::Text),
                GridColumn::new("Quantity", ColumnType::Number),
            ],
            placeholder_template: "Enter {type} value...".into(),
        }
    }
}

impl BuilderSettings {
    /// Parse settings JSON; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse builder settings")
    }

    /// Load from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {:?}", path))?;
        Self::from_json(&content)
    }

    pub fn placeholder_for(&self, field_type: FieldType) -> String {
        self.placeholder_template.replace("{type}", field_type.as_str())
    }
}
