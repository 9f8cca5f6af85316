// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Sections: ordered field containers that nest recursively.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::field::Field;
use super::is_false;
use crate::utils::object_name_from;

/// Fresh, never reused section identifier.
pub fn new_section_id() -> String {
    format!("section_{}", Uuid::new_v4().simple())
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(default = "new_section_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Key for this section's data; derived from `name` unless overridden.
    #[serde(default)]
    pub object_name: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    /// Heading suppressed and fields merged into the parent's object.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_sub_section: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nested_sections: Vec<Section>,
    /// Non-owning back reference, used only for lookups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl Section {
    /// Empty top-level section with a derived object name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: new_section_id(),
            object_name: object_name_from(&name),
            name,
            fields: Vec::new(),
            is_sub_section: false,
            condition_field: None,
            condition_value: None,
            nested_sections: Vec::new(),
            parent_id: None,
        }
    }

    /// Empty sub-section owned by `parent`.
    pub fn nested_in(parent: &Section, name: impl Into<String>) -> Self {
        let mut section = Self::new(name);
        section.is_sub_section = true;
        section.parent_id = Some(parent.id.clone());
        section
    }

    /// Rename, re-deriving `object_name` unless the user has set their own.
    pub fn rename(&mut self, name: impl Into<String>) {
        let name = name.into();
        let derived_from_old = object_name_from(&self.name);
        if self.object_name.is_empty() || self.object_name == derived_from_old {
            self.object_name = object_name_from(&name);
        }
        self.name = name;
    }

    /// Serialization key: `objectName`, else `name`, else `None` (caller picks a positional key).
    pub fn object_key(&self) -> Option<&str> {
        [self.object_name.as_str(), self.name.as_str()]
            .into_iter()
            .find(|k| !k.trim().is_empty())
    }

    /// The visibility predicate, when both halves are set.
    pub fn condition(&self) -> Option<(&str, &str)> {
        match (self.condition_field.as_deref(), self.condition_value.as_deref()) {
            (Some(field), Some(value)) if !field.is_empty() && !value.is_empty() => {
                Some((field, value))
            }
            _ => None,
        }
    }

    pub fn clear_condition(&mut self) {
        self.condition_field = None;
        self.condition_value = None;
    }

    /// Human-readable name for messages.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}
