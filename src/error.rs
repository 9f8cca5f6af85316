// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Typed rejections for editing operations.
//!
//! Every variant is recoverable: the edit that produced it is not applied and the
//! `Display` text is what the editor surfaces to the user.

use thiserror::Error;

use crate::models::SectionPath;

/// Reasons an edit to the form tree was refused.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BuilderError {
    #[error("Section {0} not found")]
    SectionNotFound(SectionPath),
    #[error("Field {index} in section {section} not found")]
    FieldNotFound { section: SectionPath, index: usize },
    #[error("A field named '{0}' already exists in this form")]
    DuplicateFieldName(String),
    #[error("Field names cannot be empty")]
    EmptyFieldName,
    #[error("Condition field '{0}' does not exist in this form")]
    UnknownConditionField(String),
    #[error("Section '{section}' cannot depend on its own field '{field}'")]
    SelfReference { section: String, field: String },
    #[error(
        "Section '{section}' cannot depend on field '{field}' from section '{owner}', which comes after it"
    )]
    ForwardReference {
        section: String,
        field: String,
        owner: String,
    },
    #[error("Circular dependency between sections: {}", .0.join(" -> "))]
    CircularDependency(Vec<String>),
    #[error(
        "Moving this would make section '{section}' depend on field '{field}' that appears after it"
    )]
    ReorderBreaksDependency { section: String, field: String },
    #[error("'{target}' is used by the visibility condition of: {}", .dependents.join(", "))]
    HasDependents {
        target: String,
        dependents: Vec<String>,
    },
    #[error("A column named '{0}' already exists in this grid")]
    DuplicateColumnName(String),
    #[error("Field '{0}' is not a grid")]
    NotAGrid(String),
    #[error("Grid column {0} not found")]
    ColumnNotFound(usize),
    #[error("Column names cannot be empty")]
    EmptyColumnName,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_items() {
        let err = BuilderError::ForwardReference {
            section: "Intro".into(),
            field: "country".into(),
            owner: "Address".into(),
        };
        let text = err.to_string();
        assert!(text.contains("Intro"));
        assert!(text.contains("country"));
        assert!(text.contains("Address"));

        let cycle = BuilderError::CircularDependency(vec!["A".into(), "B".into(), "A".into()]);
        assert_eq!(
            cycle.to_string(),
            "Circular dependency between sections: A -> B -> A"
        );
    }
}
