// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Domain layer: the form tree, its wire format, and runtime values.
//! Everything here is UI-agnostic and shared by the editing logic and the MVU kernel.

pub mod field;
pub mod form;
pub mod path;
pub mod section;
pub mod values;

pub use field::{Bound, Choices, ColumnType, DateRules, Field, FieldKind, FieldType, GridColumn, GridSpec, NumberRules, TextRules};
pub use form::{Form, Walk};
pub use path::{FieldLocation, SectionPath};
pub use section::Section;
pub use values::{FormState, GridValue};

/// `skip_serializing_if` helper so optional flags stay out of the JSON when unset.
pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}
