// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Business logic over the form tree: placement, dependencies, visibility,
//! validation, structured output, and structural edits.

pub mod dependencies;
pub mod editor;
pub mod placement;
pub mod selection;
pub mod structured;
pub mod validation;
pub mod visibility;

pub use dependencies::{DependencyGraph, build_dependency_graph, condition_candidates};
pub use placement::{DragId, DragSession, DragSource, DropIndicator, DropOutcome, NameGenerator, PointerHint};
pub use selection::Selection;
pub use structured::{Submission, build_structured_data, submit};
pub use validation::{ValidationReport, validate_form};
pub use visibility::{is_section_visible, visit_visible_sections};
