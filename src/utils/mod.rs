// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Shared helper utilities reused by the models and the editing logic.

pub mod naming;

/// Readable label for a generated or technical field name.
pub use naming::label_from_name;
/// camelCase serialization key derived from a section name.
pub use naming::object_name_from;
