// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Core of a visual form builder.
//!
//! A form is a tree of sections holding typed fields. Sections may be shown
//! only when an earlier field holds a given value. The crate keeps the tree
//! consistent under drag-and-drop edits, evaluates visibility, validates
//! entered values, and turns them into nested submission data keyed by each
//! section's object name.
//!
//! The editor is driven through [`mvu::update`] and [`mvu::run_command`];
//! toolkits draw it through [`render::FormAdapter`].
//!
//! ```rust,ignore
//! use formwright::mvu::{BuilderModel, Msg, update};
//!
//! let mut model = BuilderModel::default();
//! let mut cmds = Vec::new();
//! update(&mut model, Msg::LoadSample, &mut cmds);
//! update(&mut model, Msg::AddSection, &mut cmds);
//! assert_eq!(model.form.sections.len(), 2);
//! ```

pub mod config;
pub mod error;
pub mod logic;
pub mod models;
pub mod mvu;
pub mod render;
pub mod utils;

pub use config::{BuilderSettings, RemovalPolicy};
pub use error::BuilderError;
pub use models::{Field, FieldKind, FieldType, Form, FormState, Section, SectionPath};
