// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! The editor's current selection and how it follows structural edits.
//!
//! Selections are positional, so every edit that shifts indices must re-point
//! them. Each `after_*` method applies one kind of edit; a selection whose
//! target disappeared becomes `None`.

use crate::models::{Field, FieldLocation, Form, Section, SectionPath};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    Section(SectionPath),
    Field(FieldLocation),
}

impl Selection {
    pub fn section_path(&self) -> &SectionPath {
        match self {
            Selection::Section(path) => path,
            Selection::Field(loc) => &loc.section,
        }
    }

    pub fn resolve_section<'a>(&self, form: &'a Form) -> Option<&'a Section> {
        match self {
            Selection::Section(path) => form.section(path),
            Selection::Field(_) => None,
        }
    }

    pub fn resolve_field<'a>(&self, form: &'a Form) -> Option<&'a Field> {
        match self {
            Selection::Field(loc) => form.field(loc),
            Selection::Section(_) => None,
        }
    }

    fn map_path(self, f: impl FnOnce(&SectionPath) -> Option<SectionPath>) -> Option<Self> {
        match self {
            Selection::Section(path) => f(&path).map(Selection::Section),
            Selection::Field(loc) => {
                f(&loc.section).map(|section| Selection::Field(FieldLocation::new(section, loc.index)))
            }
        }
    }

    /// A field was removed at `removed`.
    pub fn after_field_removed(self, removed: &FieldLocation) -> Option<Self> {
        match self {
            Selection::Field(loc) if loc.section == removed.section => {
                if loc.index == removed.index {
                    None
                } else if loc.index > removed.index {
                    Some(Selection::Field(FieldLocation::new(loc.section, loc.index - 1)))
                } else {
                    Some(Selection::Field(loc))
                }
            }
            other => Some(other),
        }
    }

    /// A field was inserted at `inserted`.
    pub fn after_field_inserted(self, inserted: &FieldLocation) -> Self {
        match self {
            Selection::Field(loc) if loc.section == inserted.section && loc.index >= inserted.index => {
                Selection::Field(FieldLocation::new(loc.section, loc.index + 1))
            }
            other => other,
        }
    }

    /// A field moved from `from` to `to` (final position).
    pub fn after_field_moved(self, from: &FieldLocation, to: &FieldLocation) -> Self {
        if matches!(&self, Selection::Field(loc) if loc == from) {
            return Selection::Field(to.clone());
        }
        match self.after_field_removed(from) {
            Some(sel) => sel.after_field_inserted(to),
            None => Selection::Field(to.clone()),
        }
    }

    /// A section moved among its siblings from `from` to sibling index `to`.
    ///
    /// Sections between the two positions shift by one; anything inside a
    /// shifted section (nested sections, fields) follows its owner.
    pub fn after_section_moved(self, from: &SectionPath, to: usize) -> Self {
        let Some(from_idx) = from.last() else {
            return self;
        };
        let depth = from.depth();
        let remapped = self.clone().map_path(|path| {
            if !shares_parent(path, from) {
                return None;
            }
            let k = path.indices()[depth];
            let new_k = remap_sibling(k, from_idx, to);
            let mut indices = path.indices().to_vec();
            indices[depth] = new_k;
            Some(SectionPath::new(indices))
        });
        remapped.unwrap_or(self)
    }

    /// The section at `removed` (and its subtree) was deleted.
    pub fn after_section_removed(self, removed: &SectionPath) -> Option<Self> {
        if removed.contains(self.section_path()) {
            return None;
        }
        let Some(removed_idx) = removed.last() else {
            return Some(self);
        };
        let depth = removed.depth();
        let original = self.clone();
        let remapped = self.map_path(|path| {
            if !shares_parent(path, removed) {
                return None;
            }
            let k = path.indices()[depth];
            let mut indices = path.indices().to_vec();
            if k > removed_idx {
                indices[depth] = k - 1;
            }
            Some(SectionPath::new(indices))
        });
        Some(remapped.unwrap_or(original))
    }
}

/// True when `path` lies inside the same sibling list as `sibling` (at that level or below).
fn shares_parent(path: &SectionPath, sibling: &SectionPath) -> bool {
    let depth = sibling.depth();
    path.depth() >= depth && path.indices()[..depth] == sibling.indices()[..depth]
}

/// New sibling index of `k` after the entry at `from` is spliced out and reinserted at `to`.
pub fn remap_sibling(k: usize, from: usize, to: usize) -> usize {
    if k == from {
        to
    } else if from < to && k > from && k <= to {
        k - 1
    } else if to < from && k >= to && k < from {
        k + 1
    } else {
        k
    }
}
