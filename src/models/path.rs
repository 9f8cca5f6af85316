// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Positional addresses into the section tree.

use std::fmt;

/// Index path from the form root to a section: `[top, nested, nested, ...]`.
///
/// The derived ordering is lexicographic with prefixes first, which is exactly
/// document (pre-order) order: a parent sorts before its children, and children
/// sort before the parent's later siblings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionPath(Vec<usize>);

impl SectionPath {
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    /// Path of a top-level section.
    pub fn root(index: usize) -> Self {
        Self(vec![index])
    }

    /// Path of the `index`-th nested section below this one.
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    pub fn parent(&self) -> Option<SectionPath> {
        if self.0.len() <= 1 {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Nesting depth; top-level sections are at depth 0.
    pub fn depth(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    pub fn top(&self) -> Option<usize> {
        self.0.first().copied()
    }

    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Same parent, different position among the siblings.
    pub fn with_last(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        if let Some(last) = indices.last_mut() {
            *last = index;
        }
        Self(indices)
    }

    /// True when `self` is `other` or one of its ancestors.
    pub fn contains(&self, other: &SectionPath) -> bool {
        other.0.len() >= self.0.len() && other.0[..self.0.len()] == self.0[..]
    }
}

impl From<Vec<usize>> for SectionPath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl fmt::Display for SectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|i| i.to_string()).collect();
        write!(f, "[{}]", parts.join("/"))
    }
}

/// A field addressed by its owning section and position in that section's list.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldLocation {
    pub section: SectionPath,
    pub index: usize,
}

impl FieldLocation {
    pub fn new(section: SectionPath, index: usize) -> Self {
        Self { section, index }
    }
}
