// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Structural edits from the properties panel and section toolbar.
//!
//! Every operation either applies completely or returns a [`BuilderError`] with
//! the form unchanged.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use super::dependencies::check_condition;
use super::placement::{NameGenerator, insert_field, move_field, move_section, new_field};
use crate::config::{BuilderSettings, RemovalPolicy};
use crate::error::BuilderError;
use crate::models::{
    ColumnType, Field, FieldLocation, FieldType, Form, GridColumn, GridSpec, Section, SectionPath,
    Walk,
};

/// Sections whose visibility conditions were cleared by a cascading removal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Removal {
    pub cleared_conditions: Vec<String>,
}

/// Append a new top-level section named `Section N`.
pub fn add_section(form: &mut Form) -> SectionPath {
    let section = Section::new(format!("Section {}", form.sections.len() + 1));
    debug!(id = %section.id, "Added section");
    form.sections.push(section);
    SectionPath::root(form.sections.len() - 1)
}

/// Append a sub-section named `Sub-section N` under `parent`.
pub fn add_nested_section(form: &mut Form, parent: &SectionPath) -> Result<SectionPath, BuilderError> {
    let owner = form
        .section_mut(parent)
        .ok_or_else(|| BuilderError::SectionNotFound(parent.clone()))?;
    let nested = Section::nested_in(
        owner,
        format!("Sub-section {}", owner.nested_sections.len() + 1),
    );
    owner.nested_sections.push(nested);
    Ok(parent.child(owner.nested_sections.len() - 1))
}

/// Append a fresh field of `field_type` to the section at `section`.
pub fn add_field(
    form: &mut Form,
    section: &SectionPath,
    field_type: FieldType,
    names: &mut NameGenerator,
    settings: &BuilderSettings,
) -> Result<FieldLocation, BuilderError> {
    let field = new_field(form, field_type, names, settings);
    insert_field(form, section, None, field)
}

/// Replace the field at `loc`.
///
/// A rename must stay non-empty and unique; conditions that named the old
/// field follow it to the new name.
pub fn update_field(form: &mut Form, loc: &FieldLocation, updated: Field) -> Result<(), BuilderError> {
    let current = form.field(loc).ok_or_else(|| BuilderError::FieldNotFound {
        section: loc.section.clone(),
        index: loc.index,
    })?;
    let old_name = current.name.clone();

    if updated.name != old_name {
        if updated.name.trim().is_empty() {
            return Err(BuilderError::EmptyFieldName);
        }
        if form.contains_field_name(&updated.name) {
            return Err(BuilderError::DuplicateFieldName(updated.name));
        }
        let new_name = updated.name.clone();
        for path in sections_conditioned_on(form, &BTreeSet::from([old_name.clone()])) {
            if let Some(section) = form.section_mut(&path) {
                section.condition_field = Some(new_name.clone());
            }
        }
        debug!(from = %old_name, to = %new_name, "Renamed field");
    }

    if let Some(field) = form.field_mut(loc) {
        *field = updated;
    }
    Ok(())
}

/// Section properties editable from the properties panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SectionEdit {
    /// New heading; re-derives the object name unless it was overridden.
    Rename(String),
    ObjectName(String),
    SubSection(bool),
}

pub fn update_section(form: &mut Form, path: &SectionPath, edit: SectionEdit) -> Result<(), BuilderError> {
    let section = form
        .section_mut(path)
        .ok_or_else(|| BuilderError::SectionNotFound(path.clone()))?;
    match edit {
        SectionEdit::Rename(name) => section.rename(name),
        SectionEdit::ObjectName(object_name) => section.object_name = object_name,
        SectionEdit::SubSection(flag) => section.is_sub_section = flag,
    }
    Ok(())
}

/// Set or clear the field a section's visibility depends on.
///
/// The target must be a field of an earlier section and must not close a cycle.
pub fn set_condition_field(
    form: &mut Form,
    path: &SectionPath,
    field: Option<String>,
) -> Result<(), BuilderError> {
    let field = field.filter(|f| !f.trim().is_empty());
    if let Some(name) = field.as_deref()
        && let Err(err) = check_condition(form, path, name)
    {
        warn!(section = %path, field = name, error = %err, "Condition rejected");
        return Err(err);
    }
    let section = form
        .section_mut(path)
        .ok_or_else(|| BuilderError::SectionNotFound(path.clone()))?;
    match field {
        Some(name) => section.condition_field = Some(name),
        None => section.clear_condition(),
    }
    Ok(())
}

pub fn set_condition_value(form: &mut Form, path: &SectionPath, value: String) -> Result<(), BuilderError> {
    let section = form
        .section_mut(path)
        .ok_or_else(|| BuilderError::SectionNotFound(path.clone()))?;
    section.condition_value = if value.is_empty() { None } else { Some(value) };
    Ok(())
}

/// Paths of sections whose condition names one of `fields`.
pub fn sections_conditioned_on(form: &Form, fields: &BTreeSet<String>) -> Vec<SectionPath> {
    let mut paths = Vec::new();
    form.visit_sections(|path, section| {
        if section
            .condition_field
            .as_ref()
            .is_some_and(|f| fields.contains(f))
        {
            paths.push(path.clone());
        }
        Walk::Descend
    });
    paths
}

fn display_names(form: &Form, paths: &[SectionPath]) -> Vec<String> {
    paths
        .iter()
        .filter_map(|p| form.section(p))
        .map(|s| s.display_name().to_string())
        .collect()
}

fn clear_conditions(form: &mut Form, paths: &[SectionPath]) -> Vec<String> {
    let names = display_names(form, paths);
    for path in paths {
        if let Some(section) = form.section_mut(path) {
            section.clear_condition();
        }
    }
    names
}

/// Remove the field at `loc`.
///
/// When other sections depend on it, [`RemovalPolicy::Block`] refuses with
/// [`BuilderError::HasDependents`]; [`RemovalPolicy::ClearDependents`] removes it
/// and clears those conditions.
pub fn remove_field(
    form: &mut Form,
    loc: &FieldLocation,
    policy: RemovalPolicy,
) -> Result<Removal, BuilderError> {
    let field = form.field(loc).ok_or_else(|| BuilderError::FieldNotFound {
        section: loc.section.clone(),
        index: loc.index,
    })?;
    let name = field.name.clone();
    let dependents = sections_conditioned_on(form, &BTreeSet::from([name.clone()]));

    if !dependents.is_empty() && policy == RemovalPolicy::Block {
        return Err(BuilderError::HasDependents {
            target: name,
            dependents: display_names(form, &dependents),
        });
    }

    let cleared_conditions = clear_conditions(form, &dependents);
    if let Some(section) = form.section_mut(&loc.section) {
        section.fields.remove(loc.index);
    }
    debug!(field = %name, cleared = cleared_conditions.len(), "Removed field");
    Ok(Removal { cleared_conditions })
}

/// Remove the section at `path` with everything below it.
///
/// Sections outside the subtree that depend on one of its fields are handled
/// as in [`remove_field`].
pub fn remove_section(
    form: &mut Form,
    path: &SectionPath,
    policy: RemovalPolicy,
) -> Result<Removal, BuilderError> {
    let section = form
        .section(path)
        .ok_or_else(|| BuilderError::SectionNotFound(path.clone()))?;
    let label = section.display_name().to_string();

    let mut owned = BTreeSet::new();
    form.visit_sections(|candidate, section| {
        if path.contains(candidate) {
            owned.extend(section.fields.iter().map(|f| f.name.clone()));
        }
        Walk::Descend
    });
    let dependents: Vec<SectionPath> = sections_conditioned_on(form, &owned)
        .into_iter()
        .filter(|p| !path.contains(p))
        .collect();

    if !dependents.is_empty() && policy == RemovalPolicy::Block {
        return Err(BuilderError::HasDependents {
            target: label,
            dependents: display_names(form, &dependents),
        });
    }

    let cleared_conditions = clear_conditions(form, &dependents);
    if let (Some(siblings), Some(idx)) = (form.siblings_mut(path), path.last()) {
        siblings.remove(idx);
    }
    debug!(section = %label, cleared = cleared_conditions.len(), "Removed section");
    Ok(Removal { cleared_conditions })
}

/// Swap a field with its predecessor. The first field stays put.
pub fn move_field_up(form: &mut Form, loc: &FieldLocation) -> Result<FieldLocation, BuilderError> {
    if loc.index == 0 {
        return Ok(loc.clone());
    }
    move_field(form, loc, &loc.section, loc.index - 1)
}

/// Swap a field with its successor. The last field stays put.
pub fn move_field_down(form: &mut Form, loc: &FieldLocation) -> Result<FieldLocation, BuilderError> {
    let len = form
        .section(&loc.section)
        .map(|s| s.fields.len())
        .ok_or_else(|| BuilderError::SectionNotFound(loc.section.clone()))?;
    if loc.index + 1 >= len {
        return Ok(loc.clone());
    }
    // Insertion points count the moving field, so "after the next one" is +2.
    move_field(form, loc, &loc.section, loc.index + 2)
}

pub fn move_section_up(form: &mut Form, path: &SectionPath) -> Result<SectionPath, BuilderError> {
    match path.last() {
        Some(0) => Ok(path.clone()),
        Some(idx) => move_section(form, path, idx - 1),
        None => Err(BuilderError::SectionNotFound(path.clone())),
    }
}

pub fn move_section_down(form: &mut Form, path: &SectionPath) -> Result<SectionPath, BuilderError> {
    let len = form
        .siblings(path)
        .map(<[_]>::len)
        .ok_or_else(|| BuilderError::SectionNotFound(path.clone()))?;
    match path.last() {
        Some(idx) if idx + 1 < len => move_section(form, path, idx + 1),
        Some(_) => Ok(path.clone()),
        None => Err(BuilderError::SectionNotFound(path.clone())),
    }
}

fn grid_at<'a>(form: &'a mut Form, loc: &FieldLocation) -> Result<&'a mut GridSpec, BuilderError> {
    let field = form.field_mut(loc).ok_or_else(|| BuilderError::FieldNotFound {
        section: loc.section.clone(),
        index: loc.index,
    })?;
    let name = field.name.clone();
    field.grid_mut().ok_or(BuilderError::NotAGrid(name))
}

fn check_column_name(grid: &GridSpec, name: &str, skip: Option<usize>) -> Result<(), BuilderError> {
    if name.trim().is_empty() {
        return Err(BuilderError::EmptyColumnName);
    }
    let taken = grid
        .columns
        .iter()
        .enumerate()
        .any(|(idx, c)| Some(idx) != skip && c.name == name);
    if taken {
        return Err(BuilderError::DuplicateColumnName(name.to_string()));
    }
    Ok(())
}

/// Append a text column named `Column N` (bumping N past taken names).
pub fn add_grid_column(form: &mut Form, loc: &FieldLocation) -> Result<usize, BuilderError> {
    let grid = grid_at(form, loc)?;
    let mut n = grid.columns.len() + 1;
    while grid.columns.iter().any(|c| c.name == format!("Column {n}")) {
        n += 1;
    }
    grid.columns
        .push(GridColumn::new(format!("Column {n}"), ColumnType::Text));
    Ok(grid.columns.len() - 1)
}

pub fn update_grid_column(
    form: &mut Form,
    loc: &FieldLocation,
    index: usize,
    column: GridColumn,
) -> Result<(), BuilderError> {
    let grid = grid_at(form, loc)?;
    if index >= grid.columns.len() {
        return Err(BuilderError::ColumnNotFound(index));
    }
    check_column_name(grid, &column.name, Some(index))?;
    grid.columns[index] = column;
    Ok(())
}

pub fn remove_grid_column(form: &mut Form, loc: &FieldLocation, index: usize) -> Result<GridColumn, BuilderError> {
    let grid = grid_at(form, loc)?;
    if index >= grid.columns.len() {
        return Err(BuilderError::ColumnNotFound(index));
    }
    Ok(grid.columns.remove(index))
}

/// Splice a column from `from` to `to`.
pub fn move_grid_column(form: &mut Form, loc: &FieldLocation, from: usize, to: usize) -> Result<(), BuilderError> {
    let grid = grid_at(form, loc)?;
    let len = grid.columns.len();
    if from >= len {
        return Err(BuilderError::ColumnNotFound(from));
    }
    if to >= len {
        return Err(BuilderError::ColumnNotFound(to));
    }
    let column = grid.columns.remove(from);
    grid.columns.insert(to, column);
    Ok(())
}
