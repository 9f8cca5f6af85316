// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Placement engine: turns a drag gesture into exactly one tree edit.
//!
//! A gesture runs `start -> over* -> end`. `over` keeps a drop indicator up to
//! date (it also tells the view which container to highlight); `end` takes that
//! indicator before clearing the session and applies the insert or move.
//! Unparseable ids, stale indices, and drops with no target leave the form
//! untouched.

use std::fmt;

use tracing::{debug, warn};

use super::dependencies::{dependency_issues, new_dependency_issue};
use super::selection::Selection;
use crate::config::BuilderSettings;
use crate::error::BuilderError;
use crate::models::{Field, FieldKind, FieldLocation, FieldType, Form, SectionPath};

/// Draggable and droppable element ids.
///
/// Wire forms: `field-{s}-{f}`, `nested-field-{s}-{n..}-{f}`, `section-{s}`,
/// `nested-{s}-{n..}`, `section-sortable-{s}`. Deeper nesting appends indices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DragId {
    /// An existing field.
    Field(FieldLocation),
    /// A section's field list, as a drop container.
    Container(SectionPath),
    /// A top-level section's drag handle.
    SortableSection(usize),
}

fn parse_indices(raw: &str) -> Option<Vec<usize>> {
    raw.split('-')
        .map(|part| part.parse::<usize>().ok())
        .collect()
}

impl DragId {
    pub fn parse(raw: &str) -> Option<Self> {
        if let Some(rest) = raw.strip_prefix("nested-field-") {
            let indices = parse_indices(rest)?;
            let (field, sections) = indices.split_last()?;
            if sections.len() < 2 {
                return None;
            }
            return Some(Self::Field(FieldLocation::new(
                SectionPath::new(sections.to_vec()),
                *field,
            )));
        }
        if let Some(rest) = raw.strip_prefix("field-") {
            return match parse_indices(rest)?.as_slice() {
                [section, field] => Some(Self::Field(FieldLocation::new(
                    SectionPath::root(*section),
                    *field,
                ))),
                _ => None,
            };
        }
        if let Some(rest) = raw.strip_prefix("section-sortable-") {
            return rest.parse().ok().map(Self::SortableSection);
        }
        if let Some(rest) = raw.strip_prefix("section-") {
            return rest.parse().ok().map(|i| Self::Container(SectionPath::root(i)));
        }
        if let Some(rest) = raw.strip_prefix("nested-") {
            let indices = parse_indices(rest)?;
            if indices.len() < 2 {
                return None;
            }
            return Some(Self::Container(SectionPath::new(indices)));
        }
        None
    }
}

impl fmt::Display for DragId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |indices: &[usize]| {
            indices
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("-")
        };
        match self {
            DragId::Field(loc) if loc.section.depth() == 0 => {
                write!(f, "field-{}-{}", join(loc.section.indices()), loc.index)
            }
            DragId::Field(loc) => {
                write!(f, "nested-field-{}-{}", join(loc.section.indices()), loc.index)
            }
            DragId::Container(path) if path.depth() == 0 => {
                write!(f, "section-{}", join(path.indices()))
            }
            DragId::Container(path) => write!(f, "nested-{}", join(path.indices())),
            DragId::SortableSection(idx) => write!(f, "section-sortable-{idx}"),
        }
    }
}

/// What the user picked up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DragSource {
    /// A palette entry; creates a new field on drop.
    Palette(FieldType),
    /// An element already on the canvas, by its [`DragId`] string.
    Item(String),
}

/// Vertical geometry of the hovered element and the pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerHint {
    pub target_top: f32,
    pub target_height: f32,
    pub pointer_y: f32,
}

impl PointerHint {
    fn above_midpoint(&self) -> bool {
        self.pointer_y < self.target_top + self.target_height / 2.0
    }
}

/// Where a dropped field would land: a container and an insertion index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropIndicator {
    pub section: SectionPath,
    pub field_index: usize,
}

impl DropIndicator {
    pub fn section_index(&self) -> Option<usize> {
        self.section.top()
    }

    /// Index of the nested container, when the target is not top-level.
    pub fn nested_index(&self) -> Option<usize> {
        if self.section.depth() == 0 {
            None
        } else {
            self.section.last()
        }
    }
}

/// The single edit a finished gesture produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    Inserted(FieldLocation),
    Moved { from: FieldLocation, to: FieldLocation },
    SectionsReordered { from: usize, to: usize },
    Rejected(BuilderError),
    NoOp,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Dragging {
    NewField(FieldType),
    Field(FieldLocation),
    Section(usize),
}

/// Unique `{type}_{millis}` names for new fields.
///
/// Stamps never repeat within one generator and skip names already in the form.
#[derive(Clone, Debug, Default)]
pub struct NameGenerator {
    last_stamp: i128,
}

impl NameGenerator {
    pub fn next_name(&mut self, form: &Form, field_type: FieldType) -> String {
        let now = time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
        let mut stamp = now.max(self.last_stamp + 1);
        loop {
            let name = format!("{}_{stamp}", field_type.as_str());
            if !form.contains_field_name(&name) {
                self.last_stamp = stamp;
                return name;
            }
            stamp += 1;
        }
    }
}

/// A new field of `field_type` with a generated name and type defaults.
pub fn new_field(
    form: &Form,
    field_type: FieldType,
    names: &mut NameGenerator,
    settings: &BuilderSettings,
) -> Field {
    let name = names.next_name(form, field_type);
    let mut field = Field::new(
        name,
        FieldKind::for_type(field_type, &settings.grid_seed_columns),
    );
    field.placeholder = Some(settings.placeholder_for(field_type));
    if let Some(grid) = field.grid_mut() {
        grid.default_rows = Some(settings.default_grid_rows);
    }
    field
}

/// Insert `field` into the container at `section`, at `index` or appended.
///
/// Indices past the end clamp to an append.
pub fn insert_field(
    form: &mut Form,
    section: &SectionPath,
    index: Option<usize>,
    field: Field,
) -> Result<FieldLocation, BuilderError> {
    if field.name.trim().is_empty() {
        return Err(BuilderError::EmptyFieldName);
    }
    if form.contains_field_name(&field.name) {
        return Err(BuilderError::DuplicateFieldName(field.name));
    }
    let target = form
        .section_mut(section)
        .ok_or_else(|| BuilderError::SectionNotFound(section.clone()))?;
    let at = index.unwrap_or(target.fields.len()).min(target.fields.len());
    target.fields.insert(at, field);
    Ok(FieldLocation::new(section.clone(), at))
}

/// Move a field to `to_index` of the container at `to_section`.
///
/// `to_index` is an insertion point counted before the removal, as the drop
/// indicator reports it; within one container a later target is shifted down by
/// one. The move is reverted when it would break a section condition.
pub fn move_field(
    form: &mut Form,
    from: &FieldLocation,
    to_section: &SectionPath,
    to_index: usize,
) -> Result<FieldLocation, BuilderError> {
    if form.field(from).is_none() {
        return Err(BuilderError::FieldNotFound {
            section: from.section.clone(),
            index: from.index,
        });
    }
    if form.section(to_section).is_none() {
        return Err(BuilderError::SectionNotFound(to_section.clone()));
    }

    let before = dependency_issues(form);
    let mut adjusted = to_index;
    if from.section == *to_section && from.index < to_index {
        adjusted -= 1;
    }

    let Some(source) = form.section_mut(&from.section) else {
        return Err(BuilderError::SectionNotFound(from.section.clone()));
    };
    let field = source.fields.remove(from.index);
    let Some(target) = form.section_mut(to_section) else {
        return Err(BuilderError::SectionNotFound(to_section.clone()));
    };
    let at = adjusted.min(target.fields.len());
    target.fields.insert(at, field);
    let to = FieldLocation::new(to_section.clone(), at);

    if let Some(err) = new_dependency_issue(&before, form) {
        if let Some(target) = form.section_mut(to_section) {
            let field = target.fields.remove(at);
            if let Some(source) = form.section_mut(&from.section) {
                source.fields.insert(from.index, field);
            }
        }
        warn!(error = %err, "Field move rejected");
        return Err(err);
    }
    Ok(to)
}

/// Splice the section at `from` out of its sibling list and back in at `to`.
///
/// Reverted when any section condition would then point forward.
pub fn move_section(form: &mut Form, from: &SectionPath, to: usize) -> Result<SectionPath, BuilderError> {
    let from_idx = from
        .last()
        .ok_or_else(|| BuilderError::SectionNotFound(from.clone()))?;
    let len = form
        .siblings(from)
        .map(<[_]>::len)
        .ok_or_else(|| BuilderError::SectionNotFound(from.clone()))?;
    if from_idx >= len || to >= len {
        return Err(BuilderError::SectionNotFound(from.with_last(to.max(from_idx))));
    }
    if from_idx == to {
        return Ok(from.clone());
    }

    let before = dependency_issues(form);
    splice(form, from, from_idx, to);

    if let Some(err) = new_dependency_issue(&before, form) {
        splice(form, from, to, from_idx);
        warn!(error = %err, "Section move rejected");
        return Err(err);
    }
    debug!(from = %from, to, "Section moved");
    Ok(from.with_last(to))
}

fn splice(form: &mut Form, path: &SectionPath, from: usize, to: usize) {
    if let Some(siblings) = form.siblings_mut(path) {
        let section = siblings.remove(from);
        siblings.insert(to, section);
    }
}

/// State of the drag gesture in progress.
#[derive(Clone, Debug, Default)]
pub struct DragSession {
    dragging: Option<Dragging>,
    indicator: Option<DropIndicator>,
}

impl DragSession {
    pub fn is_active(&self) -> bool {
        self.dragging.is_some()
    }

    pub fn indicator(&self) -> Option<&DropIndicator> {
        self.indicator.as_ref()
    }

    /// Container to highlight while dragging.
    pub fn active_container(&self) -> Option<&SectionPath> {
        self.indicator.as_ref().map(|i| &i.section)
    }

    /// Begin a gesture. Ids that do not resolve to an existing item start nothing.
    pub fn start(&mut self, form: &Form, source: DragSource) {
        self.indicator = None;
        self.dragging = match source {
            DragSource::Palette(field_type) => Some(Dragging::NewField(field_type)),
            DragSource::Item(id) => match DragId::parse(&id) {
                Some(DragId::Field(loc)) if form.field(&loc).is_some() => Some(Dragging::Field(loc)),
                Some(DragId::SortableSection(idx)) if idx < form.sections.len() => {
                    Some(Dragging::Section(idx))
                }
                _ => {
                    debug!(id = %id, "Ignoring drag of unknown item");
                    None
                }
            },
        };
    }

    /// Track the element under the pointer and recompute the drop indicator.
    ///
    /// Over a field, the pointer's side of the field's vertical midpoint picks
    /// before or after it; without geometry the drop goes after it. Over a
    /// container, the drop appends. Unrecognized targets keep the last indicator.
    pub fn over(&mut self, form: &Form, over_id: &str, hint: Option<PointerHint>) -> Option<&DropIndicator> {
        if !matches!(self.dragging, Some(Dragging::NewField(_) | Dragging::Field(_))) {
            return None;
        }
        let resolved = match DragId::parse(over_id) {
            Some(DragId::Container(path)) => form.section(&path).map(|s| DropIndicator {
                field_index: s.fields.len(),
                section: path,
            }),
            Some(DragId::Field(loc)) => form
                .section(&loc.section)
                .filter(|s| loc.index < s.fields.len())
                .map(|_| DropIndicator {
                    field_index: if hint.is_some_and(|h| h.above_midpoint()) {
                        loc.index
                    } else {
                        loc.index + 1
                    },
                    section: loc.section,
                }),
            _ => None,
        };
        if let Some(indicator) = resolved {
            self.indicator = Some(indicator);
        }
        self.indicator.as_ref()
    }

    /// Abandon the gesture without editing anything.
    pub fn cancel(&mut self) {
        self.dragging = None;
        self.indicator = None;
    }

    /// Finish the gesture and apply at most one edit.
    ///
    /// `over_id` is the element under the pointer at release, `None` when the
    /// pointer left every drop target.
    pub fn end(
        &mut self,
        form: &mut Form,
        selection: &mut Option<Selection>,
        names: &mut NameGenerator,
        settings: &BuilderSettings,
        over_id: Option<&str>,
    ) -> DropOutcome {
        let indicator = self.indicator.take();
        let Some(dragging) = self.dragging.take() else {
            return DropOutcome::NoOp;
        };
        let Some(over_id) = over_id else {
            debug!("Drop without a target");
            return DropOutcome::NoOp;
        };

        match dragging {
            Dragging::NewField(field_type) => {
                let (container, index) = match indicator {
                    Some(indicator) => (indicator.section, Some(indicator.field_index)),
                    None => match DragId::parse(over_id) {
                        Some(DragId::Container(path)) => (path, None),
                        _ => return DropOutcome::NoOp,
                    },
                };
                if form.section(&container).is_none() {
                    return DropOutcome::NoOp;
                }
                let field = new_field(form, field_type, names, settings);
                match insert_field(form, &container, index, field) {
                    Ok(loc) => {
                        debug!(section = %loc.section, index = loc.index, "Inserted new {field_type} field");
                        *selection = selection.take().map(|s| s.after_field_inserted(&loc));
                        DropOutcome::Inserted(loc)
                    }
                    Err(err) => DropOutcome::Rejected(err),
                }
            }
            Dragging::Field(from) => {
                let Some(indicator) = indicator else {
                    return DropOutcome::NoOp;
                };
                match move_field(form, &from, &indicator.section, indicator.field_index) {
                    Ok(to) => {
                        debug!(from = %from.section, to = %to.section, "Moved field");
                        *selection = selection.take().map(|s| s.after_field_moved(&from, &to));
                        DropOutcome::Moved { from, to }
                    }
                    Err(err) => DropOutcome::Rejected(err),
                }
            }
            Dragging::Section(from) => match DragId::parse(over_id) {
                Some(DragId::SortableSection(to)) if to != from => {
                    let path = SectionPath::root(from);
                    match move_section(form, &path, to) {
                        Ok(_) => {
                            *selection = selection.take().map(|s| s.after_section_moved(&path, to));
                            DropOutcome::SectionsReordered { from, to }
                        }
                        Err(err) => DropOutcome::Rejected(err),
                    }
                }
                _ => DropOutcome::NoOp,
            },
        }
    }
}
