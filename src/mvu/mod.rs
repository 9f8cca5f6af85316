// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Root Model-View-Update kernel wiring the form tree, runtime values, drag
//! gestures, and side-effecting commands.

use std::path::PathBuf;

use anyhow::Context;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::{BuilderSettings, RemovalPolicy};
use crate::error::BuilderError;
use crate::logic::dependencies::{DependencyGraph, build_dependency_graph, dependency_issues};
use crate::logic::editor::{self, Removal, SectionEdit};
use crate::logic::placement::{DragSession, DragSource, DropOutcome, NameGenerator, PointerHint};
use crate::logic::selection::Selection;
use crate::logic::structured::{self, Submission};
use crate::models::{
    Field, FieldLocation, FieldType, Form, FormState, GridColumn, GridValue, SectionPath,
};

/// Top-level builder state.
#[derive(Default)]
pub struct BuilderModel {
    /// The form being designed.
    pub form: Form,
    /// Values entered in the preview.
    pub values: FormState,
    /// Derived from `form` after every edit.
    pub graph: DependencyGraph,
    pub selection: Option<Selection>,
    pub drag: DragSession,
    pub settings: BuilderSettings,
    pub names: NameGenerator,
    /// Removal waiting for the user to confirm clearing dependent conditions.
    pub pending_removal: Option<PendingRemoval>,
    /// Latest status message to display.
    pub status: Option<String>,
    /// Latest error message to display in modal.
    pub error: Option<String>,
}

impl BuilderModel {
    pub fn new(form: Form, settings: BuilderSettings) -> Self {
        let mut model = Self {
            settings,
            ..Self::default()
        };
        if let Some(issue) = replace_form(&mut model, form) {
            surface_event(&mut model, format!("Warning: {issue}"), false);
        }
        model
    }
}

/// A removal held back because other sections depend on its target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PendingRemoval {
    Field(FieldLocation),
    Section(SectionPath),
}

/// Builder messages routed through the update function.
#[derive(Clone, Debug, PartialEq)]
pub enum Msg {
    AddSection,
    AddNestedSection(SectionPath),
    AddField {
        section: SectionPath,
        field_type: FieldType,
    },
    Select(Option<Selection>),
    UpdateField {
        loc: FieldLocation,
        field: Field,
    },
    UpdateSection {
        path: SectionPath,
        edit: SectionEdit,
    },
    SetConditionField {
        path: SectionPath,
        field: Option<String>,
    },
    SetConditionValue {
        path: SectionPath,
        value: String,
    },
    RemoveField(FieldLocation),
    RemoveSection(SectionPath),
    ConfirmRemoval,
    CancelRemoval,
    MoveFieldUp(FieldLocation),
    MoveFieldDown(FieldLocation),
    MoveSectionUp(SectionPath),
    MoveSectionDown(SectionPath),
    AddGridColumn(FieldLocation),
    UpdateGridColumn {
        loc: FieldLocation,
        index: usize,
        column: GridColumn,
    },
    RemoveGridColumn {
        loc: FieldLocation,
        index: usize,
    },
    MoveGridColumn {
        loc: FieldLocation,
        from: usize,
        to: usize,
    },
    DragStarted(DragSource),
    DragOver {
        over_id: String,
        hint: Option<PointerHint>,
    },
    DragEnded {
        over_id: Option<String>,
    },
    DragCancelled,
    ValueChanged {
        name: String,
        value: Value,
    },
    FieldBlurred(String),
    GridChanged {
        name: String,
        value: GridValue,
    },
    GridRowAdded(String),
    GridRowRemoved {
        name: String,
        row: usize,
    },
    GridCellChanged {
        name: String,
        row: usize,
        column: String,
        value: Value,
    },
    Submit,
    SubmissionDelivered(Result<(), String>),
    LoadSample,
    JsonPasted(String),
    LoadRequested(PathBuf),
    LoadCompleted {
        source: PathBuf,
        result: Result<Form, String>,
    },
    SaveRequested(PathBuf),
    SaveCompleted(Result<PathBuf, String>),
    CopyJsonRequested,
    ClipboardCompleted(Result<(), String>),
    DismissError,
}

/// Commands represent side-effects executed between frames.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    ReadForm(PathBuf),
    WriteForm { path: PathBuf, json: String },
    CopyToClipboard(String),
    DeliverSubmission(Submission),
}

/// Host-provided sinks for clipboard export and submission delivery.
pub trait Collaborator {
    fn copy_to_clipboard(&mut self, text: &str) -> anyhow::Result<()>;
    fn submit(&mut self, submission: &Submission) -> anyhow::Result<()>;
}

/// Update the builder model and enqueue commands.
pub fn update(model: &mut BuilderModel, msg: Msg, cmds: &mut Vec<Command>) {
    match msg {
        Msg::AddSection => {
            let path = editor::add_section(&mut model.form);
            model.selection = Some(Selection::Section(path));
            after_edit(model);
        }
        Msg::AddNestedSection(parent) => match editor::add_nested_section(&mut model.form, &parent) {
            Ok(path) => {
                model.selection = Some(Selection::Section(path));
                after_edit(model);
            }
            Err(err) => reject(model, err),
        },
        Msg::AddField {
            section,
            field_type,
        } => match editor::add_field(
            &mut model.form,
            &section,
            field_type,
            &mut model.names,
            &model.settings,
        ) {
            Ok(loc) => {
                model.selection = Some(Selection::Field(loc));
                after_edit(model);
            }
            Err(err) => reject(model, err),
        },
        Msg::Select(selection) => model.selection = selection,
        Msg::UpdateField { loc, field } => {
            match editor::update_field(&mut model.form, &loc, field) {
                Ok(()) => after_edit(model),
                Err(err) => reject(model, err),
            }
        }
        Msg::UpdateSection { path, edit } => {
            match editor::update_section(&mut model.form, &path, edit) {
                Ok(()) => after_edit(model),
                Err(err) => reject(model, err),
            }
        }
        Msg::SetConditionField { path, field } => {
            match editor::set_condition_field(&mut model.form, &path, field) {
                Ok(()) => after_edit(model),
                Err(err) => reject(model, err),
            }
        }
        Msg::SetConditionValue { path, value } => {
            match editor::set_condition_value(&mut model.form, &path, value) {
                Ok(()) => after_edit(model),
                Err(err) => reject(model, err),
            }
        }
        Msg::RemoveField(loc) => {
            let policy = model.settings.removal_policy;
            remove(model, PendingRemoval::Field(loc), policy);
        }
        Msg::RemoveSection(path) => {
            let policy = model.settings.removal_policy;
            remove(model, PendingRemoval::Section(path), policy);
        }
        Msg::ConfirmRemoval => {
            if let Some(pending) = model.pending_removal.take() {
                remove(model, pending, RemovalPolicy::ClearDependents);
            }
        }
        Msg::CancelRemoval => {
            if model.pending_removal.take().is_some() {
                surface_event(model, "Removal cancelled.".to_string(), false);
            }
        }
        Msg::MoveFieldUp(loc) => {
            let result = editor::move_field_up(&mut model.form, &loc);
            moved_field(model, &loc, result);
        }
        Msg::MoveFieldDown(loc) => {
            let result = editor::move_field_down(&mut model.form, &loc);
            moved_field(model, &loc, result);
        }
        Msg::MoveSectionUp(path) => {
            let result = editor::move_section_up(&mut model.form, &path);
            moved_section(model, &path, result);
        }
        Msg::MoveSectionDown(path) => {
            let result = editor::move_section_down(&mut model.form, &path);
            moved_section(model, &path, result);
        }
        Msg::AddGridColumn(loc) => {
            let result = editor::add_grid_column(&mut model.form, &loc).map(|_| ());
            edited(model, result);
        }
        Msg::UpdateGridColumn { loc, index, column } => {
            let result = editor::update_grid_column(&mut model.form, &loc, index, column);
            edited(model, result);
        }
        Msg::RemoveGridColumn { loc, index } => {
            let result = editor::remove_grid_column(&mut model.form, &loc, index).map(|_| ());
            edited(model, result);
        }
        Msg::MoveGridColumn { loc, from, to } => {
            let result = editor::move_grid_column(&mut model.form, &loc, from, to);
            edited(model, result);
        }
        Msg::DragStarted(source) => model.drag.start(&model.form, source),
        Msg::DragOver { over_id, hint } => {
            model.drag.over(&model.form, &over_id, hint);
        }
        Msg::DragEnded { over_id } => {
            let outcome = model.drag.end(
                &mut model.form,
                &mut model.selection,
                &mut model.names,
                &model.settings,
                over_id.as_deref(),
            );
            match outcome {
                DropOutcome::NoOp => {}
                DropOutcome::Rejected(err) => reject(model, err),
                DropOutcome::Inserted(_)
                | DropOutcome::Moved { .. }
                | DropOutcome::SectionsReordered { .. } => after_edit(model),
            }
        }
        Msg::DragCancelled => model.drag.cancel(),
        Msg::ValueChanged { name, value } => model.values.handle_change(&name, value),
        Msg::FieldBlurred(name) => model.values.handle_blur(&name),
        Msg::GridChanged { name, value } => model.values.handle_grid_change(&name, value),
        Msg::GridRowAdded(name) => model.values.add_grid_row(&name),
        Msg::GridRowRemoved { name, row } => model.values.remove_grid_row(&name, row),
        Msg::GridCellChanged {
            name,
            row,
            column,
            value,
        } => model.values.set_grid_cell(&name, row, &column, value),
        Msg::Submit => match structured::submit(&model.form, &mut model.values) {
            Ok(submission) => cmds.push(Command::DeliverSubmission(submission)),
            Err(report) => surface_event(
                model,
                format!("Please fix {} field(s) before submitting.", report.errors.len()),
                false,
            ),
        },
        Msg::SubmissionDelivered(result) => match result {
            Ok(()) => surface_event(model, "Form submitted.".to_string(), false),
            Err(err) => surface_event(model, format!("Failed to submit form:\n\n{err}"), true),
        },
        Msg::LoadSample => load_form(model, Form::sample(), "Loaded sample form.".to_string()),
        Msg::JsonPasted(text) => match Form::from_json(&text) {
            Ok(form) => load_form(model, form, "Form replaced from pasted JSON.".to_string()),
            Err(err) => surface_event(model, format!("{err:#}"), true),
        },
        Msg::LoadRequested(path) => cmds.push(Command::ReadForm(path)),
        Msg::LoadCompleted { source, result } => match result {
            Ok(form) => load_form(model, form, format!("Loaded form: {}", source.display())),
            Err(err) => surface_event(model, format!("Failed to load form:\n\n{err}"), true),
        },
        Msg::SaveRequested(path) => match model.form.to_json_pretty() {
            Ok(json) => cmds.push(Command::WriteForm { path, json }),
            Err(err) => surface_event(model, format!("{err:#}"), true),
        },
        Msg::SaveCompleted(result) => match result {
            Ok(path) => surface_event(model, format!("Form saved: {}", path.display()), false),
            Err(err) => surface_event(model, format!("Failed to save form:\n\n{err}"), true),
        },
        Msg::CopyJsonRequested => match model.form.to_json_pretty() {
            Ok(json) => cmds.push(Command::CopyToClipboard(json)),
            Err(err) => surface_event(model, format!("{err:#}"), true),
        },
        Msg::ClipboardCompleted(result) => match result {
            Ok(()) => surface_event(model, "Form JSON copied to clipboard.".to_string(), false),
            Err(err) => surface_event(model, format!("Failed to copy JSON:\n\n{err}"), true),
        },
        Msg::DismissError => model.error = None,
    }
}

/// Execute a command synchronously and return the resulting message.
pub fn run_command(cmd: Command, collaborator: &mut dyn Collaborator) -> Msg {
    match cmd {
        Command::ReadForm(path) => {
            let result = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read form file {:?}", path))
                .and_then(|text| Form::from_json(&text))
                .map_err(|err| format!("{err:#}"));
            Msg::LoadCompleted {
                source: path,
                result,
            }
        }
        Command::WriteForm { path, json } => {
            let result = std::fs::write(&path, json)
                .with_context(|| format!("Failed to write form file {:?}", path))
                .map(|_| path)
                .map_err(|err| format!("{err:#}"));
            Msg::SaveCompleted(result)
        }
        Command::CopyToClipboard(text) => Msg::ClipboardCompleted(
            collaborator
                .copy_to_clipboard(&text)
                .map_err(|err| format!("{err:#}")),
        ),
        Command::DeliverSubmission(submission) => {
            info!("Delivering submission");
            Msg::SubmissionDelivered(
                collaborator
                    .submit(&submission)
                    .map_err(|err| format!("{err:#}")),
            )
        }
    }
}

/// Update status/error fields consistently for user feedback.
fn surface_event(model: &mut BuilderModel, message: String, is_error: bool) {
    if is_error {
        model.error = Some(message.clone());
    }
    model.status = Some(message);
}

fn reject(model: &mut BuilderModel, err: BuilderError) {
    warn!(error = %err, "Edit rejected");
    surface_event(model, err.to_string(), true);
}

/// Rebuild derived state after a structural edit.
fn after_edit(model: &mut BuilderModel) {
    model.graph = build_dependency_graph(&model.form);
    model
        .values
        .sync_with(&model.form, model.settings.default_grid_rows);
}

fn edited(model: &mut BuilderModel, result: Result<(), BuilderError>) {
    match result {
        Ok(()) => after_edit(model),
        Err(err) => reject(model, err),
    }
}

fn moved_field(model: &mut BuilderModel, from: &FieldLocation, result: Result<FieldLocation, BuilderError>) {
    match result {
        Ok(to) => {
            model.selection = model.selection.take().map(|s| s.after_field_moved(from, &to));
            after_edit(model);
        }
        Err(err) => reject(model, err),
    }
}

fn moved_section(model: &mut BuilderModel, from: &SectionPath, result: Result<SectionPath, BuilderError>) {
    match result {
        Ok(to) => {
            if let Some(to_idx) = to.last() {
                model.selection = model
                    .selection
                    .take()
                    .map(|s| s.after_section_moved(from, to_idx));
            }
            after_edit(model);
        }
        Err(err) => reject(model, err),
    }
}

fn remove(model: &mut BuilderModel, target: PendingRemoval, policy: RemovalPolicy) {
    let result = match &target {
        PendingRemoval::Field(loc) => editor::remove_field(&mut model.form, loc, policy),
        PendingRemoval::Section(path) => editor::remove_section(&mut model.form, path, policy),
    };
    match result {
        Ok(Removal { cleared_conditions }) => {
            model.selection = model.selection.take().and_then(|s| match &target {
                PendingRemoval::Field(loc) => s.after_field_removed(loc),
                PendingRemoval::Section(path) => s.after_section_removed(path),
            });
            if !cleared_conditions.is_empty() {
                surface_event(
                    model,
                    format!("Cleared conditions on: {}", cleared_conditions.join(", ")),
                    false,
                );
            }
            after_edit(model);
        }
        Err(err @ BuilderError::HasDependents { .. }) => {
            model.pending_removal = Some(target);
            surface_event(
                model,
                format!("{err}. Confirm to remove it and clear those conditions."),
                false,
            );
        }
        Err(err) => reject(model, err),
    }
}

/// Swap in a new form and reset everything derived from the old one.
///
/// Returns the first dependency problem the loaded form already has.
fn replace_form(model: &mut BuilderModel, form: Form) -> Option<BuilderError> {
    model.values = FormState::for_form(&form, model.settings.default_grid_rows);
    model.graph = build_dependency_graph(&form);
    model.form = form;
    model.selection = None;
    model.pending_removal = None;
    model.drag.cancel();

    let issues = dependency_issues(&model.form);
    for issue in &issues {
        warn!(issue = %issue, "Loaded form has a dependency problem");
    }
    info!(sections = model.form.sections.len(), "Form loaded");
    issues.into_iter().next()
}

fn load_form(model: &mut BuilderModel, form: Form, message: String) {
    let message = match replace_form(model, form) {
        Some(issue) => format!("{message}\nWarning: {issue}"),
        None => message,
    };
    surface_event(model, message, false);
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    #[derive(Default)]
    struct RecordingCollaborator {
        clipboard: Vec<String>,
        submissions: Vec<Submission>,
    }

    impl Collaborator for RecordingCollaborator {
        fn copy_to_clipboard(&mut self, text: &str) -> anyhow::Result<()> {
            self.clipboard.push(text.to_string());
            Ok(())
        }

        fn submit(&mut self, submission: &Submission) -> anyhow::Result<()> {
            self.submissions.push(submission.clone());
            Ok(())
        }
    }

    fn run_all(model: &mut BuilderModel, cmds: Vec<Command>, collaborator: &mut RecordingCollaborator) {
        for cmd in cmds {
            let msg = run_command(cmd, collaborator);
            let mut follow_up = Vec::new();
            update(model, msg, &mut follow_up);
            assert!(follow_up.is_empty());
        }
    }

    fn builder_with_field() -> (BuilderModel, FieldLocation) {
        let mut model = BuilderModel::new(Form::sample(), BuilderSettings::default());
        let mut cmds = Vec::new();
        update(
            &mut model,
            Msg::AddField {
                section: SectionPath::root(0),
                field_type: FieldType::Text,
            },
            &mut cmds,
        );
        assert!(cmds.is_empty());
        let Some(Selection::Field(loc)) = model.selection.clone() else {
            panic!("new field should be selected");
        };
        (model, loc)
    }

    #[test]
    fn save_then_load_round_trips_through_commands() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("form.json");
        let (mut model, _) = builder_with_field();
        let saved = model.form.clone();
        let mut collaborator = RecordingCollaborator::default();

        let mut cmds = Vec::new();
        update(&mut model, Msg::SaveRequested(path.clone()), &mut cmds);
        assert_eq!(cmds.len(), 1, "save should enqueue command");
        run_all(&mut model, cmds, &mut collaborator);
        assert!(model.error.is_none());
        assert!(model.status.as_deref().is_some_and(|s| s.contains("Form saved")));

        update(&mut model, Msg::LoadSample, &mut Vec::new());
        assert_ne!(model.form, saved);

        let mut cmds = Vec::new();
        update(&mut model, Msg::LoadRequested(path), &mut cmds);
        run_all(&mut model, cmds, &mut collaborator);
        assert_eq!(model.form, saved);
        assert!(model.selection.is_none());
    }

    #[test]
    fn load_missing_file_sets_error() {
        let tmp = TempDir::new().unwrap();
        let mut model = BuilderModel::default();
        let mut collaborator = RecordingCollaborator::default();

        let msg = run_command(Command::ReadForm(tmp.path().join("nope.json")), &mut collaborator);
        update(&mut model, msg, &mut Vec::new());

        assert!(model
            .error
            .as_deref()
            .is_some_and(|e| e.contains("Failed to read form file")));
    }

    #[test]
    fn malformed_paste_keeps_current_form() {
        let (mut model, _) = builder_with_field();
        let before = model.form.clone();

        update(&mut model, Msg::JsonPasted("{ not json".into()), &mut Vec::new());

        assert_eq!(model.form, before);
        assert!(model.error.is_some());
        update(&mut model, Msg::DismissError, &mut Vec::new());
        assert!(model.error.is_none());
    }

    #[test]
    fn pasted_form_resets_runtime_state() {
        let (mut model, loc) = builder_with_field();
        let name = model.form.field(&loc).unwrap().name.clone();
        update(
            &mut model,
            Msg::ValueChanged {
                name: name.clone(),
                value: json!("typed"),
            },
            &mut Vec::new(),
        );

        let pasted = json!({
            "sections": [{ "id": "s1", "name": "Other", "objectName": "other",
                "fields": [{ "name": "x", "type": "number", "label": "X" }] }]
        })
        .to_string();
        update(&mut model, Msg::JsonPasted(pasted), &mut Vec::new());

        assert!(model.values.value(&name).is_none());
        assert_eq!(model.values.value("x"), Some(&json!("")));
        assert!(model.error.is_none());
    }

    #[test]
    fn submit_delivers_payload_through_collaborator() {
        let (mut model, loc) = builder_with_field();
        let mut field = model.form.field(&loc).unwrap().clone();
        field.required = true;
        let name = field.name.clone();
        update(&mut model, Msg::UpdateField { loc, field }, &mut Vec::new());

        let mut cmds = Vec::new();
        update(&mut model, Msg::Submit, &mut cmds);
        assert!(cmds.is_empty(), "invalid form must not submit");
        assert!(model.values.error(&name).is_some());

        update(
            &mut model,
            Msg::ValueChanged {
                name: name.clone(),
                value: json!("hello"),
            },
            &mut Vec::new(),
        );
        let mut cmds = Vec::new();
        update(&mut model, Msg::Submit, &mut cmds);
        let mut collaborator = RecordingCollaborator::default();
        run_all(&mut model, cmds, &mut collaborator);

        assert_eq!(collaborator.submissions.len(), 1);
        assert_eq!(
            collaborator.submissions[0].structured_data,
            json!({ "userDetails": { name: "hello" } })
        );
        assert_eq!(model.status.as_deref(), Some("Form submitted."));
    }

    #[test]
    fn copy_json_goes_to_clipboard() {
        let mut model = BuilderModel::new(Form::sample(), BuilderSettings::default());
        let mut cmds = Vec::new();
        update(&mut model, Msg::CopyJsonRequested, &mut cmds);
        let mut collaborator = RecordingCollaborator::default();
        run_all(&mut model, cmds, &mut collaborator);

        assert_eq!(collaborator.clipboard.len(), 1);
        assert!(collaborator.clipboard[0].contains("userDetails"));
    }

    #[test]
    fn blocked_removal_waits_for_confirmation() {
        let (mut model, loc) = builder_with_field();
        update(&mut model, Msg::AddSection, &mut Vec::new());
        let gate = model.form.field(&loc).unwrap().name.clone();
        update(
            &mut model,
            Msg::SetConditionField {
                path: SectionPath::root(1),
                field: Some(gate.clone()),
            },
            &mut Vec::new(),
        );
        assert!(model.error.is_none());
        assert_eq!(model.graph.dependents_of(&model.form.sections[0].id).len(), 1);

        update(&mut model, Msg::RemoveField(loc.clone()), &mut Vec::new());
        assert_eq!(model.pending_removal, Some(PendingRemoval::Field(loc.clone())));
        assert!(model.form.field(&loc).is_some());

        update(&mut model, Msg::ConfirmRemoval, &mut Vec::new());
        assert!(model.pending_removal.is_none());
        assert!(model.form.field(&loc).is_none());
        assert_eq!(model.form.sections[1].condition_field, None);
        assert!(model.graph.dependents_of(&model.form.sections[0].id).is_empty());
    }

    #[test]
    fn rejected_condition_surfaces_error() {
        let mut model = BuilderModel::new(Form::sample(), BuilderSettings::default());
        update(&mut model, Msg::AddSection, &mut Vec::new());
        update(
            &mut model,
            Msg::AddField {
                section: SectionPath::root(1),
                field_type: FieldType::Checkbox,
            },
            &mut Vec::new(),
        );
        let later = model.form.sections[1].fields[0].name.clone();

        update(
            &mut model,
            Msg::SetConditionField {
                path: SectionPath::root(0),
                field: Some(later),
            },
            &mut Vec::new(),
        );
        assert!(model.error.as_deref().is_some_and(|e| e.contains("comes after it")));
        assert_eq!(model.form.sections[0].condition_field, None);
    }

    #[test]
    fn drag_from_palette_inserts_field_and_seeds_values() {
        let mut model = BuilderModel::new(Form::sample(), BuilderSettings::default());
        let mut cmds = Vec::new();
        update(&mut model, Msg::DragStarted(DragSource::Palette(FieldType::Grid)), &mut cmds);
        update(
            &mut model,
            Msg::DragOver {
                over_id: "section-0".into(),
                hint: None,
            },
            &mut cmds,
        );
        update(
            &mut model,
            Msg::DragEnded {
                over_id: Some("section-0".into()),
            },
            &mut cmds,
        );

        assert!(cmds.is_empty());
        let field = &model.form.sections[0].fields[0];
        assert!(field.is_grid());
        assert_eq!(model.values.grid_values[&field.name].rows.len(), 1);
        assert!(model.drag.indicator().is_none());
    }

    #[test]
    fn removed_grid_rows_survive_structural_edits() {
        let mut model = BuilderModel::new(Form::sample(), BuilderSettings::default());
        update(
            &mut model,
            Msg::AddField {
                section: SectionPath::root(0),
                field_type: FieldType::Grid,
            },
            &mut Vec::new(),
        );
        let name = model.form.sections[0].fields[0].name.clone();
        assert_eq!(model.values.grid_values[&name].rows.len(), 1);

        update(
            &mut model,
            Msg::GridRowRemoved {
                name: name.clone(),
                row: 0,
            },
            &mut Vec::new(),
        );
        update(&mut model, Msg::AddSection, &mut Vec::new());

        assert_eq!(model.values.grid_values[&name].rows.len(), 0);
    }

    fn forward_dependency_json() -> String {
        json!({
            "sections": [
                { "id": "a", "name": "A", "objectName": "a", "fields": [],
                  "conditionField": "later", "conditionValue": "x" },
                { "id": "b", "name": "B", "objectName": "b",
                  "fields": [{ "name": "later", "type": "text", "label": "Later" }] }
            ]
        })
        .to_string()
    }

    #[test]
    fn loaded_form_with_forward_dependency_warns() {
        let mut model = BuilderModel::default();
        update(&mut model, Msg::JsonPasted(forward_dependency_json()), &mut Vec::new());

        assert_eq!(model.form.sections.len(), 2);
        assert!(model.error.is_none());
        assert!(model.status.as_deref().is_some_and(|s| s.contains("Warning: Moving this")));
    }

    #[test]
    fn new_model_surfaces_dependency_warning() {
        let form = Form::from_json(&forward_dependency_json()).unwrap();
        let model = BuilderModel::new(form, BuilderSettings::default());

        assert!(model.error.is_none());
        assert!(model
            .status
            .as_deref()
            .is_some_and(|s| s.starts_with("Warning: Moving this")));
    }
}
