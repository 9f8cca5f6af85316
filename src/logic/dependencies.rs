// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Section dependency graph, forward-only condition checks, and cycle detection.
//!
//! The graph is a pure projection of the form and is rebuilt after every edit.
//! Conditions may only point backwards in document order: a section can depend on
//! fields of earlier siblings, of earlier sections anywhere above it, or of its own
//! ancestors, never on its own fields, its descendants' fields, or later sections.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::error::BuilderError;
use crate::models::{Form, SectionPath, Walk};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Section,
    Field,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Section visibility depends on a field value.
    Condition,
    /// Nested section to its parent.
    Containment,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DependencyEdge {
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DependencyGraph {
    pub nodes: Vec<DependencyNode>,
    pub edges: Vec<DependencyEdge>,
}

/// Node id for a field, scoped by its owning section.
pub fn field_node_id(section_id: &str, field_name: &str) -> String {
    format!("{section_id}/{field_name}")
}

/// Project the form into section/field nodes plus condition and containment edges.
///
/// Condition targets resolve to the first field with that name in document order;
/// conditions naming a missing field produce no edge.
pub fn build_dependency_graph(form: &Form) -> DependencyGraph {
    let mut graph = DependencyGraph::default();
    let mut ids_by_path: HashMap<SectionPath, String> = HashMap::new();

    form.visit_sections(|path, section| {
        let parent_id = path.parent().and_then(|p| ids_by_path.get(&p).cloned());
        graph.nodes.push(DependencyNode {
            id: section.id.clone(),
            kind: NodeKind::Section,
            label: section.display_name().to_string(),
            parent_id: parent_id.clone(),
        });
        for field in &section.fields {
            graph.nodes.push(DependencyNode {
                id: field_node_id(&section.id, &field.name),
                kind: NodeKind::Field,
                label: if field.label.is_empty() {
                    field.name.clone()
                } else {
                    field.label.clone()
                },
                parent_id: Some(section.id.clone()),
            });
        }
        if let Some(parent) = parent_id {
            graph.edges.push(DependencyEdge {
                source: section.id.clone(),
                target: parent,
                kind: EdgeKind::Containment,
                condition: None,
            });
        }
        ids_by_path.insert(path.clone(), section.id.clone());
        Walk::Descend
    });

    form.visit_sections(|_, section| {
        if let Some(field_name) = section.condition_field.as_deref().filter(|f| !f.is_empty())
            && let Some(loc) = form.find_field(field_name)
            && let Some(owner) = form.section(&loc.section)
        {
            graph.edges.push(DependencyEdge {
                source: section.id.clone(),
                target: field_node_id(&owner.id, field_name),
                kind: EdgeKind::Condition,
                condition: Some(format!(
                    "equals \"{}\"",
                    section.condition_value.as_deref().unwrap_or_default()
                )),
            });
        }
        Walk::Descend
    });

    graph
}

impl DependencyGraph {
    pub fn node(&self, id: &str) -> Option<&DependencyNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn owner_section<'a>(&'a self, node_id: &'a str) -> &'a str {
        match self.node(node_id) {
            Some(DependencyNode {
                kind: NodeKind::Field,
                parent_id: Some(parent),
                ..
            }) => parent.as_str(),
            _ => node_id,
        }
    }

    /// Section-level adjacency: A -> B when A depends on a field owned by B or A is nested in B.
    pub fn section_adjacency(&self) -> BTreeMap<String, Vec<String>> {
        let mut adjacency: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for node in self.nodes.iter().filter(|n| n.kind == NodeKind::Section) {
            adjacency.entry(node.id.clone()).or_default();
        }
        for edge in &self.edges {
            let target = self.owner_section(&edge.target).to_string();
            adjacency
                .entry(edge.source.clone())
                .or_default()
                .push(target);
        }
        adjacency
    }

    /// First cycle found, as section ids with the start repeated at the end.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        find_cycle(&self.section_adjacency())
    }

    /// Section nodes that depend on nothing and are not nested.
    pub fn roots(&self) -> Vec<&DependencyNode> {
        self.nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Section && n.parent_id.is_none())
            .filter(|n| {
                !self
                    .edges
                    .iter()
                    .any(|e| e.kind == EdgeKind::Condition && e.source == n.id)
            })
            .collect()
    }

    /// Sections whose condition targets a field owned by `section_id`.
    pub fn dependents_of(&self, section_id: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|e| e.kind == EdgeKind::Condition)
            .filter(|e| self.owner_section(&e.target) == section_id)
            .map(|e| e.source.as_str())
            .collect()
    }

    pub fn label_of<'a>(&'a self, id: &'a str) -> &'a str {
        self.node(id).map(|n| n.label.as_str()).unwrap_or(id)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    OnStack,
    Done,
}

/// Depth-first search with an explicit recursion stack.
///
/// Returns the first cycle found, listing node ids from the re-entered node back to itself.
pub fn find_cycle(adjacency: &BTreeMap<String, Vec<String>>) -> Option<Vec<String>> {
    fn visit<'a>(
        node: &'a str,
        adjacency: &'a BTreeMap<String, Vec<String>>,
        marks: &mut HashMap<&'a str, Mark>,
        stack: &mut Vec<&'a str>,
    ) -> Option<Vec<String>> {
        marks.insert(node, Mark::OnStack);
        stack.push(node);
        for next in adjacency.get(node).into_iter().flatten() {
            match marks.get(next.as_str()) {
                Some(Mark::OnStack) => {
                    let start = stack.iter().position(|n| *n == next.as_str()).unwrap_or(0);
                    let mut cycle: Vec<String> =
                        stack[start..].iter().map(|n| n.to_string()).collect();
                    cycle.push(next.clone());
                    return Some(cycle);
                }
                Some(Mark::Done) => {}
                None => {
                    if let Some(cycle) = visit(next, adjacency, marks, stack) {
                        return Some(cycle);
                    }
                }
            }
        }
        stack.pop();
        marks.insert(node, Mark::Done);
        None
    }

    let mut marks = HashMap::new();
    let mut stack = Vec::new();
    for node in adjacency.keys() {
        if marks.contains_key(node.as_str()) {
            continue;
        }
        if let Some(cycle) = visit(node, adjacency, &mut marks, &mut stack) {
            return Some(cycle);
        }
    }
    None
}

/// Field names the section at `path` may use as its condition: every field of
/// every section strictly before it in document order.
pub fn condition_candidates(form: &Form, path: &SectionPath) -> Vec<String> {
    let mut names = Vec::new();
    form.visit_sections(|candidate, section| {
        if candidate < path {
            names.extend(section.fields.iter().map(|f| f.name.clone()));
        }
        Walk::Descend
    });
    names
}

/// Check that the section at `path` may depend on `field_name`.
pub fn check_condition(form: &Form, path: &SectionPath, field_name: &str) -> Result<(), BuilderError> {
    let section = form
        .section(path)
        .ok_or_else(|| BuilderError::SectionNotFound(path.clone()))?;
    let owner_loc = form
        .find_field(field_name)
        .ok_or_else(|| BuilderError::UnknownConditionField(field_name.to_string()))?;
    let owner = form
        .section(&owner_loc.section)
        .ok_or_else(|| BuilderError::SectionNotFound(owner_loc.section.clone()))?;

    if owner_loc.section == *path {
        return Err(BuilderError::SelfReference {
            section: section.display_name().to_string(),
            field: field_name.to_string(),
        });
    }
    if owner_loc.section > *path {
        return Err(BuilderError::ForwardReference {
            section: section.display_name().to_string(),
            field: field_name.to_string(),
            owner: owner.display_name().to_string(),
        });
    }

    let graph = build_dependency_graph(form);
    let mut adjacency = graph.section_adjacency();
    adjacency
        .entry(section.id.clone())
        .or_default()
        .push(owner.id.clone());
    if let Some(cycle) = find_cycle(&adjacency) {
        return Err(BuilderError::CircularDependency(
            cycle.iter().map(|id| graph.label_of(id).to_string()).collect(),
        ));
    }
    Ok(())
}

/// Every ordering violation and the first cycle in the current form.
///
/// Conditions that name a missing field are not reported here; they simply
/// never match.
pub fn dependency_issues(form: &Form) -> Vec<BuilderError> {
    let mut issues = Vec::new();
    form.visit_sections(|path, section| {
        if let Some(field_name) = section.condition_field.as_deref().filter(|f| !f.is_empty())
            && let Some(owner) = form.find_field(field_name)
            && owner.section >= *path
        {
            issues.push(BuilderError::ReorderBreaksDependency {
                section: section.display_name().to_string(),
                field: field_name.to_string(),
            });
        }
        Walk::Descend
    });

    let graph = build_dependency_graph(form);
    if let Some(cycle) = graph.find_cycle() {
        issues.push(BuilderError::CircularDependency(canonical_cycle(
            cycle.iter().map(|id| graph.label_of(id).to_string()).collect(),
        )));
    }
    issues
}

/// Rotate a closed cycle so it starts at its smallest entry.
fn canonical_cycle(mut cycle: Vec<String>) -> Vec<String> {
    cycle.pop();
    if let Some(start) = (0..cycle.len()).min_by_key(|&i| &cycle[i]) {
        cycle.rotate_left(start);
    }
    if let Some(first) = cycle.first().cloned() {
        cycle.push(first);
    }
    cycle
}

/// A dependency problem present now that was not in `before`.
///
/// Structural edits snapshot [`dependency_issues`] first and revert when this
/// returns `Some`, so a form loaded with existing problems stays editable.
pub fn new_dependency_issue(before: &[BuilderError], form: &Form) -> Option<BuilderError> {
    dependency_issues(form)
        .into_iter()
        .find(|issue| !before.contains(issue))
}

/// First dependency problem in the form, if any.
pub fn check_dependency_order(form: &Form) -> Result<(), BuilderError> {
    match dependency_issues(form).into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
