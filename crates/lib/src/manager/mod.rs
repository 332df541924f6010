//! Shape tree managers and their assignments.
//!
//! A manager is the sidecar document that records which shape trees govern a
//! resource. Its in-memory form is a set of [`ShapeTreeAssignment`]s unique by
//! slot; its wire form is an RDF graph serialized as Turtle.

mod assignment;
mod delta;

use std::collections::BTreeMap;

use url::Url;
use uuid::Uuid;

use crate::error::Result;
use crate::graph::RdfGraph;
use crate::vocab::{ASSIGNMENT_FRAGMENT_PREFIX, rdf, shapetree};

pub use assignment::ShapeTreeAssignment;
pub use delta::ShapeTreeManagerDelta;

/// The assignments recorded in one manager document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeTreeManager {
  id: Url,
  assignments: BTreeMap<Url, ShapeTreeAssignment>,
}

impl ShapeTreeManager {
  /// An empty manager identified by its document URL.
  pub fn new(id: Url) -> Self {
    Self {
      id,
      assignments: BTreeMap::new(),
    }
  }

  pub fn id(&self) -> &Url {
    &self.id
  }

  /// Assignments ordered by slot.
  pub fn assignments(&self) -> impl Iterator<Item = &ShapeTreeAssignment> {
    self.assignments.values()
  }

  pub fn len(&self) -> usize {
    self.assignments.len()
  }

  pub fn is_empty(&self) -> bool {
    self.assignments.is_empty()
  }

  /// The assignment occupying slot `url`.
  pub fn assignment(&self, url: &Url) -> Option<&ShapeTreeAssignment> {
    self.assignments.get(url)
  }

  /// The first assignment (by slot) binding the managed resource to `shape_tree`.
  pub fn assignment_for_shape_tree(&self, shape_tree: &Url) -> Option<&ShapeTreeAssignment> {
    self.assignments().find(|a| a.shape_tree() == shape_tree)
  }

  /// Add `assignment`, replacing whatever occupied its slot.
  pub fn add_assignment(&mut self, assignment: ShapeTreeAssignment) {
    self.assignments.insert(assignment.url().clone(), assignment);
  }

  /// Remove every assignment for `shape_tree`, whatever its slot.
  ///
  /// Returns the number of assignments removed.
  pub fn remove_assignment_for_shape_tree(&mut self, shape_tree: &Url) -> usize {
    let before = self.assignments.len();
    self.assignments.retain(|_, a| a.shape_tree() != shape_tree);
    before - self.assignments.len()
  }

  /// Mint an assignment URL not already used as a slot in this manager.
  pub fn mint_assignment_url(&self) -> Url {
    loop {
      let mut candidate = self.id.clone();
      candidate.set_fragment(Some(&format!(
        "{}{}",
        ASSIGNMENT_FRAGMENT_PREFIX,
        Uuid::new_v4().simple()
      )));
      if !self.assignments.contains_key(&candidate) {
        return candidate;
      }
    }
  }

  /// The manager's RDF graph, derived from its assignments.
  pub fn to_graph(&self) -> RdfGraph {
    let mut graph = RdfGraph::new();
    let subject = self.id.as_str();
    graph.add_iri_triple(subject, rdf::TYPE, shapetree::MANAGER);
    for assignment in self.assignments() {
      graph.add_iri_triple(subject, shapetree::HAS_ASSIGNMENT, assignment.url().as_str());
      assignment.add_to_graph(&mut graph);
    }
    graph
  }

  /// Serialize as Turtle for a PUT to the manager URL.
  pub fn to_turtle(&self) -> Result<String> {
    Ok(self.to_graph().to_turtle()?)
  }

  /// Rebuild the manager identified by `id` from its graph.
  ///
  /// A graph without assignments for `id` yields an empty manager.
  pub fn from_graph(id: &Url, graph: &RdfGraph) -> Result<Self> {
    let mut manager = Self::new(id.clone());
    for slot in graph.iri_objects(id.as_str(), shapetree::HAS_ASSIGNMENT) {
      manager.add_assignment(ShapeTreeAssignment::from_graph(graph, &slot)?);
    }
    Ok(manager)
  }
}
