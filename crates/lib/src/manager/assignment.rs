//! A single binding of a managed resource to a shape tree.

use url::Url;

use crate::error::{Result, ShapeTreeError};
use crate::graph::RdfGraph;
use crate::vocab::{rdf, shapetree};

/// Immutable assignment value.
///
/// `url` is the assignment's slot within its manager; every other field is
/// content. Two assignments occupy the same slot when their `url`s match and
/// are unchanged when all fields match (`==`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShapeTreeAssignment {
  shape_tree: Url,
  managed_resource: Url,
  root_assignment: Url,
  focus_node: Option<Url>,
  shape: Option<Url>,
  url: Url,
}

impl ShapeTreeAssignment {
  /// Create an assignment.
  ///
  /// Fails with an input error when a `shape` is given without a
  /// `focus_node` to validate it against.
  pub fn new(
    shape_tree: Url,
    managed_resource: Url,
    root_assignment: Url,
    focus_node: Option<Url>,
    shape: Option<Url>,
    url: Url,
  ) -> Result<Self> {
    if shape.is_some() && focus_node.is_none() {
      return Err(ShapeTreeError::Input(format!(
        "assignment {} names a shape but no focus node",
        url
      )));
    }
    Ok(Self {
      shape_tree,
      managed_resource,
      root_assignment,
      focus_node,
      shape,
      url,
    })
  }

  pub fn shape_tree(&self) -> &Url {
    &self.shape_tree
  }

  pub fn managed_resource(&self) -> &Url {
    &self.managed_resource
  }

  pub fn root_assignment(&self) -> &Url {
    &self.root_assignment
  }

  pub fn focus_node(&self) -> Option<&Url> {
    self.focus_node.as_ref()
  }

  pub fn shape(&self) -> Option<&Url> {
    self.shape.as_ref()
  }

  pub fn url(&self) -> &Url {
    &self.url
  }

  /// Whether this assignment is the root of its assignment hierarchy.
  pub fn is_root(&self) -> bool {
    self.root_assignment == self.url
  }

  pub(crate) fn add_to_graph(&self, graph: &mut RdfGraph) {
    let subject = self.url.as_str();
    graph.add_iri_triple(subject, rdf::TYPE, shapetree::ASSIGNMENT);
    graph.add_iri_triple(subject, shapetree::ASSIGNS, self.shape_tree.as_str());
    graph.add_iri_triple(subject, shapetree::MANAGES, self.managed_resource.as_str());
    graph.add_iri_triple(subject, shapetree::HAS_ROOT_ASSIGNMENT, self.root_assignment.as_str());
    if let Some(focus_node) = &self.focus_node {
      graph.add_iri_triple(subject, shapetree::FOCUS_NODE, focus_node.as_str());
    }
    if let Some(shape) = &self.shape {
      graph.add_iri_triple(subject, shapetree::SHAPE, shape.as_str());
    }
  }

  /// Read the assignment described by `url` in `graph`.
  pub(crate) fn from_graph(graph: &RdfGraph, url: &str) -> Result<Self> {
    let required = |predicate: &str| -> Result<Url> {
      let value = graph.iri_object(url, predicate).ok_or_else(|| {
        ShapeTreeError::Protocol(format!("assignment {} is missing required property {}", url, predicate))
      })?;
      parse_iri(&value)
    };
    let optional = |predicate: &str| -> Result<Option<Url>> {
      graph.iri_object(url, predicate).map(|value| parse_iri(&value)).transpose()
    };

    Self::new(
      required(shapetree::ASSIGNS)?,
      required(shapetree::MANAGES)?,
      required(shapetree::HAS_ROOT_ASSIGNMENT)?,
      optional(shapetree::FOCUS_NODE)?,
      optional(shapetree::SHAPE)?,
      parse_iri(url)?,
    )
  }
}

fn parse_iri(value: &str) -> Result<Url> {
  Url::parse(value).map_err(|e| ShapeTreeError::Protocol(format!("unparseable iri {} in manager: {}", value, e)))
}
