use url::Url;

use crate::attributes::ResourceAttributes;
use crate::vocab::{header, ldp, rel};

/// Inputs for creating or updating a managed resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagedInstanceRequest {
  /// Nodes the server should validate the body against.
  pub focus_nodes: Vec<Url>,
  /// Shape trees the new resource should be validated against.
  pub target_shape_trees: Vec<Url>,
  /// Sent as `Slug` on POST.
  pub proposed_name: Option<String>,
  pub is_container: bool,
  pub body: Option<String>,
  pub content_type: Option<String>,
}

impl ManagedInstanceRequest {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn focus_node(mut self, focus_node: Url) -> Self {
    self.focus_nodes.push(focus_node);
    self
  }

  pub fn target_shape_tree(mut self, shape_tree: Url) -> Self {
    self.target_shape_trees.push(shape_tree);
    self
  }

  pub fn proposed_name(mut self, name: impl Into<String>) -> Self {
    self.proposed_name = Some(name.into());
    self
  }

  pub fn container(mut self) -> Self {
    self.is_container = true;
    self
  }

  pub fn body(mut self, body: impl Into<String>, content_type: impl Into<String>) -> Self {
    self.body = Some(body.into());
    self.content_type = Some(content_type.into());
    self
  }

  pub(super) fn focus_node_headers(&self) -> ResourceAttributes {
    let mut headers = ResourceAttributes::new();
    for node in &self.focus_nodes {
      headers.add(header::LINK, &link(node.as_str(), rel::FOCUS_NODE));
    }
    headers
  }

  /// Focus node, target shape tree, and optionally resource type links.
  pub(super) fn link_headers(&self, with_type: bool) -> ResourceAttributes {
    let mut headers = self.focus_node_headers();
    for tree in &self.target_shape_trees {
      headers.add(header::LINK, &link(tree.as_str(), rel::TARGET_SHAPETREE));
    }
    if with_type {
      let resource_type = if self.is_container { ldp::CONTAINER } else { ldp::RESOURCE };
      headers.add(header::LINK, &link(resource_type, rel::TYPE));
    }
    headers
  }

  pub(super) fn add_slug(&self, headers: &mut ResourceAttributes) {
    if let Some(name) = &self.proposed_name {
      headers.set(header::SLUG, name);
    }
  }
}

fn link(target: &str, relation: &str) -> String {
  format!("<{}>; rel=\"{}\"", target, relation)
}
