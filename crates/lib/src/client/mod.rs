//! Client operations on shape tree managed resources.
//!
//! Discovery, planting, and unplanting resolve the target first and then
//! issue at most one write to its manager. The CRUD primitives issue their
//! request directly, carrying the focus node and target shape tree links a
//! validating server expects.

mod request;

use std::sync::Arc;

use tracing::{debug, info};
use url::Url;

use crate::attributes::ResourceAttributes;
use crate::config::{ClientConfig, ShapeTreeContext};
use crate::error::{Result, ShapeTreeError};
use crate::http::{DocumentResponse, HttpClient, HttpMethod, HttpRequest, ReqwestClient};
use crate::manager::{ShapeTreeAssignment, ShapeTreeManager, ShapeTreeManagerDelta};
use crate::resource::{ManageableInstance, ResourceResolver};
use crate::vocab::content_type;

pub use request::ManagedInstanceRequest;

/// Shape tree client over an injected transport.
#[derive(Clone)]
pub struct ShapeTreeClient {
  client: Arc<dyn HttpClient>,
  resolver: ResourceResolver,
}

impl ShapeTreeClient {
  pub fn new<C: HttpClient + 'static>(client: C) -> Self {
    Self::with_shared(Arc::new(client))
  }

  pub fn with_shared(client: Arc<dyn HttpClient>) -> Self {
    Self {
      resolver: ResourceResolver::with_shared(Arc::clone(&client)),
      client,
    }
  }

  /// A client over a reqwest transport built from `config`.
  pub fn from_config(config: &ClientConfig) -> Result<Self> {
    Ok(Self::new(ReqwestClient::new(config)?))
  }

  pub fn resolver(&self) -> &ResourceResolver {
    &self.resolver
  }

  /// The manager of `target`, or `None` when it is missing or unmanaged.
  ///
  /// `target` must be the managed resource, not its manager.
  pub async fn discover_shape_tree(
    &self,
    context: &ShapeTreeContext,
    target: &Url,
  ) -> Result<Option<ShapeTreeManager>> {
    let instance = self.resolver.get_instance(context, target).await?;
    reject_manager_target(&instance, target, "discover")?;

    let manager = instance.manager_resource().map(|resource| resource.manager.clone());
    debug!(url = %target, managed = manager.is_some(), "discovered shape tree manager");
    Ok(manager)
  }

  /// Assign `shape_tree` to the existing resource at `target`.
  ///
  /// Creates the manager when the resource is unmanaged. Returns a 404
  /// response when the target does not exist and a 409 response when the
  /// shape tree is already assigned.
  pub async fn plant_shape_tree(
    &self,
    context: &ShapeTreeContext,
    target: &Url,
    shape_tree: &Url,
    focus_node: Option<&Url>,
    shape: Option<&Url>,
  ) -> Result<DocumentResponse> {
    let instance = self.resolver.get_instance(context, target).await?;
    reject_manager_target(&instance, target, "plant")?;

    if !instance.manageable().exists() {
      return Ok(DocumentResponse::failure(
        404,
        format!("Cannot find target resource to plant: {}", target),
      ));
    }

    let mut manager = instance
      .manager_resource()
      .map(|resource| resource.manager.clone())
      .unwrap_or_else(|| ShapeTreeManager::new(instance.manager().url().clone()));

    if manager.assignment_for_shape_tree(shape_tree).is_some() {
      return Ok(DocumentResponse::failure(
        409,
        format!("{} is already assigned to {}", shape_tree, target),
      ));
    }

    let slot = manager.mint_assignment_url();
    let assignment = ShapeTreeAssignment::new(
      shape_tree.clone(),
      instance.manageable().url().clone(),
      slot.clone(),
      focus_node.cloned(),
      shape.cloned(),
      slot,
    )?;
    manager.add_assignment(assignment);

    info!(
      target = %target,
      shape_tree = %shape_tree,
      manager = %instance.manager().url(),
      assignments = manager.len(),
      "planting shape tree"
    );
    self.put_manager(context, instance.manager().url(), &manager).await
  }

  /// Remove every assignment of `shape_tree` from the manager of `target`.
  ///
  /// Deletes the manager when no assignments remain. Returns a 404 response
  /// when the target does not exist, a 500 response when it is unmanaged,
  /// and a 400 response when the shape tree is not assigned.
  pub async fn unplant_shape_tree(
    &self,
    context: &ShapeTreeContext,
    target: &Url,
    shape_tree: &Url,
  ) -> Result<DocumentResponse> {
    let instance = self.resolver.get_instance(context, target).await?;
    reject_manager_target(&instance, target, "unplant")?;

    if !instance.manageable().exists() {
      return Ok(DocumentResponse::failure(
        404,
        format!("Cannot find target resource to unplant: {}", target),
      ));
    }

    let Some(resource) = instance.manager_resource() else {
      return Ok(DocumentResponse::failure(
        500,
        format!("Cannot unplant target resource that is not managed by a shapetree: {}", target),
      ));
    };

    let existing = &resource.manager;
    let mut updated = existing.clone();
    updated.remove_assignment_for_shape_tree(shape_tree);

    let delta = ShapeTreeManagerDelta::evaluate(Some(existing), Some(&updated))?;
    if !delta.is_updated() {
      return Ok(DocumentResponse::failure(
        400,
        format!("{} is not assigned to {}", shape_tree, target),
      ));
    }

    let manager_url = &resource.metadata.url;
    if updated.is_empty() {
      info!(target = %target, shape_tree = %shape_tree, manager = %manager_url, "deleting emptied manager");
      self
        .send(context, HttpMethod::Delete, manager_url, ResourceAttributes::new(), None, None)
        .await
    } else {
      info!(
        target = %target,
        shape_tree = %shape_tree,
        manager = %manager_url,
        removed = delta.removed_assignments.len(),
        remaining = updated.len(),
        "unplanting shape tree"
      );
      self.put_manager(context, manager_url, &updated).await
    }
  }

  /// POST a new resource into `parent_container`.
  pub async fn post_managed_instance(
    &self,
    context: &ShapeTreeContext,
    parent_container: &Url,
    request: &ManagedInstanceRequest,
  ) -> Result<DocumentResponse> {
    let mut headers = request.link_headers(true);
    request.add_slug(&mut headers);
    self
      .send(
        context,
        HttpMethod::Post,
        parent_container,
        headers,
        request.body.clone(),
        request.content_type.clone(),
      )
      .await
  }

  /// Create the resource at `resource_url` with PUT.
  pub async fn put_managed_instance(
    &self,
    context: &ShapeTreeContext,
    resource_url: &Url,
    request: &ManagedInstanceRequest,
  ) -> Result<DocumentResponse> {
    self
      .send(
        context,
        HttpMethod::Put,
        resource_url,
        request.link_headers(true),
        request.body.clone(),
        request.content_type.clone(),
      )
      .await
  }

  /// Replace the content of the existing resource at `resource_url`.
  ///
  /// Only focus nodes are sent; the resource keeps its type and assignments.
  pub async fn update_managed_instance(
    &self,
    context: &ShapeTreeContext,
    resource_url: &Url,
    request: &ManagedInstanceRequest,
  ) -> Result<DocumentResponse> {
    self
      .send(
        context,
        HttpMethod::Put,
        resource_url,
        request.focus_node_headers(),
        request.body.clone(),
        request.content_type.clone(),
      )
      .await
  }

  /// Apply a SPARQL Update `patch` to the resource at `resource_url`.
  pub async fn patch_managed_instance(
    &self,
    context: &ShapeTreeContext,
    resource_url: &Url,
    focus_nodes: &[Url],
    patch: &str,
  ) -> Result<DocumentResponse> {
    let request = ManagedInstanceRequest {
      focus_nodes: focus_nodes.to_vec(),
      ..Default::default()
    };
    self
      .send(
        context,
        HttpMethod::Patch,
        resource_url,
        request.focus_node_headers(),
        Some(patch.to_string()),
        Some(content_type::SPARQL_UPDATE.to_string()),
      )
      .await
  }

  pub async fn delete_managed_instance(&self, context: &ShapeTreeContext, resource_url: &Url) -> Result<DocumentResponse> {
    self
      .send(context, HttpMethod::Delete, resource_url, ResourceAttributes::new(), None, None)
      .await
  }

  async fn put_manager(
    &self,
    context: &ShapeTreeContext,
    manager_url: &Url,
    manager: &ShapeTreeManager,
  ) -> Result<DocumentResponse> {
    let body = manager.to_turtle()?;
    self
      .send(
        context,
        HttpMethod::Put,
        manager_url,
        ResourceAttributes::new(),
        Some(body),
        Some(content_type::TEXT_TURTLE.to_string()),
      )
      .await
  }

  async fn send(
    &self,
    context: &ShapeTreeContext,
    method: HttpMethod,
    url: &Url,
    headers: ResourceAttributes,
    body: Option<String>,
    content_type: Option<String>,
  ) -> Result<DocumentResponse> {
    let mut request_headers = context.request_headers();
    request_headers.extend_from(&headers);
    let request = HttpRequest::new(method, url.clone())
      .with_headers(request_headers)
      .with_body(body, content_type);
    let response = self.client.fetch_shape_tree_response(&request).await?;
    debug!(method = %method, url = %url, status = response.status, "write completed");
    Ok(response.into())
  }
}

fn reject_manager_target(instance: &ManageableInstance, target: &Url, operation: &str) -> Result<()> {
  if instance.was_request_for_manager() {
    return Err(ShapeTreeError::Input(format!(
      "cannot {} on {}: target is a manager resource, not a managed resource",
      operation, target
    )));
  }
  Ok(())
}
