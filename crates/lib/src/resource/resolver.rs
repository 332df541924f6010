//! Classification of HTTP responses and assembly of manageable instances.
//!
//! # Classification Precedence
//!
//! Container detection trusts `type` links when the response carries any and
//! falls back to a trailing `/` otherwise. Manager detection checks, in
//! order:
//!
//! 1. existing with a `managedBy` link → not a manager
//! 2. existing with a `manages` link → manager
//! 3. missing → manager iff the URL follows the manager naming convention
//!
//! Reordering these checks changes how resources without explicit links are
//! classified.

use std::sync::Arc;

use tracing::{debug, warn};
use url::Url;

use super::{
  InstanceResource, ManageableInstance, ManageableResource, ManageableSide, ManagedResource, ManagerResource,
  ManagerSide, MissingManageableResource, MissingManagerResource, ResourceMetadata, ResourceType, UnmanagedResource,
};
use crate::attributes::ResourceAttributes;
use crate::config::ShapeTreeContext;
use crate::error::{Result, ShapeTreeError};
use crate::graph::RdfGraph;
use crate::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use crate::manager::ShapeTreeManager;
use crate::vocab::{MANAGER_QUERY_MARKER, MANAGER_SUFFIX, content_type, header, ldp, rel, shapetree};

/// Resolves URLs into typed resources and instances.
///
/// Every call is a fresh round trip; nothing is cached.
#[derive(Clone)]
pub struct ResourceResolver {
  client: Arc<dyn HttpClient>,
}

impl ResourceResolver {
  pub fn new<C: HttpClient + 'static>(client: C) -> Self {
    Self::with_shared(Arc::new(client))
  }

  /// Share an existing transport with other components.
  pub fn with_shared(client: Arc<dyn HttpClient>) -> Self {
    Self { client }
  }

  /// GET `url` and classify the response.
  pub async fn get_resource(&self, context: &ShapeTreeContext, url: &Url) -> Result<InstanceResource> {
    let mut headers = context.request_headers();
    headers.replace(header::ACCEPT, content_type::ACCEPT_READABLE_RDF);
    let request = HttpRequest::new(HttpMethod::Get, url.clone()).with_headers(headers);
    debug!(url = %url, agent = context.web_id.as_deref().unwrap_or("anonymous"), "resolving resource");
    let response = self.client.fetch_shape_tree_response(&request).await?;
    Self::generate_resource(url, &response)
  }

  /// Issue a write to `url` and classify the response.
  ///
  /// A create that reports a missing resource is a server inconsistency.
  pub async fn create_resource(
    &self,
    context: &ShapeTreeContext,
    method: HttpMethod,
    url: &Url,
    headers: &ResourceAttributes,
    body: Option<&str>,
    content_type: Option<&str>,
  ) -> Result<InstanceResource> {
    let mut request_headers = context.request_headers();
    request_headers.extend_from(headers);
    let request = HttpRequest::new(method, url.clone())
      .with_headers(request_headers)
      .with_body(body.map(str::to_string), content_type.map(str::to_string));

    let response = self.client.fetch_shape_tree_response(&request).await?;
    let resource = Self::generate_resource(url, &response)?;
    if !resource.exists() {
      warn!(method = %method, url = %url, status = response.status, "create reported a missing resource");
      return Err(ShapeTreeError::Consistency(format!(
        "{} {} returned status {} for a created resource",
        method, url, response.status
      )));
    }
    Ok(resource)
  }

  /// Classify `response` for the resource requested at `url`.
  pub fn generate_resource(url: &Url, response: &HttpResponse) -> Result<InstanceResource> {
    let url = match response.headers.first_value(header::LOCATION) {
      Some(location) => url
        .join(location)
        .map_err(|e| ShapeTreeError::Protocol(format!("unparseable Location header {:?}: {}", location, e)))?,
      None => url.clone(),
    };

    let exists = response.exists();
    let links = response.links();
    let is_container = calculate_is_container(&url, &links);
    let resource_type = calculate_resource_type(is_container, response);
    let metadata = ResourceMetadata {
      name: resource_name(&url),
      url: url.clone(),
      resource_type,
      attributes: response.headers.clone(),
      body: response.body.clone(),
    };

    let resource = if calculate_is_manager(exists, &url, &links) {
      let managed_resource_url = match link_target(&links, rel::MANAGES, shapetree::MANAGES) {
        Some(target) => url
          .join(target)
          .map_err(|e| ShapeTreeError::Protocol(format!("unparseable managed resource url {:?}: {}", target, e)))?,
        None => managed_url_for(&url)?,
      };
      if exists {
        let manager = decode_manager(&url, response)?;
        InstanceResource::Manager(ManagerResource {
          metadata,
          managed_resource_url,
          manager,
        })
      } else {
        InstanceResource::MissingManager(MissingManagerResource {
          metadata,
          managed_resource_url,
        })
      }
    } else {
      let manager_url = link_target(&links, rel::MANAGED_BY, shapetree::MANAGED_BY)
        .map(|target| {
          url
            .join(target)
            .map_err(|e| ShapeTreeError::Protocol(format!("unparseable manager url {:?}: {}", target, e)))
        })
        .transpose()?;
      if exists {
        InstanceResource::Manageable(ManageableResource {
          metadata,
          manager_url,
          is_container,
        })
      } else {
        InstanceResource::MissingManageable(MissingManageableResource {
          metadata,
          manager_url,
          is_container,
        })
      }
    };

    debug!(url = %url, status = response.status, kind = resource.kind(), ?resource_type, "classified resource");
    Ok(resource)
  }

  /// Resolve `url` and pair it with its counterpart.
  pub async fn get_instance(&self, context: &ShapeTreeContext, url: &Url) -> Result<ManageableInstance> {
    match self.get_resource(context, url).await? {
      InstanceResource::MissingManageable(missing) => {
        // Nothing can manage a resource that does not exist.
        let manager_url = missing
          .manager_url
          .clone()
          .unwrap_or_else(|| manager_url_for(&missing.metadata.url));
        let manager = MissingManagerResource::new(manager_url, missing.metadata.url.clone());
        Ok(ManageableInstance::new(
          ManageableSide::Missing(missing),
          ManagerSide::Missing(manager),
          false,
        ))
      }
      InstanceResource::MissingManager(manager) => {
        let managed = self
          .resolve_managed(context, &manager.managed_resource_url, &manager.metadata.url)
          .await?;
        Ok(ManageableInstance::new(
          ManageableSide::Unmanaged(UnmanagedResource(managed)),
          ManagerSide::Missing(manager),
          true,
        ))
      }
      InstanceResource::Manageable(manageable) => {
        let manager_url = manageable.manager_url.clone().ok_or_else(|| {
          ShapeTreeError::Protocol(format!(
            "resource {} does not advertise a manager url",
            manageable.metadata.url
          ))
        })?;
        self.pair_with_manager(context, manageable, &manager_url).await
      }
      InstanceResource::Manager(manager) => {
        let managed = self
          .resolve_managed(context, &manager.managed_resource_url, &manager.metadata.url)
          .await?;
        Ok(ManageableInstance::new(
          ManageableSide::Managed(ManagedResource(managed)),
          ManagerSide::Present(manager),
          true,
        ))
      }
    }
  }

  /// Create a resource with `method` and pair the result with its counterpart.
  pub async fn create_instance(
    &self,
    context: &ShapeTreeContext,
    method: HttpMethod,
    url: &Url,
    headers: &ResourceAttributes,
    body: Option<&str>,
    content_type: Option<&str>,
  ) -> Result<ManageableInstance> {
    match self
      .create_resource(context, method, url, headers, body, content_type)
      .await?
    {
      InstanceResource::Manageable(manageable) => {
        let manager_url = manageable.manager_url.clone().ok_or_else(|| {
          ShapeTreeError::Protocol(format!(
            "created resource {} does not advertise a manager url",
            manageable.metadata.url
          ))
        })?;
        self.pair_with_manager(context, manageable, &manager_url).await
      }
      InstanceResource::Manager(manager) => {
        let managed = self
          .resolve_managed(context, &manager.managed_resource_url, &manager.metadata.url)
          .await?;
        Ok(ManageableInstance::new(
          ManageableSide::Managed(ManagedResource(managed)),
          ManagerSide::Present(manager),
          true,
        ))
      }
      missing @ (InstanceResource::MissingManageable(_) | InstanceResource::MissingManager(_)) => Err(inconsistent(
        format!("created resource {} classified as a {}", missing.url(), missing.kind()),
      )),
    }
  }

  /// Resolve every resource contained by the container at `container_url`.
  ///
  /// Contained URLs are resolved one at a time in lexicographic order.
  pub async fn get_contained_instances(
    &self,
    context: &ShapeTreeContext,
    container_url: &Url,
  ) -> Result<Vec<ManageableInstance>> {
    let container = match self.get_resource(context, container_url).await? {
      InstanceResource::Manageable(container) if container.is_container => container,
      other => {
        return Err(ShapeTreeError::Input(format!(
          "{} is not an existing container ({})",
          container_url,
          other.kind()
        )));
      }
    };

    let url = &container.metadata.url;
    let graph = match container.metadata.body.as_deref() {
      Some(body) => RdfGraph::parse(body, url, container.metadata.attributes.first_value(header::CONTENT_TYPE))?,
      None => RdfGraph::new(),
    };

    let mut contained = graph.iri_objects(url.as_str(), ldp::CONTAINS);
    contained.sort();
    contained.dedup();
    debug!(container = %url, count = contained.len(), "resolving contained resources");

    let mut instances = Vec::with_capacity(contained.len());
    for member in contained {
      let member = Url::parse(&member)?;
      instances.push(self.get_instance(context, &member).await?);
    }
    Ok(instances)
  }

  /// Resolve the resource a manager at `manager_url` describes; it must exist.
  async fn resolve_managed(
    &self,
    context: &ShapeTreeContext,
    managed_url: &Url,
    manager_url: &Url,
  ) -> Result<ManageableResource> {
    match self.get_resource(context, managed_url).await? {
      InstanceResource::Manageable(managed) => Ok(managed),
      other => Err(inconsistent(format!(
        "manager {} describes {} which is a {}",
        manager_url,
        other.url(),
        other.kind()
      ))),
    }
  }

  async fn pair_with_manager(
    &self,
    context: &ShapeTreeContext,
    manageable: ManageableResource,
    manager_url: &Url,
  ) -> Result<ManageableInstance> {
    match self.get_resource(context, manager_url).await? {
      InstanceResource::Manager(manager) => Ok(ManageableInstance::new(
        ManageableSide::Managed(ManagedResource(manageable)),
        ManagerSide::Present(manager),
        false,
      )),
      InstanceResource::MissingManager(manager) => Ok(ManageableInstance::new(
        ManageableSide::Unmanaged(UnmanagedResource(manageable)),
        ManagerSide::Missing(manager),
        false,
      )),
      other => Err(inconsistent(format!(
        "manager url {} of {} resolved to a {}",
        manager_url,
        manageable.metadata.url,
        other.kind()
      ))),
    }
  }
}

fn inconsistent(message: String) -> ShapeTreeError {
  warn!(%message, "inconsistent server response");
  ShapeTreeError::Consistency(message)
}

/// First target linked under either the short or the full relation name.
fn link_target<'a>(links: &'a ResourceAttributes, short: &str, full: &str) -> Option<&'a str> {
  links.first_value(short).or_else(|| links.first_value(full))
}

fn calculate_is_container(url: &Url, links: &ResourceAttributes) -> bool {
  let types = links.all_values(rel::TYPE);
  if types.is_empty() {
    url.path().ends_with('/')
  } else {
    types.iter().any(|t| t == ldp::CONTAINER || t == ldp::BASIC_CONTAINER)
  }
}

fn calculate_resource_type(is_container: bool, response: &HttpResponse) -> ResourceType {
  if is_container {
    ResourceType::Container
  } else if response.content_type().is_some_and(content_type::is_rdf) {
    ResourceType::Resource
  } else {
    ResourceType::NonRdf
  }
}

fn calculate_is_manager(exists: bool, url: &Url, links: &ResourceAttributes) -> bool {
  if exists && link_target(links, rel::MANAGED_BY, shapetree::MANAGED_BY).is_some() {
    false
  } else if exists && link_target(links, rel::MANAGES, shapetree::MANAGES).is_some() {
    true
  } else if !exists {
    is_manager_url(url)
  } else {
    false
  }
}

fn decode_manager(url: &Url, response: &HttpResponse) -> Result<ShapeTreeManager> {
  match response.body.as_deref() {
    Some(body) if !body.trim().is_empty() => {
      let graph = RdfGraph::parse(body, url, response.content_type())?;
      ShapeTreeManager::from_graph(url, &graph)
    }
    _ => Ok(ShapeTreeManager::new(url.clone())),
  }
}

/// Final path segment without a trailing slash; `/` for the root.
pub(crate) fn resource_name(url: &Url) -> String {
  let path = url.path();
  if path == "/" || path.is_empty() {
    return "/".to_string();
  }
  let trimmed = path.strip_suffix('/').unwrap_or(path);
  trimmed.rsplit('/').next().unwrap_or(trimmed).to_string()
}

/// Whether `url` follows the manager naming convention.
pub(crate) fn is_manager_url(url: &Url) -> bool {
  url.path().ends_with(MANAGER_SUFFIX) || url.query().is_some_and(|q| q.ends_with(MANAGER_QUERY_MARKER))
}

/// Managed resource URL implied by a manager URL.
pub(crate) fn managed_url_for(manager_url: &Url) -> Result<Url> {
  let mut managed = manager_url.clone();
  managed.set_fragment(None);
  if let Some(path) = manager_url.path().strip_suffix(MANAGER_SUFFIX) {
    managed.set_path(path);
    return Ok(managed);
  }
  if let Some(query) = manager_url.query().and_then(|q| q.strip_suffix(MANAGER_QUERY_MARKER)) {
    let query = query.trim_end_matches('&');
    managed.set_query(if query.is_empty() { None } else { Some(query) });
    return Ok(managed);
  }
  Err(ShapeTreeError::Protocol(format!(
    "cannot infer the managed resource of {}",
    manager_url
  )))
}

/// Manager URL implied by the naming convention for `url`.
pub(crate) fn manager_url_for(url: &Url) -> Url {
  let mut manager = url.clone();
  manager.set_fragment(None);
  manager.set_query(None);
  manager.set_path(&format!("{}{}", url.path(), MANAGER_SUFFIX));
  manager
}
