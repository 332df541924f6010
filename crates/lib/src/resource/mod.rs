//! Typed views of manageable and manager resources.
//!
//! A URL resolves to one of four [`InstanceResource`] variants depending on
//! whether it exists and whether it is a manager document. A
//! [`ManageableInstance`] pairs the manageable side with its manager side.

mod resolver;

use url::Url;

use crate::attributes::ResourceAttributes;
use crate::manager::ShapeTreeManager;

pub use resolver::ResourceResolver;

/// Kind of content held by a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
  /// An LDP container.
  Container,
  /// A non-container RDF resource.
  Resource,
  /// Anything that is not RDF.
  NonRdf,
}

/// Fields every resource variant carries.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceMetadata {
  pub url: Url,
  pub name: String,
  pub resource_type: ResourceType,
  pub attributes: ResourceAttributes,
  pub body: Option<String>,
}

/// An existing resource that is, or could be, governed by a manager.
#[derive(Debug, Clone, PartialEq)]
pub struct ManageableResource {
  pub metadata: ResourceMetadata,
  /// Target of the resource's `managedBy` link.
  pub manager_url: Option<Url>,
  pub is_container: bool,
}

/// A manageable resource the server reported as absent.
#[derive(Debug, Clone, PartialEq)]
pub struct MissingManageableResource {
  pub metadata: ResourceMetadata,
  /// Where the manager would live, when the server advertised it.
  pub manager_url: Option<Url>,
  pub is_container: bool,
}

/// An existing manager document.
#[derive(Debug, Clone, PartialEq)]
pub struct ManagerResource {
  pub metadata: ResourceMetadata,
  pub managed_resource_url: Url,
  pub manager: ShapeTreeManager,
}

/// A manager document the server reported as absent.
#[derive(Debug, Clone, PartialEq)]
pub struct MissingManagerResource {
  pub metadata: ResourceMetadata,
  pub managed_resource_url: Url,
}

impl MissingManagerResource {
  /// The absent manager at `url` for the resource at `managed_resource_url`.
  pub fn new(url: Url, managed_resource_url: Url) -> Self {
    let name = resolver::resource_name(&url);
    Self {
      metadata: ResourceMetadata {
        url,
        name,
        resource_type: ResourceType::Resource,
        attributes: ResourceAttributes::new(),
        body: None,
      },
      managed_resource_url,
    }
  }
}

/// A manageable resource with a manager describing it.
#[derive(Debug, Clone, PartialEq)]
pub struct ManagedResource(pub ManageableResource);

/// A manageable resource with no manager.
#[derive(Debug, Clone, PartialEq)]
pub struct UnmanagedResource(pub ManageableResource);

/// The classification of a single HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub enum InstanceResource {
  Manageable(ManageableResource),
  MissingManageable(MissingManageableResource),
  Manager(ManagerResource),
  MissingManager(MissingManagerResource),
}

impl InstanceResource {
  pub fn metadata(&self) -> &ResourceMetadata {
    match self {
      InstanceResource::Manageable(r) => &r.metadata,
      InstanceResource::MissingManageable(r) => &r.metadata,
      InstanceResource::Manager(r) => &r.metadata,
      InstanceResource::MissingManager(r) => &r.metadata,
    }
  }

  pub fn exists(&self) -> bool {
    match self {
      InstanceResource::Manageable(_) | InstanceResource::Manager(_) => true,
      InstanceResource::MissingManageable(_) | InstanceResource::MissingManager(_) => false,
    }
  }

  pub fn url(&self) -> &Url {
    &self.metadata().url
  }

  pub fn name(&self) -> &str {
    &self.metadata().name
  }

  pub fn resource_type(&self) -> ResourceType {
    self.metadata().resource_type
  }

  pub fn attributes(&self) -> &ResourceAttributes {
    &self.metadata().attributes
  }

  pub fn body(&self) -> Option<&str> {
    self.metadata().body.as_deref()
  }

  /// Short variant name for logs and error messages.
  pub fn kind(&self) -> &'static str {
    match self {
      InstanceResource::Manageable(_) => "manageable resource",
      InstanceResource::MissingManageable(_) => "missing manageable resource",
      InstanceResource::Manager(_) => "manager resource",
      InstanceResource::MissingManager(_) => "missing manager resource",
    }
  }
}

/// Manageable half of a [`ManageableInstance`].
#[derive(Debug, Clone, PartialEq)]
pub enum ManageableSide {
  Missing(MissingManageableResource),
  Managed(ManagedResource),
  Unmanaged(UnmanagedResource),
}

impl ManageableSide {
  pub fn metadata(&self) -> &ResourceMetadata {
    match self {
      ManageableSide::Missing(r) => &r.metadata,
      ManageableSide::Managed(ManagedResource(r)) | ManageableSide::Unmanaged(UnmanagedResource(r)) => &r.metadata,
    }
  }

  pub fn exists(&self) -> bool {
    match self {
      ManageableSide::Missing(_) => false,
      ManageableSide::Managed(_) | ManageableSide::Unmanaged(_) => true,
    }
  }

  pub fn is_container(&self) -> bool {
    match self {
      ManageableSide::Missing(r) => r.is_container,
      ManageableSide::Managed(ManagedResource(r)) | ManageableSide::Unmanaged(UnmanagedResource(r)) => r.is_container,
    }
  }

  pub fn url(&self) -> &Url {
    &self.metadata().url
  }
}

/// Manager half of a [`ManageableInstance`].
#[derive(Debug, Clone, PartialEq)]
pub enum ManagerSide {
  Present(ManagerResource),
  Missing(MissingManagerResource),
}

impl ManagerSide {
  pub fn metadata(&self) -> &ResourceMetadata {
    match self {
      ManagerSide::Present(r) => &r.metadata,
      ManagerSide::Missing(r) => &r.metadata,
    }
  }

  pub fn exists(&self) -> bool {
    matches!(self, ManagerSide::Present(_))
  }

  pub fn url(&self) -> &Url {
    &self.metadata().url
  }
}

/// A manageable resource paired with its manager, as seen by one resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ManageableInstance {
  manageable: ManageableSide,
  manager: ManagerSide,
  was_request_for_manager: bool,
}

impl ManageableInstance {
  pub fn new(manageable: ManageableSide, manager: ManagerSide, was_request_for_manager: bool) -> Self {
    Self {
      manageable,
      manager,
      was_request_for_manager,
    }
  }

  pub fn manageable(&self) -> &ManageableSide {
    &self.manageable
  }

  pub fn manager(&self) -> &ManagerSide {
    &self.manager
  }

  /// The manager document, when one exists.
  pub fn manager_resource(&self) -> Option<&ManagerResource> {
    match &self.manager {
      ManagerSide::Present(manager) => Some(manager),
      ManagerSide::Missing(_) => None,
    }
  }

  /// Whether a manager exists and describes the manageable resource.
  pub fn is_managed(&self) -> bool {
    self.manager.exists()
  }

  /// Whether the lookup URL pointed at the manager document itself.
  pub fn was_request_for_manager(&self) -> bool {
    self.was_request_for_manager
  }
}
