//! shapetrees-lib: Client-side shape tree management
//!
//! This crate resolves resources on a shape tree aware server and manages the
//! shape trees assigned to them:
//! - `ResourceAttributes`: case-insensitive header multimap with Link parsing
//! - `ResourceResolver`: classifies URLs and pairs resources with managers
//! - `ShapeTreeManager`: assignments recorded in a manager document
//! - `ShapeTreeManagerDelta`: slot-wise difference between two managers
//! - `ShapeTreeClient`: discover, plant, unplant, and managed CRUD

pub mod attributes;
pub mod client;
pub mod config;
pub mod error;
pub mod graph;
pub mod http;
pub mod manager;
pub mod resource;
pub mod util;
pub mod vocab;

pub use attributes::ResourceAttributes;
pub use client::{ManagedInstanceRequest, ShapeTreeClient};
pub use config::{ClientConfig, ShapeTreeContext};
pub use error::{Result, ShapeTreeError};
pub use http::{DocumentResponse, HttpClient, ReqwestClient};
pub use manager::{ShapeTreeAssignment, ShapeTreeManager, ShapeTreeManagerDelta};
pub use resource::{InstanceResource, ManageableInstance, ResourceResolver};
