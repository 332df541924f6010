//! HTTP collaborator contract.
//!
//! The resolver and client only depend on [`HttpClient`]. The reqwest-backed
//! [`ReqwestClient`] is the production transport; tests substitute their own.

mod reqwest_client;

use std::fmt;

use async_trait::async_trait;
use url::Url;

use crate::attributes::ResourceAttributes;
use crate::error::Result;
use crate::resource::ResourceType;
use crate::vocab::{content_type, header, ldp, rel};

pub use reqwest_client::ReqwestClient;

/// Methods issued by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
  Get,
  Post,
  Put,
  Patch,
  Delete,
}

impl HttpMethod {
  pub fn as_str(&self) -> &'static str {
    match self {
      HttpMethod::Get => "GET",
      HttpMethod::Post => "POST",
      HttpMethod::Put => "PUT",
      HttpMethod::Patch => "PATCH",
      HttpMethod::Delete => "DELETE",
    }
  }
}

impl fmt::Display for HttpMethod {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A request handed to the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
  pub method: HttpMethod,
  pub url: Url,
  pub headers: ResourceAttributes,
  pub body: Option<String>,
  pub content_type: Option<String>,
}

impl HttpRequest {
  pub fn new(method: HttpMethod, url: Url) -> Self {
    Self {
      method,
      url,
      headers: ResourceAttributes::new(),
      body: None,
      content_type: None,
    }
  }

  pub fn with_headers(mut self, headers: ResourceAttributes) -> Self {
    self.headers = headers;
    self
  }

  pub fn with_body(mut self, body: Option<String>, content_type: Option<String>) -> Self {
    self.body = body;
    self.content_type = content_type;
    self
  }
}

/// Status, headers, and body of a transport response.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
  pub status: u16,
  pub headers: ResourceAttributes,
  pub body: Option<String>,
}

impl HttpResponse {
  pub fn new(status: u16, headers: ResourceAttributes, body: Option<String>) -> Self {
    Self { status, headers, body }
  }

  /// Whether the response reports the resource as present.
  pub fn exists(&self) -> bool {
    (200..400).contains(&self.status)
  }

  /// Link headers decomposed by relation type.
  pub fn links(&self) -> ResourceAttributes {
    ResourceAttributes::parse_link_headers(self.headers.all_values(header::LINK))
  }

  pub fn content_type(&self) -> Option<&str> {
    self.headers.first_value(header::CONTENT_TYPE)
  }
}

/// Outcome of an orchestration call.
///
/// Expected failures (missing target, unmanaged resource) come back as a
/// `DocumentResponse` with a non-2xx status rather than as an error.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentResponse {
  pub attributes: ResourceAttributes,
  pub body: Option<String>,
  pub status: u16,
}

impl DocumentResponse {
  pub fn new(attributes: ResourceAttributes, body: Option<String>, status: u16) -> Self {
    Self {
      attributes,
      body,
      status,
    }
  }

  /// A response synthesised locally, without a server round trip.
  pub fn failure(status: u16, message: impl Into<String>) -> Self {
    Self::new(ResourceAttributes::new(), Some(message.into()), status)
  }

  pub fn exists(&self) -> bool {
    (200..400).contains(&self.status)
  }

  pub fn content_type(&self) -> Option<&str> {
    self.attributes.first_value(header::CONTENT_TYPE)
  }

  /// Resource type advertised by the response's type links and content type.
  pub fn resource_type(&self) -> ResourceType {
    let links = ResourceAttributes::parse_link_headers(self.attributes.all_values(header::LINK));
    let container = links
      .all_values(rel::TYPE)
      .iter()
      .any(|t| t == ldp::CONTAINER || t == ldp::BASIC_CONTAINER);
    if container {
      ResourceType::Container
    } else if self.content_type().is_some_and(content_type::is_rdf) {
      ResourceType::Resource
    } else {
      ResourceType::NonRdf
    }
  }
}

impl From<HttpResponse> for DocumentResponse {
  fn from(response: HttpResponse) -> Self {
    Self::new(response.headers, response.body, response.status)
  }
}

/// Transport used for every network round trip.
#[async_trait]
pub trait HttpClient: Send + Sync {
  /// Issue `request` and return whatever the server answered, including
  /// non-2xx statuses. Only transport failures are errors.
  async fn fetch_shape_tree_response(&self, request: &HttpRequest) -> Result<HttpResponse>;
}
