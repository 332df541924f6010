//! reqwest-backed transport.

use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use super::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use crate::attributes::ResourceAttributes;
use crate::config::ClientConfig;
use crate::error::{Result, ShapeTreeError};

/// [`HttpClient`] over a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
  client: reqwest::Client,
}

impl ReqwestClient {
  /// Build a transport from `config`.
  pub fn new(config: &ClientConfig) -> Result<Self> {
    let mut builder = reqwest::Client::builder()
      .user_agent(config.user_agent.as_str())
      .danger_accept_invalid_certs(!config.ssl_validation);
    if let Some(timeout) = config.timeout {
      builder = builder.timeout(timeout);
    }
    let client = builder.build().map_err(|e| ShapeTreeError::Http {
      url: String::new(),
      message: format!("failed to build http client: {}", e),
    })?;
    Ok(Self { client })
  }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
  match method {
    HttpMethod::Get => Method::GET,
    HttpMethod::Post => Method::POST,
    HttpMethod::Put => Method::PUT,
    HttpMethod::Patch => Method::PATCH,
    HttpMethod::Delete => Method::DELETE,
  }
}

#[async_trait]
impl HttpClient for ReqwestClient {
  async fn fetch_shape_tree_response(&self, request: &HttpRequest) -> Result<HttpResponse> {
    debug!(method = %request.method, url = %request.url, "sending request");

    let mut builder = self
      .client
      .request(to_reqwest_method(request.method), request.url.clone());
    for (name, values) in request.headers.iter() {
      for value in values {
        builder = builder.header(name, value.as_str());
      }
    }
    if let Some(content_type) = &request.content_type {
      builder = builder.header(CONTENT_TYPE, content_type.as_str());
    }
    if let Some(body) = &request.body {
      builder = builder.body(body.clone());
    }

    let failed = |e: reqwest::Error| ShapeTreeError::Http {
      url: request.url.to_string(),
      message: e.to_string(),
    };

    let response = builder.send().await.map_err(failed)?;
    let status = response.status().as_u16();

    let mut headers = ResourceAttributes::new();
    for (name, value) in response.headers() {
      match value.to_str() {
        Ok(value) => headers.add(name.as_str(), value),
        Err(_) => debug!(header = %name, "skipping non-ascii header value"),
      }
    }

    let text = response.text().await.map_err(failed)?;
    let body = if text.is_empty() { None } else { Some(text) };

    debug!(method = %request.method, url = %request.url, status, "received response");
    Ok(HttpResponse::new(status, headers, body))
  }
}
