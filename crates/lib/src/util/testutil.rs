//! Test utilities for shapetrees-lib.
//!
//! This module provides an in-memory [`HttpClient`] that serves canned
//! responses and records every request it receives, plus `proptest`
//! strategies for assignments and managers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use proptest::prelude::*;
use url::Url;

use crate::attributes::ResourceAttributes;
use crate::error::Result;
use crate::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use crate::manager::{ShapeTreeAssignment, ShapeTreeManager};

/// Parse a URL literal.
pub fn url(s: &str) -> Url {
  Url::parse(s).unwrap()
}

/// Build a response with `(target, rel)` Link headers, an optional content
/// type, and an optional body.
pub fn response(status: u16, links: &[(&str, &str)], content_type: Option<&str>, body: Option<&str>) -> HttpResponse {
  let mut headers = ResourceAttributes::new();
  for (target, rel) in links {
    headers.add("Link", &format!("<{}>; rel=\"{}\"", target, rel));
  }
  if let Some(content_type) = content_type {
    headers.set("Content-Type", content_type);
  }
  HttpResponse::new(status, headers, body.map(str::to_string))
}

/// Canned-response transport.
///
/// Requests without a registered response get an empty 404. Clones share
/// their responses and request log.
#[derive(Clone, Default)]
pub struct MockHttpClient {
  responses: Arc<Mutex<HashMap<(HttpMethod, String), HttpResponse>>>,
  requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockHttpClient {
  pub fn new() -> Self {
    Self::default()
  }

  /// Serve `response` for `method` on `url`.
  pub fn on(self, method: HttpMethod, url: &str, response: HttpResponse) -> Self {
    self
      .responses
      .lock()
      .unwrap()
      .insert((method, url.to_string()), response);
    self
  }

  /// Every request received so far, in order.
  pub fn requests(&self) -> Vec<HttpRequest> {
    self.requests.lock().unwrap().clone()
  }

  /// Requests other than GET, in order.
  pub fn writes(&self) -> Vec<HttpRequest> {
    self
      .requests()
      .into_iter()
      .filter(|r| r.method != HttpMethod::Get)
      .collect()
  }
}

#[async_trait]
impl HttpClient for MockHttpClient {
  async fn fetch_shape_tree_response(&self, request: &HttpRequest) -> Result<HttpResponse> {
    self.requests.lock().unwrap().push(request.clone());
    let response = self
      .responses
      .lock()
      .unwrap()
      .get(&(request.method, request.url.to_string()))
      .cloned()
      .unwrap_or_else(|| HttpResponse::new(404, ResourceAttributes::new(), None));
    Ok(response)
  }
}

/// Manager document every generated manager lives at.
pub const ARB_MANAGER_URL: &str = "https://pod.example/notes/.shapetree";

fn arb_segment() -> impl Strategy<Value = String> {
  "[a-z][a-z0-9]{0,7}"
}

/// Assignments in the manager at [`ARB_MANAGER_URL`], with an optional focus
/// node and, when a focus node is present, an optional shape.
pub fn arb_assignment() -> impl Strategy<Value = ShapeTreeAssignment> {
  let validation = prop::option::of((arb_segment(), prop::option::of(arb_segment())));
  (arb_segment(), arb_segment(), arb_segment(), any::<bool>(), validation).prop_map(
    |(slot, tree, resource, is_root, validation)| {
      let slot = url(&format!("{}#ln-{}", ARB_MANAGER_URL, slot));
      let root = if is_root {
        slot.clone()
      } else {
        url("https://pod.example/.shapetree#ln-root")
      };
      let (focus_node, shape) = match validation {
        Some((focus, shape)) => (
          Some(url(&format!("https://pod.example/notes/{}#it", focus))),
          shape.map(|s| url(&format!("https://shapes.example/{}#Shape", s))),
        ),
        None => (None, None),
      };
      ShapeTreeAssignment::new(
        url(&format!("https://trees.example/{}#tree", tree)),
        url(&format!("https://pod.example/notes/{}", resource)),
        root,
        focus_node,
        shape,
        slot,
      )
      .unwrap()
    },
  )
}

/// Managers at [`ARB_MANAGER_URL`] holding up to five assignments.
pub fn arb_manager() -> impl Strategy<Value = ShapeTreeManager> {
  prop::collection::vec(arb_assignment(), 0..6).prop_map(|assignments| {
    let mut manager = ShapeTreeManager::new(url(ARB_MANAGER_URL));
    for assignment in assignments {
      manager.add_assignment(assignment);
    }
    manager
  })
}
