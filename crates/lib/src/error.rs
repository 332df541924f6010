//! Error taxonomy for resolution, manager handling, and orchestration.
//!
//! Every variant here is fatal to the operation that raised it. Expected
//! outcomes such as a missing plant target are reported as non-2xx
//! [`DocumentResponse`](crate::http::DocumentResponse) values instead.

use thiserror::Error;

use crate::graph::GraphError;

/// Errors raised by the shape tree client.
#[derive(Debug, Error)]
pub enum ShapeTreeError {
  /// The server sent something that cannot be interpreted, such as a
  /// malformed `Location` header or an unparseable manager/managed URL.
  #[error("protocol error: {0}")]
  Protocol(String),

  /// A manager was found without its managed resource (or the reverse), or a
  /// create request reported a resource that does not exist.
  #[error("inconsistent server state: {0}")]
  Consistency(String),

  /// The caller supplied arguments that cannot be acted on.
  #[error("invalid input: {0}")]
  Input(String),

  /// The transport failed before a response was received.
  #[error("http request to {url} failed: {message}")]
  Http { url: String, message: String },

  /// A body could not be read or written as RDF.
  #[error("graph error: {0}")]
  Graph(#[from] GraphError),

  /// A URL could not be parsed.
  #[error("invalid url: {0}")]
  InvalidUrl(#[from] url::ParseError),
}

/// Result type for shape tree operations.
pub type Result<T> = std::result::Result<T, ShapeTreeError>;
