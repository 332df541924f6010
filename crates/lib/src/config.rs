//! Client configuration and per-call request context.
//!
//! [`ClientConfig`] describes how the HTTP transport is built. It is passed
//! explicitly to [`ReqwestClient::new`](crate::http::ReqwestClient::new);
//! nothing here is global.

use std::time::Duration;

use tracing::warn;

use crate::attributes::ResourceAttributes;
use crate::vocab::header;

/// Disable TLS certificate validation when set to `false` or `0`.
pub const ENV_SSL_VALIDATION: &str = "SHAPETREES_SSL_VALIDATION";

/// Request timeout in whole seconds; `0` disables the timeout.
pub const ENV_HTTP_TIMEOUT_SECS: &str = "SHAPETREES_HTTP_TIMEOUT_SECS";

/// Override for the `User-Agent` header.
pub const ENV_USER_AGENT: &str = "SHAPETREES_USER_AGENT";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
  /// Validate TLS certificates.
  pub ssl_validation: bool,

  /// Per-request timeout. `None` waits indefinitely.
  pub timeout: Option<Duration>,

  /// Value sent as `User-Agent`.
  pub user_agent: String,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      ssl_validation: true,
      timeout: Some(DEFAULT_TIMEOUT),
      user_agent: format!("shapetrees-lib/{}", env!("CARGO_PKG_VERSION")),
    }
  }
}

impl ClientConfig {
  /// Defaults overridden by `SHAPETREES_*` environment variables.
  ///
  /// Values that cannot be parsed are logged and ignored.
  pub fn from_env() -> Self {
    let mut config = Self::default();

    if let Ok(value) = std::env::var(ENV_SSL_VALIDATION) {
      match parse_bool(&value) {
        Some(enabled) => config.ssl_validation = enabled,
        None => warn!(var = ENV_SSL_VALIDATION, value = %value, "ignoring unparseable boolean"),
      }
    }

    if let Ok(value) = std::env::var(ENV_HTTP_TIMEOUT_SECS) {
      match value.trim().parse::<u64>() {
        Ok(0) => config.timeout = None,
        Ok(secs) => config.timeout = Some(Duration::from_secs(secs)),
        Err(_) => warn!(var = ENV_HTTP_TIMEOUT_SECS, value = %value, "ignoring unparseable timeout"),
      }
    }

    if let Ok(value) = std::env::var(ENV_USER_AGENT) {
      if !value.trim().is_empty() {
        config.user_agent = value.trim().to_string();
      }
    }

    config
  }
}

fn parse_bool(value: &str) -> Option<bool> {
  match value.trim().to_ascii_lowercase().as_str() {
    "true" | "1" | "yes" | "on" => Some(true),
    "false" | "0" | "no" | "off" => Some(false),
    _ => None,
  }
}

/// Identity and credentials for the calls made on behalf of one agent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShapeTreeContext {
  /// Sent verbatim as the `Authorization` header.
  pub credentials: Option<String>,

  /// Sent as the `Origin` header.
  pub origin_iri: Option<String>,

  /// WebID of the agent, recorded on resolution log events.
  pub web_id: Option<String>,
}

impl ShapeTreeContext {
  pub fn new(credentials: Option<String>) -> Self {
    Self {
      credentials,
      ..Default::default()
    }
  }

  /// Headers every request made in this context carries.
  pub fn request_headers(&self) -> ResourceAttributes {
    let mut headers = ResourceAttributes::new();
    if let Some(credentials) = &self.credentials {
      headers.replace(header::AUTHORIZATION, credentials);
    }
    if let Some(origin) = &self.origin_iri {
      headers.replace(header::ORIGIN, origin);
    }
    headers
  }
}
