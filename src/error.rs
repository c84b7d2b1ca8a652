use axum::response::{IntoResponse, Response};
use tracing::{info, warn};

use crate::classify::{classify, ClassifiedError};

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("invalid input: {0}")]
  InvalidInput(String),
  #[error("not found: {0}")]
  NotFound(String),
  #[error("Status code: {status}: {message}")]
  Upstream { status: u16, message: String },
  #[error("upstream request failed: {message}")]
  Http {
    status: Option<u16>,
    message: String,
  },
  #[error("failed to build response: {0}")]
  Response(#[from] http::Error),
  #[error(transparent)]
  Other(#[from] anyhow::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<reqwest::Error> for Error {
  fn from(err: reqwest::Error) -> Self {
    let status = err.status().map(|s| s.as_u16());
    // signed media urls carry arbitrary digits, keep them out of the message
    let message = err.without_url().to_string();
    Error::Http { status, message }
  }
}

impl Error {
  pub fn classify(&self) -> ClassifiedError {
    match self {
      Error::InvalidInput(msg) => ClassifiedError::invalid_input(msg),
      Error::NotFound(msg) => ClassifiedError::not_found(msg),
      Error::Upstream { status, message } => classify(Some(*status), message),
      Error::Http { status, message } => classify(*status, message),
      other => classify(None, &other.to_string()),
    }
  }

  pub fn upstream_status(&self) -> Option<u16> {
    match self {
      Error::Upstream { status, .. } => Some(*status),
      Error::Http { status, .. } => *status,
      _ => None,
    }
  }

  /// Log the failure of a request for `url` (and the chosen `itag`), at
  /// `warn` when the client gets a 5xx and `info` otherwise.
  pub fn log_failure(&self, url: Option<&str>, itag: Option<&str>) {
    let classified = self.classify();
    let status = classified.http_status.as_u16();
    let upstream_status = self.upstream_status();

    if classified.http_status.is_server_error() {
      warn!(
        url,
        itag,
        status,
        upstream_status,
        kind = ?classified.kind,
        error = %self,
        "request failed"
      );
    } else {
      info!(
        url,
        itag,
        status,
        upstream_status,
        kind = ?classified.kind,
        error = %self,
        "request rejected"
      );
    }
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    self.classify().into_response()
  }
}
