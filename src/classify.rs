//! Maps upstream failures onto the closed set of errors clients get to see.
//!
//! The provider only reports some failures as free text, so this is the one
//! place allowed to look inside raw error messages.

use std::sync::LazyLock;

use axum::{
  response::{IntoResponse, Response},
  Json,
};
use http::StatusCode;
use regex::Regex;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
  InvalidInput,
  GoneNoLongerAvailable,
  NotFound,
  UpstreamError,
  Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedError {
  pub kind: ErrorKind,
  pub http_status: StatusCode,
  pub message: String,
  pub details: Option<String>,
  pub retryable: bool,
}

static STATUS_CODE_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"Status code: (\d{3})").unwrap());

/// Classify an upstream failure from its status (when one is known) and its
/// message.
pub fn classify(status: Option<u16>, message: &str) -> ClassifiedError {
  if status == Some(410) || message.contains("410") {
    return ClassifiedError::gone();
  }

  let status = STATUS_CODE_REGEX
    .captures(message)
    .and_then(|caps| caps[1].parse::<u16>().ok())
    .or(status)
    .and_then(|code| StatusCode::from_u16(code).ok())
    .filter(|code| code.is_client_error() || code.is_server_error());

  match status {
    Some(code) => ClassifiedError {
      kind: ErrorKind::UpstreamError,
      http_status: code,
      message: "YouTube API error".into(),
      details: Some(message.into()),
      retryable: code.is_server_error(),
    },
    None => ClassifiedError {
      kind: ErrorKind::Unknown,
      http_status: StatusCode::INTERNAL_SERVER_ERROR,
      message: "Failed to process request".into(),
      details: Some(message.into()),
      retryable: true,
    },
  }
}

impl ClassifiedError {
  pub fn invalid_input(message: &str) -> Self {
    Self {
      kind: ErrorKind::InvalidInput,
      http_status: StatusCode::BAD_REQUEST,
      message: message.into(),
      details: None,
      retryable: false,
    }
  }

  pub fn not_found(message: &str) -> Self {
    Self {
      kind: ErrorKind::NotFound,
      http_status: StatusCode::NOT_FOUND,
      message: message.into(),
      details: None,
      retryable: false,
    }
  }

  fn gone() -> Self {
    Self {
      kind: ErrorKind::GoneNoLongerAvailable,
      http_status: StatusCode::GONE,
      message: "Video no longer available".into(),
      details: Some(
        "The requested video has been removed or is no longer accessible"
          .into(),
      ),
      retryable: false,
    }
  }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
  error: &'a str,
  kind: ErrorKind,
  retryable: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  details: Option<&'a str>,
}

impl IntoResponse for ClassifiedError {
  fn into_response(self) -> Response {
    let body = ErrorBody {
      error: &self.message,
      kind: self.kind,
      retryable: self.retryable,
      details: self.details.as_deref(),
    };

    (self.http_status, Json(body)).into_response()
  }
}
