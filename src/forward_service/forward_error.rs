use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::{json, Value};
use thiserror::Error;

use crate::USAGE;

/// Every way a single forwarded request can fail. Each variant renders as a
/// JSON object carrying a machine readable `error` code.
#[derive(Debug, Error)]
pub enum ForwardError {
  #[error("missing `url` query parameter")]
  MissingUrl,

  #[error("invalid target url `{provided}`: {reason}")]
  InvalidUrl { provided: String, reason: String },

  #[error("invalid request body: {0}")]
  InvalidBody(String),

  #[error("request body exceeds the limit of {limit} bytes")]
  PayloadTooLarge { limit: usize },

  #[error("target answered with {status} but the response could not be relayed: {message}")]
  Upstream {
    status: StatusCode,
    message: String,
    data: Value,
  },

  #[error("unable to reach target: {0}")]
  Transport(String),

  #[error("{0}")]
  Internal(String),
}

impl ForwardError {
  pub fn code(&self) -> &'static str {
    match self {
      ForwardError::MissingUrl => "missing_url",
      ForwardError::InvalidUrl { .. } => "invalid_url",
      ForwardError::InvalidBody(_) => "invalid_body",
      ForwardError::PayloadTooLarge { .. } => "payload_too_large",
      ForwardError::Upstream { .. } => "upstream_error",
      ForwardError::Transport(_) => "upstream_unreachable",
      ForwardError::Internal(_) => "internal_error",
    }
  }

  /// Classifies a `reqwest` failure raised before any response was received.
  ///
  /// Builder failures never touched the network and are reported as internal
  /// errors; everything else (connect, DNS, TLS, timeout, redirect loop) means
  /// the target could not be reached.
  pub fn from_transport(err: reqwest::Error) -> Self {
    if let Some(status) = err.status() {
      return ForwardError::Upstream {
        status,
        message: err.to_string(),
        data: Value::Null,
      };
    }

    if err.is_builder() {
      ForwardError::Internal(err.to_string())
    } else {
      ForwardError::Transport(err.to_string())
    }
  }

  /// A response head arrived from the target but its body could not be read.
  ///
  /// A stalled or dropped connection means the exchange never completed and
  /// is reported like any other unreachable target. Only failures that are
  /// not about the connection keep the target's status.
  pub fn from_body(status: StatusCode, err: reqwest::Error) -> Self {
    if err.is_timeout() || err.is_connect() || err.is_request() || err.is_body() {
      return ForwardError::Transport(err.to_string());
    }

    ForwardError::Upstream {
      status: err.status().unwrap_or(status),
      message: err.to_string(),
      data: Value::Null,
    }
  }

  /// Mistakes in the caller's own request, never reaching the target.
  pub fn is_client_input(&self) -> bool {
    matches!(
      self,
      ForwardError::MissingUrl
        | ForwardError::InvalidUrl { .. }
        | ForwardError::InvalidBody(_)
        | ForwardError::PayloadTooLarge { .. }
    )
  }

  fn payload(&self) -> Value {
    let message = self.to_string();

    match self {
      ForwardError::MissingUrl => json!({
        "error": self.code(),
        "message": message,
        "usage": USAGE,
      }),
      ForwardError::InvalidUrl { provided, .. } => json!({
        "error": self.code(),
        "message": message,
        "provided": provided,
      }),
      ForwardError::PayloadTooLarge { limit } => json!({
        "error": self.code(),
        "message": message,
        "limit": limit,
      }),
      ForwardError::Upstream { status, data, .. } => json!({
        "error": self.code(),
        "message": message,
        "status": status.as_u16(),
        "data": data,
      }),
      ForwardError::InvalidBody(_) | ForwardError::Transport(_) | ForwardError::Internal(_) => json!({
        "error": self.code(),
        "message": message,
      }),
    }
  }
}

impl ResponseError for ForwardError {
  fn status_code(&self) -> StatusCode {
    match self {
      ForwardError::MissingUrl | ForwardError::InvalidUrl { .. } | ForwardError::InvalidBody(_) => {
        StatusCode::BAD_REQUEST
      }
      ForwardError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
      ForwardError::Upstream { status, .. } => *status,
      ForwardError::Transport(_) => StatusCode::SERVICE_UNAVAILABLE,
      ForwardError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    HttpResponse::build(self.status_code()).json(self.payload())
  }
}
