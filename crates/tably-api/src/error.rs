//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(tably_core::Error),
}

impl ApiError {
  /// Classify a backend failure into the response taxonomy: missing
  /// identifiers are 404, field-constraint violations 400, duplicate unique
  /// keys 409, anything else a 500.
  pub fn from_store<E: Into<tably_core::Error>>(e: E) -> Self {
    use tably_core::Error as Core;
    match e.into() {
      Core::UserNotFound(id) => Self::NotFound(format!("user {id} not found")),
      Core::Constraint(m) => Self::Conflict(m),
      Core::DuplicateAuthority(name) => {
        Self::Conflict(format!("authority {name:?} already exists"))
      }
      e @ (Core::EmailImmutable
      | Core::InvalidEmail(_)
      | Core::EmailTooLong(_)
      | Core::PasswordLength(_)) => Self::BadRequest(e.to_string()),
      other => Self::Store(other),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
