//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error renders into the uniform `{status: "error", data: <message>}`
//! envelope. Store and file-system causes are logged server-side and replaced
//! with fixed messages — raw internal error text is never echoed to clients.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler or the ingestion orchestrator.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// Structural or schema problems in the uploaded CSV. These describe the
  /// client's own input, so their messages pass through.
  #[error(transparent)]
  Csv(#[from] tally_csv::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

impl ApiError {
  /// Wrap a backend error, preserving its concrete kind behind the box.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    ApiError::Store(Box::new(err))
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Csv(e) => (StatusCode::BAD_REQUEST, e.to_string()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store operation failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "storage backend error".to_string())
      }
      ApiError::Io(e) => {
        tracing::error!(error = %e, "file handling failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "file handling error".to_string())
      }
    };
    (status, Json(json!({ "status": "error", "data": message }))).into_response()
  }
}
