//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Body sent when the row source could not be read. The underlying cause is
/// logged, never returned to the client.
pub const UNAVAILABLE_MESSAGE: &str =
  "economic data is temporarily unavailable, please try again later";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("row source unavailable: {0}")]
  Unavailable(#[source] mandato_core::Error),

  #[error("internal error: {0}")]
  Internal(String),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Unavailable(e) => {
        warn!(error = %e, "dataset fetch failed");
        (StatusCode::BAD_GATEWAY, UNAVAILABLE_MESSAGE.to_owned())
      }
      ApiError::Internal(m) => {
        error!(error = %m, "internal api error");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_owned())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
