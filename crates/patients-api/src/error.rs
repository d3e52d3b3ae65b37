//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every failure path produces a `{ "error": <name>, "message": <text> }`
//! body, including the get-by-id 404 (the upstream behaviour of returning a
//! bare `{error}` there was divergent and is normalised here).

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// 404 whose message names the missing id.
  pub fn patient_not_found(id: Uuid) -> Self {
    Self::NotFound(format!("patient {id} not found"))
  }

  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, error, message) = match self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, "PatientNotFound", m),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, "BadRequest", m),
      ApiError::Store(e) => {
        (StatusCode::INTERNAL_SERVER_ERROR, "StoreError", e.to_string())
      }
    };
    (status, Json(json!({ "error": error, "message": message })))
      .into_response()
  }
}
