//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use rolo_core::validate::FieldErrors;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// Field-scoped rejection, serialised as `{field: [messages]}`.
  #[error("validation failed: {0}")]
  Validation(FieldErrors),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Convert a store failure into its caller-facing shape. Typed domain
  /// outcomes become 404s or field-scoped 400s; anything else is a 500.
  pub fn from_store<E>(e: E) -> ApiError
  where
    E: Into<rolo_core::Error>,
  {
    match e.into() {
      rolo_core::Error::ContactNotFound(id) => {
        ApiError::NotFound(format!("contact {id} not found"))
      }
      rolo_core::Error::StatusNotFound(id) => {
        let mut errors = FieldErrors::new();
        errors.push("status_id", format!("status {id} does not exist."));
        ApiError::Validation(errors)
      }
      rolo_core::Error::DuplicateValue(field) => {
        let mut errors = FieldErrors::new();
        errors.push(field.field(), field.message());
        ApiError::Validation(errors)
      }
      rolo_core::Error::Invalid(errors) => ApiError::Validation(errors),
      rolo_core::Error::Backend(e) => ApiError::Store(e),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::NotFound(m) => {
        (StatusCode::NOT_FOUND, Json(json!({ "detail": m }))).into_response()
      }
      ApiError::BadRequest(m) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "detail": m }))).into_response()
      }
      ApiError::Validation(errors) => {
        (StatusCode::BAD_REQUEST, Json(errors)).into_response()
      }
      ApiError::Store(e) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": e.to_string() })),
      )
        .into_response(),
    }
  }
}
