//! Error types and axum `IntoResponse` implementation for the page surface.

use axum::{
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unauthorized")]
  Unauthorized,
  #[error("not found")]
  NotFound,
  #[error("bad request: {0}")]
  BadRequest(String),
  #[error("template error: {0}")]
  Template(#[from] minijinja::Error),
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Convert a store failure. Not-found outcomes map to 404; the other
  /// domain outcomes are client errors — the form handlers intercept
  /// those to re-render with field messages before falling back here.
  pub fn from_store<E>(e: E) -> Error
  where
    E: Into<rolo_core::Error>,
  {
    match e.into() {
      rolo_core::Error::ContactNotFound(_)
      | rolo_core::Error::StatusNotFound(_) => Error::NotFound,
      rolo_core::Error::DuplicateValue(field) => {
        Error::BadRequest(field.message().to_string())
      }
      rolo_core::Error::Invalid(errors) => Error::BadRequest(errors.to_string()),
      rolo_core::Error::Backend(e) => Error::Store(e),
    }
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::Unauthorized => {
        let mut res =
          (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"rolo\""),
        );
        res
      }
      Error::NotFound => (StatusCode::NOT_FOUND, "Not Found").into_response(),
      Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
      Error::Template(e) => {
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
      }
      Error::Store(e) => {
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
      }
    }
  }
}
