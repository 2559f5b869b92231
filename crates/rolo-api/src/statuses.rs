//! Read-only handlers for `/statuses` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/statuses` | Plain array, id order |
//! | `GET`  | `/statuses/:id` | 404 if not found |

use axum::{
  Json,
  extract::{Path, State},
};
use rolo_core::{status::Status, store::ContactStore};
use serde::Serialize;

use crate::{ApiState, error::ApiError};

/// Wire representation of a status, nested into contact reads as well.
#[derive(Debug, Serialize)]
pub struct StatusRecord {
  pub id:   i64,
  pub name: String,
}

impl From<Status> for StatusRecord {
  fn from(status: Status) -> Self {
    Self { id: status.id, name: status.name }
  }
}

/// `GET /statuses`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<StatusRecord>>, ApiError>
where
  S: ContactStore,
{
  let statuses = state
    .store
    .list_statuses()
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(statuses.into_iter().map(StatusRecord::from).collect()))
}

/// `GET /statuses/:id`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<StatusRecord>, ApiError>
where
  S: ContactStore,
{
  let status = state
    .store
    .get_status(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("status {id} not found")))?;
  Ok(Json(StatusRecord::from(status)))
}
