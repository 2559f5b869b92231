//! Handlers for `/contacts` endpoints.
//!
//! | Method   | Path            | Notes |
//! |----------|-----------------|-------|
//! | `GET`    | `/contacts`     | `?status=&city=&search=&ordering=&page=` |
//! | `POST`   | `/contacts`     | 201; write payload takes `status_id` |
//! | `GET`    | `/contacts/:id` | 404 if not found |
//! | `PUT`    | `/contacts/:id` | full replace |
//! | `PATCH`  | `/contacts/:id` | partial; `"status_id": null` clears it |
//! | `DELETE` | `/contacts/:id` | 204 |
//!
//! Reads nest the status as `{"id", "name"}`; writes reference it by id.

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use rolo_core::{
  contact::{Contact, ContactDraft, ContactPatch},
  query::{self, ContactQuery, PageRequest, SearchFields, SortKey},
  store::ContactStore,
  validate,
};
use serde::{Deserialize, Serialize};

use crate::{ApiState, error::ApiError, statuses::StatusRecord};

// ─── Wire records ────────────────────────────────────────────────────────────

/// Read-side contact representation.
#[derive(Debug, Serialize)]
pub struct ContactRecord {
  pub id:           i64,
  pub first_name:   String,
  pub last_name:    String,
  pub phone_number: String,
  pub email:        String,
  pub city:         String,
  pub status:       Option<StatusRecord>,
  pub created_at:   DateTime<Utc>,
}

impl From<Contact> for ContactRecord {
  fn from(contact: Contact) -> Self {
    Self {
      id:           contact.id,
      first_name:   contact.first_name,
      last_name:    contact.last_name,
      phone_number: contact.phone_number,
      email:        contact.email,
      city:         contact.city,
      status:       contact.status.map(StatusRecord::from),
      created_at:   contact.created_at,
    }
  }
}

/// List envelope; `next`/`previous` are page numbers, absent at the edges.
#[derive(Debug, Serialize)]
pub struct ListEnvelope {
  pub count:    u64,
  pub next:     Option<u64>,
  pub previous: Option<u64>,
  pub results:  Vec<ContactRecord>,
}

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  pub search:   Option<String>,
  pub status:   Option<String>,
  pub city:     Option<String>,
  pub ordering: Option<String>,
  pub page:     Option<String>,
}

/// `GET /contacts[?status=...][&city=...][&search=...][&ordering=...][&page=...]`
///
/// Every parameter except `page` degrades silently to its default.
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<ListEnvelope>, ApiError>
where
  S: ContactStore,
{
  let number = query::page_number(params.page.as_deref())
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;

  let contact_query = ContactQuery {
    search: query::search_term(params.search.as_deref()),
    fields: SearchFields::NameAndEmail,
    status: query::status_filter(params.status.as_deref()),
    city:   params.city.filter(|c| !c.is_empty()),
    sort:   SortKey::parse(params.ordering.as_deref()),
  };

  let page = state
    .store
    .resolve_contacts(&contact_query, PageRequest::new(number, state.page_size))
    .await
    .map_err(ApiError::from_store)?;

  Ok(Json(ListEnvelope {
    count:    page.total_count,
    next:     page.next_page(),
    previous: page.previous_page(),
    results:  page.items.into_iter().map(ContactRecord::from).collect(),
  }))
}

// ─── Create / replace ────────────────────────────────────────────────────────

/// Write payload for POST and PUT. Missing fields default to empty and are
/// rejected with field-scoped messages rather than a deserialisation error.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ContactBody {
  pub first_name:   String,
  pub last_name:    String,
  pub phone_number: String,
  pub email:        String,
  pub city:         String,
  pub status_id:    Option<i64>,
}

impl ContactBody {
  fn into_draft(self) -> ContactDraft {
    ContactDraft {
      first_name:   self.first_name,
      last_name:    self.last_name,
      phone_number: self.phone_number,
      email:        self.email,
      city:         self.city,
      status_id:    self.status_id,
    }
  }
}

/// `POST /contacts`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<ContactBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ContactStore,
{
  let draft = body.into_draft();
  validate::validate_contact_draft(&draft).map_err(ApiError::Validation)?;

  let contact = state
    .store
    .create_contact(draft)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(ContactRecord::from(contact))))
}

/// `PUT /contacts/:id`
pub async fn replace<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
  Json(body): Json<ContactBody>,
) -> Result<Json<ContactRecord>, ApiError>
where
  S: ContactStore,
{
  let draft = body.into_draft();
  validate::validate_contact_draft(&draft).map_err(ApiError::Validation)?;

  let contact = state
    .store
    .update_contact(id, draft)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(ContactRecord::from(contact)))
}

// ─── Get / patch / delete ────────────────────────────────────────────────────

/// `GET /contacts/:id`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<ContactRecord>, ApiError>
where
  S: ContactStore,
{
  let contact = state
    .store
    .get_contact(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("contact {id} not found")))?;
  Ok(Json(ContactRecord::from(contact)))
}

/// Partial write payload. An absent field is left untouched; an explicit
/// `"status_id": null` clears the reference.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ContactPatchBody {
  pub first_name:   Option<String>,
  pub last_name:    Option<String>,
  pub phone_number: Option<String>,
  pub email:        Option<String>,
  pub city:         Option<String>,
  #[serde(deserialize_with = "double_option")]
  pub status_id:    Option<Option<i64>>,
}

/// Keep `"status_id": null` (present, clearing) distinguishable from the
/// field being absent: any present value deserialises to `Some(..)`.
fn double_option<'de, D>(de: D) -> Result<Option<Option<i64>>, D::Error>
where
  D: serde::Deserializer<'de>,
{
  Deserialize::deserialize(de).map(Some)
}

impl ContactPatchBody {
  fn into_patch(self) -> ContactPatch {
    ContactPatch {
      first_name:   self.first_name,
      last_name:    self.last_name,
      phone_number: self.phone_number,
      email:        self.email,
      city:         self.city,
      status_id:    self.status_id,
    }
  }
}

/// `PATCH /contacts/:id`
pub async fn patch<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
  Json(body): Json<ContactPatchBody>,
) -> Result<Json<ContactRecord>, ApiError>
where
  S: ContactStore,
{
  let patch = body.into_patch();
  validate::validate_contact_patch(&patch).map_err(ApiError::Validation)?;

  let contact = state
    .store
    .patch_contact(id, patch)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(ContactRecord::from(contact)))
}

/// `DELETE /contacts/:id`
pub async fn remove<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: ContactStore,
{
  state
    .store
    .delete_contact(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}
