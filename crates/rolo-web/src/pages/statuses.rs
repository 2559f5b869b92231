//! Status pages: list, detail, create, update, delete confirmation.
//!
//! The status list is unpaginated; only the contact list pages.

use axum::{
  Form,
  extract::{Path, State},
  response::{Html, IntoResponse, Redirect, Response},
};
use minijinja::context;
use rolo_core::{
  status::Status,
  store::ContactStore,
  validate::{self, FieldErrors},
};
use serde::{Deserialize, Serialize};

use crate::{AppState, auth::Authenticated, error::Error, render};

// ─── List / detail ───────────────────────────────────────────────────────────

/// `GET /statuses/`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
) -> Result<Response, Error>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  let statuses = state.store.list_statuses().await.map_err(Error::from_store)?;
  let html = render::page(&state.templates, "status_list.html", context! {
    statuses => statuses,
  })?;
  Ok(Html(html).into_response())
}

/// `GET /statuses/{id}/`
pub async fn detail<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Path(id): Path<i64>,
) -> Result<Response, Error>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  let status = fetch_status(&state, id).await?;
  let html = render::page(&state.templates, "status_detail.html", context! {
    status => status,
  })?;
  Ok(Html(html).into_response())
}

async fn fetch_status<S>(state: &AppState<S>, id: i64) -> Result<Status, Error>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  state
    .store
    .get_status(id)
    .await
    .map_err(Error::from_store)?
    .ok_or(Error::NotFound)
}

// ─── Forms ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default, Serialize)]
#[serde(default)]
pub struct StatusFormBody {
  pub name: String,
}

async fn render_form<S>(
  state: &AppState<S>,
  title: &str,
  action: &str,
  form: &StatusFormBody,
  errors: &FieldErrors,
) -> Result<Response, Error>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  let html = render::page(&state.templates, "status_form.html", context! {
    title => title,
    action => action,
    form => form,
    errors => errors,
  })?;
  Ok(Html(html).into_response())
}

/// Fold a store rejection into the form's field messages, or bubble it up.
fn form_errors(e: rolo_core::Error) -> Result<FieldErrors, Error> {
  match e {
    rolo_core::Error::DuplicateValue(field) => {
      let mut errors = FieldErrors::new();
      errors.push(field.field(), field.message());
      Ok(errors)
    }
    rolo_core::Error::StatusNotFound(_) => Err(Error::NotFound),
    rolo_core::Error::Backend(e) => Err(Error::Store(e)),
    other => Err(Error::BadRequest(other.to_string())),
  }
}

/// `GET /statuses/create/`
pub async fn create_form<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
) -> Result<Response, Error>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  render_form(
    &state,
    "Add status",
    "/statuses/create/",
    &StatusFormBody::default(),
    &FieldErrors::new(),
  )
  .await
}

/// `POST /statuses/create/`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Form(form): Form<StatusFormBody>,
) -> Result<Response, Error>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  let name = form.name.trim().to_owned();
  if let Err(errors) = validate::validate_status_name(&name) {
    return render_form(&state, "Add status", "/statuses/create/", &form, &errors)
      .await;
  }

  match state.store.create_status(name).await {
    Ok(_) => Ok(Redirect::to("/statuses/").into_response()),
    Err(e) => {
      let errors = form_errors(e.into())?;
      render_form(&state, "Add status", "/statuses/create/", &form, &errors)
        .await
    }
  }
}

/// `GET /statuses/{id}/update/`
pub async fn update_form<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Path(id): Path<i64>,
) -> Result<Response, Error>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  let status = fetch_status(&state, id).await?;
  render_form(
    &state,
    "Edit status",
    &format!("/statuses/{id}/update/"),
    &StatusFormBody { name: status.name },
    &FieldErrors::new(),
  )
  .await
}

/// `POST /statuses/{id}/update/`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Path(id): Path<i64>,
  Form(form): Form<StatusFormBody>,
) -> Result<Response, Error>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  let action = format!("/statuses/{id}/update/");
  let name = form.name.trim().to_owned();
  if let Err(errors) = validate::validate_status_name(&name) {
    return render_form(&state, "Edit status", &action, &form, &errors).await;
  }

  match state.store.rename_status(id, name).await {
    Ok(_) => Ok(Redirect::to("/statuses/").into_response()),
    Err(e) => {
      let errors = form_errors(e.into())?;
      render_form(&state, "Edit status", &action, &form, &errors).await
    }
  }
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `GET /statuses/{id}/delete/` — confirmation page. Deleting a status
/// also deletes every contact referencing it; the page says so.
pub async fn delete_form<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Path(id): Path<i64>,
) -> Result<Response, Error>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  let status = fetch_status(&state, id).await?;
  let html =
    render::page(&state.templates, "status_confirm_delete.html", context! {
      status => status,
    })?;
  Ok(Html(html).into_response())
}

/// `POST /statuses/{id}/delete/`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Path(id): Path<i64>,
) -> Result<Response, Error>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  state
    .store
    .delete_status(id)
    .await
    .map_err(Error::from_store)?;
  Ok(Redirect::to("/statuses/").into_response())
}
