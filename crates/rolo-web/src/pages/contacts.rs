//! Contact pages: list, detail, create, update, delete confirmation.

use axum::{
  Form,
  extract::{Path, Query, State},
  response::{Html, IntoResponse, Redirect, Response},
};
use minijinja::context;
use rolo_core::{
  contact::{Contact, ContactDraft},
  query::{self, ContactQuery, PageRequest, SearchFields, SortKey},
  store::ContactStore,
  validate::{self, FieldErrors},
};
use serde::{Deserialize, Serialize};

use crate::{AppState, auth::Authenticated, error::Error, render};

// ─── Template rows ───────────────────────────────────────────────────────────

/// One contact as the templates see it.
#[derive(Debug, Serialize)]
struct ContactRow {
  id:           i64,
  name:         String,
  first_name:   String,
  last_name:    String,
  phone_number: String,
  email:        String,
  city:         String,
  status:       Option<String>,
  status_id:    Option<i64>,
  created_at:   String,
}

impl From<&Contact> for ContactRow {
  fn from(contact: &Contact) -> Self {
    Self {
      id:           contact.id,
      name:         contact.to_string(),
      first_name:   contact.first_name.clone(),
      last_name:    contact.last_name.clone(),
      phone_number: contact.phone_number.clone(),
      email:        contact.email.clone(),
      city:         contact.city.clone(),
      status:       contact.status.as_ref().map(|s| s.name.clone()),
      status_id:    contact.status.as_ref().map(|s| s.id),
      created_at:   contact.created_at.format("%Y-%m-%d %H:%M").to_string(),
    }
  }
}

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  pub q:      Option<String>,
  pub status: Option<String>,
  pub sort:   Option<String>,
  pub page:   Option<String>,
}

/// `GET /[?q=...][&status=...][&sort=...][&page=...]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Query(params): Query<ListParams>,
) -> Result<Response, Error>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  let number = query::page_number(params.page.as_deref())
    .map_err(|e| Error::BadRequest(e.to_string()))?;

  let sort = SortKey::parse(params.sort.as_deref());
  let selected_status = query::status_filter(params.status.as_deref());
  let contact_query = ContactQuery {
    search: query::search_term(params.q.as_deref()),
    fields: SearchFields::All,
    status: selected_status,
    city:   None,
    sort,
  };

  let page = state
    .store
    .resolve_contacts(
      &contact_query,
      PageRequest::new(number, state.config.page_size),
    )
    .await
    .map_err(Error::from_store)?;
  let statuses = state.store.list_statuses().await.map_err(Error::from_store)?;

  let html = render::page(&state.templates, "contact_list.html", context! {
    contacts => page.items.iter().map(ContactRow::from).collect::<Vec<_>>(),
    statuses => statuses,
    query => params.q.unwrap_or_default(),
    current_status => params.status.unwrap_or_default(),
    selected_status => selected_status,
    current_sort => sort.as_param(),
    total_count => page.total_count,
    page_number => page.page_number,
    total_pages => page.total_pages(),
    previous_page => page.previous_page(),
    next_page => page.next_page(),
  })?;
  Ok(Html(html).into_response())
}

// ─── Detail ──────────────────────────────────────────────────────────────────

/// `GET /{id}/`
pub async fn detail<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Path(id): Path<i64>,
) -> Result<Response, Error>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  let contact = state
    .store
    .get_contact(id)
    .await
    .map_err(Error::from_store)?
    .ok_or(Error::NotFound)?;

  let html = render::page(&state.templates, "contact_detail.html", context! {
    contact => ContactRow::from(&contact),
  })?;
  Ok(Html(html).into_response())
}

// ─── Forms ───────────────────────────────────────────────────────────────────

/// Form-encoded write payload. The status select posts an id or an empty
/// string for "no status".
#[derive(Debug, Deserialize, Default, Serialize)]
#[serde(default)]
pub struct ContactFormBody {
  pub first_name:   String,
  pub last_name:    String,
  pub phone_number: String,
  pub email:        String,
  pub city:         String,
  pub status:       String,
}

impl ContactFormBody {
  fn draft(&self) -> ContactDraft {
    ContactDraft {
      first_name:   self.first_name.trim().to_owned(),
      last_name:    self.last_name.trim().to_owned(),
      phone_number: self.phone_number.trim().to_owned(),
      email:        self.email.trim().to_owned(),
      city:         self.city.trim().to_owned(),
      status_id:    self.status.parse().ok(),
    }
  }

  fn from_contact(contact: &Contact) -> Self {
    Self {
      first_name:   contact.first_name.clone(),
      last_name:    contact.last_name.clone(),
      phone_number: contact.phone_number.clone(),
      email:        contact.email.clone(),
      city:         contact.city.clone(),
      status:       contact
        .status
        .as_ref()
        .map(|s| s.id.to_string())
        .unwrap_or_default(),
    }
  }
}

/// Re-render the form with the submitted values and field messages.
/// Returned with a 200, matching the list redirect only on success.
async fn render_form<S>(
  state: &AppState<S>,
  title: &str,
  action: &str,
  form: &ContactFormBody,
  errors: &FieldErrors,
) -> Result<Response, Error>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  let statuses = state.store.list_statuses().await.map_err(Error::from_store)?;
  let html = render::page(&state.templates, "contact_form.html", context! {
    title => title,
    action => action,
    form => form,
    selected_status => form.status.parse::<i64>().ok(),
    statuses => statuses,
    errors => errors,
  })?;
  Ok(Html(html).into_response())
}

/// Fold a store rejection into the form's field messages, or bubble it up.
fn form_errors<E>(e: E) -> Result<FieldErrors, Error>
where
  E: Into<rolo_core::Error>,
{
  match e.into() {
    rolo_core::Error::DuplicateValue(field) => {
      let mut errors = FieldErrors::new();
      errors.push(field.field(), field.message());
      Ok(errors)
    }
    rolo_core::Error::StatusNotFound(_) => {
      let mut errors = FieldErrors::new();
      errors.push("status", "Select a valid status.");
      Ok(errors)
    }
    rolo_core::Error::ContactNotFound(_) => Err(Error::NotFound),
    rolo_core::Error::Invalid(errors) => Ok(errors),
    rolo_core::Error::Backend(e) => Err(Error::Store(e)),
  }
}

/// `GET /create/`
pub async fn create_form<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
) -> Result<Response, Error>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  render_form(
    &state,
    "Add contact",
    "/create/",
    &ContactFormBody::default(),
    &FieldErrors::new(),
  )
  .await
}

/// `POST /create/`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Form(form): Form<ContactFormBody>,
) -> Result<Response, Error>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  let draft = form.draft();
  if let Err(errors) = validate::validate_contact_draft(&draft) {
    return render_form(&state, "Add contact", "/create/", &form, &errors).await;
  }

  match state.store.create_contact(draft).await {
    Ok(_) => Ok(Redirect::to("/").into_response()),
    Err(e) => {
      let errors = form_errors(e)?;
      render_form(&state, "Add contact", "/create/", &form, &errors).await
    }
  }
}

/// `GET /update/{id}/`
pub async fn update_form<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Path(id): Path<i64>,
) -> Result<Response, Error>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  let contact = state
    .store
    .get_contact(id)
    .await
    .map_err(Error::from_store)?
    .ok_or(Error::NotFound)?;

  render_form(
    &state,
    "Edit contact",
    &format!("/update/{id}/"),
    &ContactFormBody::from_contact(&contact),
    &FieldErrors::new(),
  )
  .await
}

/// `POST /update/{id}/`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Path(id): Path<i64>,
  Form(form): Form<ContactFormBody>,
) -> Result<Response, Error>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  let action = format!("/update/{id}/");
  let draft = form.draft();
  if let Err(errors) = validate::validate_contact_draft(&draft) {
    return render_form(&state, "Edit contact", &action, &form, &errors).await;
  }

  match state.store.update_contact(id, draft).await {
    Ok(_) => Ok(Redirect::to("/").into_response()),
    Err(e) => {
      let errors = form_errors(e)?;
      render_form(&state, "Edit contact", &action, &form, &errors).await
    }
  }
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `GET /delete/{id}/` — confirmation page.
pub async fn delete_form<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Path(id): Path<i64>,
) -> Result<Response, Error>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  let contact = state
    .store
    .get_contact(id)
    .await
    .map_err(Error::from_store)?
    .ok_or(Error::NotFound)?;

  let html =
    render::page(&state.templates, "contact_confirm_delete.html", context! {
      contact => ContactRow::from(&contact),
    })?;
  Ok(Html(html).into_response())
}

/// `POST /delete/{id}/`
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
    .delete_contact(id)
    .await
    .map_err(Error::from_store)?;
  Ok(Redirect::to("/").into_response())
}
