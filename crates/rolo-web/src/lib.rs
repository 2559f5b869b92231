//! Web layer for rolo.
//!
//! Exposes an axum [`Router`] combining the server-rendered contact pages
//! with the JSON API (mounted under `/api`), backed by any
//! [`ContactStore`]. Both surfaces share one query pipeline; they differ
//! only in page size and search scope, which are configuration.

pub mod auth;
pub mod error;
pub mod pages;
pub mod render;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  extract::Request,
  middleware::{self, Next},
  response::IntoResponse,
  routing::get,
};
use rolo_core::store::ContactStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::{AuthConfig, verify_auth};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` plus
/// `ROLO_*` environment overrides.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub store_path:         PathBuf,
  pub auth_username:      String,
  pub auth_password_hash: String,
  /// Rows per page on the rendered contact list.
  #[serde(default = "default_page_size")]
  pub page_size:          u64,
  /// Rows per page on `/api/contacts`.
  #[serde(default = "default_api_page_size")]
  pub api_page_size:      u64,
}

fn default_page_size() -> u64 {
  5
}

fn default_api_page_size() -> u64 {
  10
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all page handlers.
#[derive(Clone)]
pub struct AppState<S> {
  pub store:     Arc<S>,
  pub config:    Arc<ServerConfig>,
  pub auth:      Arc<AuthConfig>,
  pub templates: Arc<minijinja::Environment<'static>>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router: pages at the root, the JSON API
/// under `/api`. Every route requires Basic auth before any store access;
/// the API router is authless by itself, so the check is layered over it
/// here.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  let auth = state.auth.clone();
  let api = rolo_api::api_router(state.store.clone(), state.config.api_page_size)
    .layer(middleware::from_fn(move |req: Request, next: Next| {
      let auth = auth.clone();
      async move {
        if let Err(e) = verify_auth(req.headers(), &auth) {
          return e.into_response();
        }
        next.run(req).await
      }
    }));

  Router::new()
    .route("/", get(pages::contacts::list::<S>))
    .route("/{id}/", get(pages::contacts::detail::<S>))
    .route(
      "/create/",
      get(pages::contacts::create_form::<S>).post(pages::contacts::create::<S>),
    )
    .route(
      "/update/{id}/",
      get(pages::contacts::update_form::<S>).post(pages::contacts::update::<S>),
    )
    .route(
      "/delete/{id}/",
      get(pages::contacts::delete_form::<S>).post(pages::contacts::delete::<S>),
    )
    .route("/statuses/", get(pages::statuses::list::<S>))
    .route("/statuses/{id}/", get(pages::statuses::detail::<S>))
    .route(
      "/statuses/create/",
      get(pages::statuses::create_form::<S>).post(pages::statuses::create::<S>),
    )
    .route(
      "/statuses/{id}/update/",
      get(pages::statuses::update_form::<S>).post(pages::statuses::update::<S>),
    )
    .route(
      "/statuses/{id}/delete/",
      get(pages::statuses::delete_form::<S>).post(pages::statuses::delete::<S>),
    )
    .nest_service("/api", api)
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

#[cfg(test)]
mod tests;
