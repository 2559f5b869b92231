//! JSON REST API for rolo.
//!
//! Exposes an axum [`Router`] backed by any [`rolo_core::store::ContactStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", rolo_api::api_router(store.clone(), page_size))
//! ```

pub mod contacts;
pub mod error;
pub mod statuses;

use std::sync::Arc;

use axum::{Router, routing::get};
use rolo_core::store::ContactStore;

pub use error::ApiError;

/// Shared state for API handlers: the backing store and this surface's
/// fixed page size.
#[derive(Clone)]
pub struct ApiState<S> {
  pub store:     Arc<S>,
  pub page_size: u64,
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type. The list page size is fixed at mount time; it is a
/// deployment constant, not a caller-controlled parameter.
pub fn api_router<S>(store: Arc<S>, page_size: u64) -> Router<()>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  Router::new()
    // Contacts — full CRUD
    .route(
      "/contacts",
      get(contacts::list::<S>).post(contacts::create::<S>),
    )
    .route(
      "/contacts/{id}",
      get(contacts::get_one::<S>)
        .put(contacts::replace::<S>)
        .patch(contacts::patch::<S>)
        .delete(contacts::remove::<S>),
    )
    // Statuses — read-only on this surface; axum answers mutating verbs
    // on these paths with 405.
    .route("/statuses", get(statuses::list::<S>))
    .route("/statuses/{id}", get(statuses::get_one::<S>))
    .with_state(ApiState { store, page_size })
}
