//! The `ContactStore` trait — the repository surface both adapters share.
//!
//! The trait is implemented by storage backends (e.g. `rolo-store-sqlite`).
//! Adapter crates depend on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  contact::{Contact, ContactDraft, ContactPatch},
  query::{ContactPage, ContactQuery, PageRequest},
  status::Status,
};

/// Abstraction over a contact store backend.
///
/// Uniqueness (email, phone number, status name) and status-reference
/// integrity are enforced by the backend's constraint mechanism: a
/// violating write fails atomically with no partial mutation. Backend
/// errors convert into [`crate::Error`] so adapters can map typed
/// outcomes (not-found, duplicate, invalid reference) onto transport
/// responses.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ContactStore: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  // ── Contacts ──────────────────────────────────────────────────────────

  /// Persist a new contact. The creation timestamp is assigned by the
  /// store.
  fn create_contact(
    &self,
    draft: ContactDraft,
  ) -> impl Future<Output = Result<Contact, Self::Error>> + Send + '_;

  /// Retrieve a contact by id. Returns `None` if not found.
  fn get_contact(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  /// Replace every mutable field of an existing contact. The creation
  /// timestamp is never touched.
  fn update_contact(
    &self,
    id: i64,
    draft: ContactDraft,
  ) -> impl Future<Output = Result<Contact, Self::Error>> + Send + '_;

  /// Apply the non-`None` fields of `patch` to an existing contact.
  fn patch_contact(
    &self,
    id: i64,
    patch: ContactPatch,
  ) -> impl Future<Output = Result<Contact, Self::Error>> + Send + '_;

  /// Delete a contact.
  fn delete_contact(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Total number of stored contacts.
  fn count_contacts(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── Query pipeline ────────────────────────────────────────────────────

  /// Resolve one list read over the current snapshot: equality filters,
  /// then the free-text filter, then the sort order (ties broken by id
  /// ascending), then the page slice. The returned count and items come
  /// from the same snapshot. Pure read; no side effects.
  fn resolve_contacts<'a>(
    &'a self,
    query: &'a ContactQuery,
    page: PageRequest,
  ) -> impl Future<Output = Result<ContactPage, Self::Error>> + Send + 'a;

  // ── Statuses ──────────────────────────────────────────────────────────

  /// List all statuses in id order.
  fn list_statuses(
    &self,
  ) -> impl Future<Output = Result<Vec<Status>, Self::Error>> + Send + '_;

  /// Retrieve a status by id. Returns `None` if not found.
  fn get_status(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Status>, Self::Error>> + Send + '_;

  /// Create a status. Fails on a name collision.
  fn create_status(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Status, Self::Error>> + Send + '_;

  /// Rename a status, subject to the same uniqueness rule.
  fn rename_status(
    &self,
    id: i64,
    name: String,
  ) -> impl Future<Output = Result<Status, Self::Error>> + Send + '_;

  /// Delete a status and, by cascade, every contact referencing it.
  fn delete_status(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
