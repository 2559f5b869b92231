//! Server-rendered page handlers.
//!
//! Each resource gets the five-view shape: list, detail, create form,
//! update form, delete confirmation. Handlers parse form-encoded input,
//! delegate to the store, and render with the shared template environment.

pub mod contacts;
pub mod statuses;
