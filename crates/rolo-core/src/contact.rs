//! Contact — a person record with identity, contact details, an optional
//! status and a creation timestamp.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::status::Status;

/// A stored contact, as read back from the store.
///
/// The status reference is resolved to the full [`Status`] row on read;
/// writes carry a plain status id instead (see [`ContactDraft`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
  pub id:           i64,
  pub first_name:   String,
  pub last_name:    String,
  pub phone_number: String,
  pub email:        String,
  pub city:         String,
  pub status:       Option<Status>,
  /// Assigned once at creation; never updated afterwards.
  pub created_at:   DateTime<Utc>,
}

impl fmt::Display for Contact {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {}", self.first_name, self.last_name)
  }
}

/// Field values for creating a contact or fully replacing an existing one.
///
/// `status_id`, if present, must reference an existing status. The
/// creation timestamp is assigned by the store, not the caller.
#[derive(Debug, Clone, Default)]
pub struct ContactDraft {
  pub first_name:   String,
  pub last_name:    String,
  pub phone_number: String,
  pub email:        String,
  pub city:         String,
  pub status_id:    Option<i64>,
}

/// A partial update. `None` leaves a field untouched; for the status
/// reference, `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct ContactPatch {
  pub first_name:   Option<String>,
  pub last_name:    Option<String>,
  pub phone_number: Option<String>,
  pub email:        Option<String>,
  pub city:         Option<String>,
  pub status_id:    Option<Option<i64>>,
}

impl ContactPatch {
  pub fn is_empty(&self) -> bool {
    self.first_name.is_none()
      && self.last_name.is_none()
      && self.phone_number.is_none()
      && self.email.is_none()
      && self.city.is_none()
      && self.status_id.is_none()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn display_is_first_name_then_last_name() {
    let contact = Contact {
      id:           1,
      first_name:   "John".into(),
      last_name:    "Doe".into(),
      phone_number: "123456789".into(),
      email:        "john@example.com".into(),
      city:         "New York".into(),
      status:       None,
      created_at:   Utc::now(),
    };
    assert_eq!(contact.to_string(), "John Doe");
  }
}
