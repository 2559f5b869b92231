//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings.

use chrono::{DateTime, Utc};
use rolo_core::{contact::Contact, status::Status};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339()
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read from a `contacts` row left-joined with its status.
pub struct RawContact {
  pub contact_id:   i64,
  pub first_name:   String,
  pub last_name:    String,
  pub phone_number: String,
  pub email:        String,
  pub city:         String,
  pub status_id:    Option<i64>,
  pub status_name:  Option<String>,
  pub created_at:   String,
}

impl RawContact {
  pub fn into_contact(self) -> Result<Contact> {
    let created_at = decode_dt(&self.created_at)?;
    let status = match (self.status_id, self.status_name) {
      (Some(id), Some(name)) => Some(Status { id, name }),
      _ => None,
    };

    Ok(Contact {
      id: self.contact_id,
      first_name: self.first_name,
      last_name: self.last_name,
      phone_number: self.phone_number,
      email: self.email,
      city: self.city,
      status,
      created_at,
    })
  }
}
