//! Error types for `rolo-core`.

use thiserror::Error;

use crate::validate::FieldErrors;

/// A column guarded by a uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
  Email,
  PhoneNumber,
  StatusName,
}

impl UniqueField {
  /// The payload field name under which the collision is reported.
  pub fn field(self) -> &'static str {
    match self {
      UniqueField::Email => "email",
      UniqueField::PhoneNumber => "phone_number",
      UniqueField::StatusName => "name",
    }
  }

  /// Caller-facing message for a collision on this field.
  pub fn message(self) -> &'static str {
    match self {
      UniqueField::Email => "contact with this email already exists.",
      UniqueField::PhoneNumber => {
        "contact with this phone number already exists."
      }
      UniqueField::StatusName => "status with this name already exists.",
    }
  }
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("contact not found: {0}")]
  ContactNotFound(i64),

  #[error("status not found: {0}")]
  StatusNotFound(i64),

  #[error("duplicate value for {}", .0.field())]
  DuplicateValue(UniqueField),

  #[error("validation failed: {0}")]
  Invalid(FieldErrors),

  #[error("store error: {0}")]
  Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
