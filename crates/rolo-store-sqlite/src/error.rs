//! Error type for `rolo-store-sqlite`.

use rolo_core::error::UniqueField;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("contact not found: {0}")]
  ContactNotFound(i64),

  #[error("status not found: {0}")]
  StatusNotFound(i64),

  /// A write collided with a uniqueness constraint. The store row set is
  /// unchanged when this is returned.
  #[error("duplicate value for {}", .0.field())]
  DuplicateValue(UniqueField),
}

impl From<Error> for rolo_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::ContactNotFound(id) => rolo_core::Error::ContactNotFound(id),
      Error::StatusNotFound(id) => rolo_core::Error::StatusNotFound(id),
      Error::DuplicateValue(field) => rolo_core::Error::DuplicateValue(field),
      other => rolo_core::Error::Backend(Box::new(other)),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
