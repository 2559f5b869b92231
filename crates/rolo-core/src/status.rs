//! Status — a named category label attachable to contacts.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A row in the status reference table (e.g. "Active", "Archived").
/// Names are unique; collisions are rejected at write time, not merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
  pub id:   i64,
  pub name: String,
}

impl fmt::Display for Status {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.name)
  }
}
