//! Field validation for contact and status writes.
//!
//! Validation returns [`FieldErrors`] — an ordered map of field name to
//! messages — so adapters can surface failures field by field. Uniqueness
//! is not checked here; the store's constraints enforce it atomically.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::contact::{ContactDraft, ContactPatch};

pub const NAME_MAX_LEN: usize = 50;
pub const CITY_MAX_LEN: usize = 50;
pub const EMAIL_MAX_LEN: usize = 100;
/// Phone numbers are stored as local digits without a country prefix.
pub const PHONE_NUMBER_LEN: usize = 9;

// ─── FieldErrors ─────────────────────────────────────────────────────────────

/// Field-scoped validation messages, keyed by field name.
///
/// Serialises to the `{field: [messages]}` shape the JSON API returns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
    self.0.entry(field).or_default().push(message.into());
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn messages(&self, field: &str) -> &[String] {
    self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
  }

  fn into_result(self) -> Result<(), FieldErrors> {
    if self.is_empty() { Ok(()) } else { Err(self) }
  }
}

impl fmt::Display for FieldErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut first = true;
    for (field, messages) in &self.0 {
      for message in messages {
        if !first {
          f.write_str("; ")?;
        }
        write!(f, "{field}: {message}")?;
        first = false;
      }
    }
    Ok(())
  }
}

// ─── Contact rules ───────────────────────────────────────────────────────────

/// Validate a full write (create or full update).
pub fn validate_contact_draft(draft: &ContactDraft) -> Result<(), FieldErrors> {
  let mut errors = FieldErrors::new();
  check_name(&mut errors, "first_name", &draft.first_name);
  check_name(&mut errors, "last_name", &draft.last_name);
  check_phone_number(&mut errors, &draft.phone_number);
  check_email(&mut errors, &draft.email);
  check_city(&mut errors, &draft.city);
  errors.into_result()
}

/// Validate only the fields a patch actually carries.
pub fn validate_contact_patch(patch: &ContactPatch) -> Result<(), FieldErrors> {
  let mut errors = FieldErrors::new();
  if let Some(value) = &patch.first_name {
    check_name(&mut errors, "first_name", value);
  }
  if let Some(value) = &patch.last_name {
    check_name(&mut errors, "last_name", value);
  }
  if let Some(value) = &patch.phone_number {
    check_phone_number(&mut errors, value);
  }
  if let Some(value) = &patch.email {
    check_email(&mut errors, value);
  }
  if let Some(value) = &patch.city {
    check_city(&mut errors, value);
  }
  errors.into_result()
}

// ─── Status rules ────────────────────────────────────────────────────────────

pub fn validate_status_name(name: &str) -> Result<(), FieldErrors> {
  let mut errors = FieldErrors::new();
  if name.trim().is_empty() {
    errors.push("name", "This field is required.");
  } else if name.chars().count() > NAME_MAX_LEN {
    errors.push(
      "name",
      format!("Ensure this field has no more than {NAME_MAX_LEN} characters."),
    );
  }
  errors.into_result()
}

// ─── Field checks ────────────────────────────────────────────────────────────

fn check_name(errors: &mut FieldErrors, field: &'static str, value: &str) {
  if value.trim().is_empty() {
    errors.push(field, "This field is required.");
  } else if value.chars().count() > NAME_MAX_LEN {
    errors.push(
      field,
      format!("Ensure this field has no more than {NAME_MAX_LEN} characters."),
    );
  }
}

fn check_city(errors: &mut FieldErrors, value: &str) {
  if value.trim().is_empty() {
    errors.push("city", "This field is required.");
  } else if value.chars().count() > CITY_MAX_LEN {
    errors.push(
      "city",
      format!("Ensure this field has no more than {CITY_MAX_LEN} characters."),
    );
  }
}

fn check_phone_number(errors: &mut FieldErrors, value: &str) {
  if value.trim().is_empty() {
    errors.push("phone_number", "This field is required.");
  } else if value.chars().count() != PHONE_NUMBER_LEN {
    errors.push("phone_number", "Phone number must be 9 digits long.");
  }
}

fn check_email(errors: &mut FieldErrors, value: &str) {
  if value.trim().is_empty() {
    errors.push("email", "This field is required.");
  } else if value.chars().count() > EMAIL_MAX_LEN {
    errors.push(
      "email",
      format!("Ensure this field has no more than {EMAIL_MAX_LEN} characters."),
    );
  } else if !email_syntax_ok(value) {
    errors.push("email", "Enter a valid email address.");
  }
}

/// Minimal address-syntax check: one `@`, a non-empty local part, a dotted
/// domain with non-empty labels, and no whitespace anywhere.
pub fn email_syntax_ok(value: &str) -> bool {
  if value.chars().any(char::is_whitespace) {
    return false;
  }
  let Some((local, domain)) = value.split_once('@') else {
    return false;
  };
  if local.is_empty() || domain.is_empty() || domain.contains('@') {
    return false;
  }
  let labels: Vec<&str> = domain.split('.').collect();
  labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn draft() -> ContactDraft {
    ContactDraft {
      first_name:   "Alice".into(),
      last_name:    "Johnson".into(),
      phone_number: "555123456".into(),
      email:        "alice@example.com".into(),
      city:         "Chicago".into(),
      status_id:    None,
    }
  }

  #[test]
  fn valid_draft_passes() {
    assert!(validate_contact_draft(&draft()).is_ok());
  }

  #[test]
  fn missing_required_fields_are_reported_per_field() {
    let errors = validate_contact_draft(&ContactDraft::default()).unwrap_err();
    for field in ["first_name", "last_name", "phone_number", "email", "city"] {
      assert_eq!(errors.messages(field), ["This field is required."], "{field}");
    }
  }

  #[test]
  fn short_phone_number_is_rejected() {
    let mut input = draft();
    input.phone_number = "123".into();
    let errors = validate_contact_draft(&input).unwrap_err();
    assert_eq!(
      errors.messages("phone_number"),
      ["Phone number must be 9 digits long."]
    );
  }

  #[test]
  fn overlong_name_is_rejected() {
    let mut input = draft();
    input.first_name = "x".repeat(NAME_MAX_LEN + 1);
    let errors = validate_contact_draft(&input).unwrap_err();
    assert!(!errors.messages("first_name").is_empty());
  }

  #[test]
  fn email_syntax() {
    assert!(email_syntax_ok("alice@example.com"));
    assert!(email_syntax_ok("a.b+c@sub.example.co"));
    assert!(!email_syntax_ok("alice"));
    assert!(!email_syntax_ok("alice@"));
    assert!(!email_syntax_ok("@example.com"));
    assert!(!email_syntax_ok("alice@example"));
    assert!(!email_syntax_ok("alice@example..com"));
    assert!(!email_syntax_ok("alice@exa mple.com"));
    assert!(!email_syntax_ok("alice@@example.com"));
  }

  #[test]
  fn patch_checks_only_supplied_fields() {
    let patch = ContactPatch {
      city: Some("Miami".into()),
      ..Default::default()
    };
    assert!(validate_contact_patch(&patch).is_ok());

    let patch = ContactPatch {
      email: Some("not-an-email".into()),
      ..Default::default()
    };
    let errors = validate_contact_patch(&patch).unwrap_err();
    assert_eq!(errors.messages("email"), ["Enter a valid email address."]);
  }

  #[test]
  fn errors_serialise_as_field_map() {
    let mut input = draft();
    input.email = "broken".into();
    let errors = validate_contact_draft(&input).unwrap_err();
    let json = serde_json::to_value(&errors).unwrap();
    assert_eq!(json["email"][0], "Enter a valid email address.");
  }
}
