//! Query-pipeline contract: parameter normalisation and page shapes.
//!
//! Adapters parse transport input into a [`ContactQuery`] plus a
//! [`PageRequest`]; stores execute the pair and return a [`ContactPage`].
//! Every parameter except the page number degrades silently to a safe
//! default; the page number is the one input allowed to reject.

use crate::contact::Contact;

// ─── Sort key ────────────────────────────────────────────────────────────────

/// Allowed sort orders for the contact list. Anything outside the
/// allow-list falls back to [`SortKey::LastName`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
  #[default]
  LastName,
  LastNameDesc,
  CreatedAt,
  CreatedAtDesc,
}

impl SortKey {
  /// Parse a raw `sort` / `ordering` parameter. A leading `-` reverses
  /// direction; no other modifier is recognised. Unknown or absent values
  /// select the default ordering.
  pub fn parse(raw: Option<&str>) -> SortKey {
    match raw {
      Some("last_name") => SortKey::LastName,
      Some("-last_name") => SortKey::LastNameDesc,
      Some("created_at") => SortKey::CreatedAt,
      Some("-created_at") => SortKey::CreatedAtDesc,
      _ => SortKey::default(),
    }
  }

  /// The parameter form, for echoing back into list controls.
  pub fn as_param(self) -> &'static str {
    match self {
      SortKey::LastName => "last_name",
      SortKey::LastNameDesc => "-last_name",
      SortKey::CreatedAt => "created_at",
      SortKey::CreatedAtDesc => "-created_at",
    }
  }
}

// ─── Search scope ────────────────────────────────────────────────────────────

/// Which columns the free-text term matches against. The page surface
/// searches every contact column; the JSON API matches names and email
/// only. One pipeline, per-adapter configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchFields {
  /// First name, last name, email, phone number, city.
  #[default]
  All,
  /// First name, last name, email.
  NameAndEmail,
}

// ─── Query ───────────────────────────────────────────────────────────────────

/// Normalised filter/search/sort parameters for one contact-list read.
///
/// Filter categories combine with AND; the free-text term matches with OR
/// across the columns selected by `fields`.
#[derive(Debug, Clone, Default)]
pub struct ContactQuery {
  /// Case-insensitive substring term.
  pub search: Option<String>,
  pub fields: SearchFields,
  /// Exact status id. An id matching no status yields an empty result.
  pub status: Option<i64>,
  /// Exact, case-sensitive city match.
  pub city:   Option<String>,
  pub sort:   SortKey,
}

/// Normalise a raw free-text parameter: absent and empty are equivalent.
pub fn search_term(raw: Option<&str>) -> Option<String> {
  raw.filter(|s| !s.is_empty()).map(str::to_owned)
}

/// Parse a raw status filter. Only a string of ASCII digits selects a
/// filter; anything else is ignored.
pub fn status_filter(raw: Option<&str>) -> Option<i64> {
  let raw = raw?;
  if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
    return None;
  }
  raw.parse().ok()
}

// ─── Pagination ──────────────────────────────────────────────────────────────

/// A structurally invalid page token — the one query parameter that is a
/// client error rather than a silent default.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid page number: {raw:?}")]
pub struct InvalidPage {
  pub raw: String,
}

/// Parse a 1-based page number. Missing means the first page; anything
/// that is not a positive integer is rejected. Pages past the end of the
/// result set are valid and resolve to an empty page.
pub fn page_number(raw: Option<&str>) -> Result<u64, InvalidPage> {
  match raw {
    None => Ok(1),
    Some(s) => match s.parse::<u64>() {
      Ok(n) if n >= 1 => Ok(n),
      _ => Err(InvalidPage { raw: s.to_owned() }),
    },
  }
}

/// One requested slice: a 1-based page number and the calling surface's
/// page size. The size must be non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
  pub number: u64,
  pub size:   u64,
}

impl PageRequest {
  pub fn new(number: u64, size: u64) -> Self {
    debug_assert!(size > 0, "page size must be non-zero");
    Self { number, size }
  }

  pub fn offset(self) -> u64 {
    (self.number - 1) * self.size
  }
}

/// One resolved page plus everything needed to render pagination
/// controls: the total match count and the slice position.
#[derive(Debug, Clone)]
pub struct ContactPage {
  pub items:       Vec<Contact>,
  pub total_count: u64,
  pub page_number: u64,
  pub page_size:   u64,
}

impl ContactPage {
  pub fn total_pages(&self) -> u64 {
    if self.total_count == 0 {
      1
    } else {
      self.total_count.div_ceil(self.page_size)
    }
  }

  pub fn has_previous(&self) -> bool {
    self.page_number > 1
  }

  pub fn has_next(&self) -> bool {
    self.page_number < self.total_pages()
  }

  pub fn previous_page(&self) -> Option<u64> {
    self.has_previous().then(|| self.page_number - 1)
  }

  pub fn next_page(&self) -> Option<u64> {
    self.has_next().then(|| self.page_number + 1)
  }
}
