//! [`SqliteStore`] — the SQLite implementation of [`ContactStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use rolo_core::{
  contact::{Contact, ContactDraft, ContactPatch},
  error::UniqueField,
  query::{ContactPage, ContactQuery, PageRequest, SearchFields, SortKey},
  status::Status,
  store::ContactStore,
};

use crate::{
  Error, Result,
  encode::{RawContact, encode_dt},
  schema::SCHEMA,
};

/// Columns selected for every contact read; the status row is joined in so
/// reads return the resolved reference.
const CONTACT_COLUMNS: &str = "c.contact_id, c.first_name, c.last_name, \
   c.phone_number, c.email, c.city, c.status_id, s.name, c.created_at";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A contact store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Read a single contact row with its status joined in.
  async fn fetch_contact(&self, id: i64) -> Result<Option<Contact>> {
    let raw: Option<RawContact> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {CONTACT_COLUMNS}
           FROM contacts c
           LEFT JOIN statuses s ON s.status_id = c.status_id
           WHERE c.contact_id = ?1"
        );
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id], read_contact_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawContact::into_contact).transpose()
  }
}

// ─── Row / error helpers ─────────────────────────────────────────────────────

fn read_contact_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawContact> {
  Ok(RawContact {
    contact_id:   row.get(0)?,
    first_name:   row.get(1)?,
    last_name:    row.get(2)?,
    phone_number: row.get(3)?,
    email:        row.get(4)?,
    city:         row.get(5)?,
    status_id:    row.get(6)?,
    status_name:  row.get(7)?,
    created_at:   row.get(8)?,
  })
}

/// Map a constraint failure onto a typed error. `status_id` is the
/// reference the failed statement carried, reported back when the failure
/// was the foreign key on the status column.
fn classify(e: tokio_rusqlite::Error, status_id: Option<i64>) -> Error {
  if let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(
    code,
    Some(message),
  )) = &e
    && code.code == rusqlite::ErrorCode::ConstraintViolation
  {
    if message.contains("contacts.email") {
      return Error::DuplicateValue(UniqueField::Email);
    }
    if message.contains("contacts.phone_number") {
      return Error::DuplicateValue(UniqueField::PhoneNumber);
    }
    if message.contains("statuses.name") {
      return Error::DuplicateValue(UniqueField::StatusName);
    }
    if message.contains("FOREIGN KEY") {
      return Error::StatusNotFound(status_id.unwrap_or_default());
    }
  }
  Error::Database(e)
}

/// ORDER BY fragment for a sort key. The id column breaks ties so
/// pagination over an unchanged snapshot never duplicates or skips a row.
fn order_by(sort: SortKey) -> &'static str {
  match sort {
    SortKey::LastName => "c.last_name COLLATE NOCASE ASC, c.contact_id ASC",
    SortKey::LastNameDesc => "c.last_name COLLATE NOCASE DESC, c.contact_id ASC",
    SortKey::CreatedAt => "c.created_at ASC, c.contact_id ASC",
    SortKey::CreatedAtDesc => "c.created_at DESC, c.contact_id ASC",
  }
}

/// Columns the free-text term is matched against, per scope.
fn search_columns(fields: SearchFields) -> &'static [&'static str] {
  match fields {
    SearchFields::All => {
      &["c.first_name", "c.last_name", "c.email", "c.phone_number", "c.city"]
    }
    SearchFields::NameAndEmail => &["c.first_name", "c.last_name", "c.email"],
  }
}

/// Escape LIKE metacharacters in a user-supplied term.
fn escape_like(term: &str) -> String {
  let mut out = String::with_capacity(term.len());
  for ch in term.chars() {
    if matches!(ch, '%' | '_' | '\\') {
      out.push('\\');
    }
    out.push(ch);
  }
  out
}

// ─── ContactStore impl ───────────────────────────────────────────────────────

impl ContactStore for SqliteStore {
  type Error = Error;

  // ── Contacts ──────────────────────────────────────────────────────────────

  async fn create_contact(&self, draft: ContactDraft) -> Result<Contact> {
    let created_at = encode_dt(Utc::now());
    let status_id = draft.status_id;

    let id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO contacts (
             first_name, last_name, phone_number, email, city,
             status_id, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            draft.first_name,
            draft.last_name,
            draft.phone_number,
            draft.email,
            draft.city,
            draft.status_id,
            created_at,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .map_err(|e| classify(e, status_id))?;

    self.fetch_contact(id).await?.ok_or(Error::ContactNotFound(id))
  }

  async fn get_contact(&self, id: i64) -> Result<Option<Contact>> {
    self.fetch_contact(id).await
  }

  async fn update_contact(&self, id: i64, draft: ContactDraft) -> Result<Contact> {
    let status_id = draft.status_id;

    // created_at is deliberately absent from the SET list.
    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE contacts SET
             first_name = ?1, last_name = ?2, phone_number = ?3,
             email = ?4, city = ?5, status_id = ?6
           WHERE contact_id = ?7",
          rusqlite::params![
            draft.first_name,
            draft.last_name,
            draft.phone_number,
            draft.email,
            draft.city,
            draft.status_id,
            id,
          ],
        )?)
      })
      .await
      .map_err(|e| classify(e, status_id))?;

    if changed == 0 {
      return Err(Error::ContactNotFound(id));
    }
    self.fetch_contact(id).await?.ok_or(Error::ContactNotFound(id))
  }

  async fn patch_contact(&self, id: i64, patch: ContactPatch) -> Result<Contact> {
    if patch.is_empty() {
      return self.fetch_contact(id).await?.ok_or(Error::ContactNotFound(id));
    }

    let status_id = patch.status_id.flatten();

    let changed: usize = self
      .conn
      .call(move |conn| {
        let mut sets: Vec<&'static str> = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(v) = patch.first_name {
          sets.push("first_name = ?");
          values.push(Box::new(v));
        }
        if let Some(v) = patch.last_name {
          sets.push("last_name = ?");
          values.push(Box::new(v));
        }
        if let Some(v) = patch.phone_number {
          sets.push("phone_number = ?");
          values.push(Box::new(v));
        }
        if let Some(v) = patch.email {
          sets.push("email = ?");
          values.push(Box::new(v));
        }
        if let Some(v) = patch.city {
          sets.push("city = ?");
          values.push(Box::new(v));
        }
        if let Some(v) = patch.status_id {
          sets.push("status_id = ?");
          values.push(Box::new(v));
        }
        values.push(Box::new(id));

        let sql = format!(
          "UPDATE contacts SET {} WHERE contact_id = ?",
          sets.join(", ")
        );
        Ok(conn.execute(
          &sql,
          rusqlite::params_from_iter(values.iter().map(|v| v.as_ref())),
        )?)
      })
      .await
      .map_err(|e| classify(e, status_id))?;

    if changed == 0 {
      return Err(Error::ContactNotFound(id));
    }
    self.fetch_contact(id).await?.ok_or(Error::ContactNotFound(id))
  }

  async fn delete_contact(&self, id: i64) -> Result<()> {
    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM contacts WHERE contact_id = ?1",
          rusqlite::params![id],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::ContactNotFound(id));
    }
    Ok(())
  }

  async fn count_contacts(&self) -> Result<u64> {
    let count: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM contacts", [], |row| row.get(0))?)
      })
      .await?;
    Ok(count as u64)
  }

  // ── Query pipeline ────────────────────────────────────────────────────────

  async fn resolve_contacts(
    &self,
    query: &ContactQuery,
    page: PageRequest,
  ) -> Result<ContactPage> {
    let status = query.status;
    let city = query.city.clone();
    let pattern = query.search.as_deref().map(|t| format!("%{}%", escape_like(t)));
    let fields = query.fields;
    let sort = query.sort;
    let limit = page.size as i64;
    let offset = page.offset() as i64;

    let (raws, total): (Vec<RawContact>, i64) = self
      .conn
      .call(move |conn| {
        // Clause assembly mirrors the pipeline stages: equality filters,
        // then the OR-combined free-text group. Ordering and the page
        // slice follow in the statement itself.
        let mut conds: Vec<String> = Vec::new();
        let mut binds: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(status_id) = status {
          conds.push("c.status_id = ?".to_owned());
          binds.push(Box::new(status_id));
        }
        if let Some(city) = city {
          conds.push("c.city = ?".to_owned());
          binds.push(Box::new(city));
        }
        if let Some(pattern) = pattern {
          let columns = search_columns(fields);
          let group = columns
            .iter()
            .map(|column| format!("{column} LIKE ? ESCAPE '\\'"))
            .collect::<Vec<_>>()
            .join(" OR ");
          conds.push(format!("({group})"));
          for _ in columns {
            binds.push(Box::new(pattern.clone()));
          }
        }

        let where_clause = if conds.is_empty() {
          String::new()
        } else {
          format!("WHERE {}", conds.join(" AND "))
        };

        // Count first so the envelope total and the slice agree; both
        // statements run back-to-back on the same connection.
        let count_sql = format!("SELECT COUNT(*) FROM contacts c {where_clause}");
        let total: i64 = conn.query_row(
          &count_sql,
          rusqlite::params_from_iter(binds.iter().map(|v| v.as_ref())),
          |row| row.get(0),
        )?;

        let sql = format!(
          "SELECT {CONTACT_COLUMNS}
           FROM contacts c
           LEFT JOIN statuses s ON s.status_id = c.status_id
           {where_clause}
           ORDER BY {order}
           LIMIT ? OFFSET ?",
          order = order_by(sort),
        );
        binds.push(Box::new(limit));
        binds.push(Box::new(offset));

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params_from_iter(binds.iter().map(|v| v.as_ref())),
            read_contact_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((rows, total))
      })
      .await?;

    let items = raws
      .into_iter()
      .map(RawContact::into_contact)
      .collect::<Result<Vec<_>>>()?;

    Ok(ContactPage {
      items,
      total_count: total as u64,
      page_number: page.number,
      page_size: page.size,
    })
  }

  // ── Statuses ──────────────────────────────────────────────────────────────

  async fn list_statuses(&self) -> Result<Vec<Status>> {
    let statuses = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare("SELECT status_id, name FROM statuses ORDER BY status_id")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(Status { id: row.get(0)?, name: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(statuses)
  }

  async fn get_status(&self, id: i64) -> Result<Option<Status>> {
    let status = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT status_id, name FROM statuses WHERE status_id = ?1",
              rusqlite::params![id],
              |row| Ok(Status { id: row.get(0)?, name: row.get(1)? }),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(status)
  }

  async fn create_status(&self, name: String) -> Result<Status> {
    let stored = name.clone();
    let id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO statuses (name) VALUES (?1)",
          rusqlite::params![name],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .map_err(|e| classify(e, None))?;

    Ok(Status { id, name: stored })
  }

  async fn rename_status(&self, id: i64, name: String) -> Result<Status> {
    let stored = name.clone();
    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE statuses SET name = ?1 WHERE status_id = ?2",
          rusqlite::params![name, id],
        )?)
      })
      .await
      .map_err(|e| classify(e, None))?;

    if changed == 0 {
      return Err(Error::StatusNotFound(id));
    }
    Ok(Status { id, name: stored })
  }

  async fn delete_status(&self, id: i64) -> Result<()> {
    // The schema's ON DELETE CASCADE removes dependent contacts in the
    // same statement.
    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM statuses WHERE status_id = ?1",
          rusqlite::params![id],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::StatusNotFound(id));
    }
    Ok(())
  }
}
