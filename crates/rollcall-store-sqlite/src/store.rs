//! [`SqliteStore`] — the SQLite implementation of [`EntryStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension as _, TransactionBehavior};
use uuid::Uuid;

use rollcall_core::{
  entry::{Entry, NormalizedEntry},
  store::EntryStore,
};

use crate::{
  Error, Result,
  encode::{RawRow, encode_date, encode_dt, encode_uuid},
  schema::SCHEMA,
};

const ENTRY_COLUMNS: &str = "entry_id, dn, display_name, title, department, \
                             location, email, employee_id, hire_date, \
                             created_at, updated_at, departed, superseded_by";

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
  Ok(RawRow {
    entry_id:      row.get(0)?,
    dn:            row.get(1)?,
    display_name:  row.get(2)?,
    title:         row.get(3)?,
    department:    row.get(4)?,
    location:      row.get(5)?,
    email:         row.get(6)?,
    employee_id:   row.get(7)?,
    hire_date:     row.get(8)?,
    created_at:    row.get(9)?,
    updated_at:    row.get(10)?,
    departed:      row.get(11)?,
    superseded_by: row.get(12)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Rollcall entry store backed by a single SQLite file.
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

  /// Point lookup by surrogate id, tombstones included. Trait consumers only
  /// ever address live rows by dn; this exists for inspection and tests.
  pub(crate) async fn entry_by_id(&self, id: Uuid) -> Result<Option<Entry>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawRow> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE entry_id = ?1"),
              rusqlite::params![id_str],
              read_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRow::into_entry).transpose()
  }
}

// ─── EntryStore impl ─────────────────────────────────────────────────────────

impl EntryStore for SqliteStore {
  type Error = Error;

  async fn count(&self) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?)
      })
      .await?;
    Ok(n as u64)
  }

  async fn find_live(&self, dn: &str) -> Result<Option<Entry>> {
    let dn = dn.to_owned();

    let raw: Option<RawRow> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {ENTRY_COLUMNS} FROM entries WHERE dn = ?1 AND departed = 0"
              ),
              rusqlite::params![dn],
              read_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRow::into_entry).transpose()
  }

  async fn apply_snapshot(
    &self,
    entries: &[NormalizedEntry],
    observed_at: DateTime<Utc>,
  ) -> Result<()> {
    let entries = entries.to_vec();
    let observed_str = encode_dt(observed_at);

    self
      .conn
      .call(move |conn| {
        // One IMMEDIATE transaction for the whole batch: the write lock is
        // taken up front and held until commit, and any failure rolls back
        // every row. A half-applied snapshot would corrupt the next diff.
        let tx =
          conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        for entry in &entries {
          let existing: Option<String> = tx
            .query_row(
              "SELECT entry_id FROM entries WHERE dn = ?1 AND departed = 0",
              rusqlite::params![entry.dn],
              |row| row.get(0),
            )
            .optional()?;

          let hire_date_str = entry.hire_date.map(encode_date);

          match existing {
            Some(id) => {
              // Same identity seen again: descriptive fields follow the
              // snapshot, entry_id and created_at stay put.
              tx.execute(
                "UPDATE entries SET
                   display_name = ?1, title = ?2, department = ?3,
                   location = ?4, email = ?5, employee_id = ?6,
                   hire_date = ?7, updated_at = ?8
                 WHERE entry_id = ?9",
                rusqlite::params![
                  entry.display_name,
                  entry.title,
                  entry.department,
                  entry.location,
                  entry.email,
                  entry.employee_id,
                  hire_date_str,
                  observed_str,
                  id,
                ],
              )?;
            }
            None => {
              tx.execute(
                "INSERT INTO entries (
                   entry_id, dn, display_name, title, department,
                   location, email, employee_id, hire_date,
                   created_at, updated_at, departed, superseded_by
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10, 0, NULL)",
                rusqlite::params![
                  encode_uuid(Uuid::new_v4()),
                  entry.dn,
                  entry.display_name,
                  entry.title,
                  entry.department,
                  entry.location,
                  entry.email,
                  entry.employee_id,
                  hire_date_str,
                  observed_str,
                ],
              )?;
            }
          }
        }

        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn stale_entries(&self, watermark: DateTime<Utc>) -> Result<Vec<Entry>> {
    let watermark_str = encode_dt(watermark);

    let raws: Vec<RawRow> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ENTRY_COLUMNS} FROM entries
           WHERE departed = 0 AND updated_at < ?1
           ORDER BY rowid"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![watermark_str], read_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRow::into_entry).collect()
  }

  async fn fresh_entries(&self) -> Result<Vec<Entry>> {
    let raws: Vec<RawRow> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ENTRY_COLUMNS} FROM entries
           WHERE departed = 0 AND created_at = updated_at
           ORDER BY rowid"
        ))?;
        let rows = stmt
          .query_map([], read_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRow::into_entry).collect()
  }

  async fn mark_departed(&self, ids: &[Uuid]) -> Result<()> {
    let id_strs: Vec<String> = ids.iter().copied().map(encode_uuid).collect();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        for id in &id_strs {
          tx.execute(
            "UPDATE entries SET departed = 1 WHERE entry_id = ?1",
            rusqlite::params![id],
          )?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn link_superseded(&self, old: Uuid, new: Uuid) -> Result<()> {
    if old == new {
      return Err(Error::SelfSupersession);
    }

    let old_str = encode_uuid(old);
    let new_str = encode_uuid(new);

    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE entries SET superseded_by = ?1 WHERE entry_id = ?2",
          rusqlite::params![new_str, old_str],
        )?)
      })
      .await?;

    if affected == 0 {
      return Err(Error::EntryNotFound(old));
    }
    Ok(())
  }
}
