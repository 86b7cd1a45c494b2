//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as ISO 8601
//! dates, UUIDs as hyphenated lowercase strings, booleans as 0/1 integers.

use chrono::{DateTime, NaiveDate, Utc};
use rollcall_core::entry::Entry;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String {
  id.hyphenated().to_string()
}

pub fn decode_uuid(s: &str) -> Result<Uuid> {
  Ok(Uuid::parse_str(s)?)
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339()
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(date: NaiveDate) -> String {
  date.format("%Y-%m-%d").to_string()
}

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row type ────────────────────────────────────────────────────────────────

/// Raw strings read directly from an `entries` row.
pub struct RawRow {
  pub entry_id:      String,
  pub dn:            String,
  pub display_name:  String,
  pub title:         String,
  pub department:    String,
  pub location:      Option<String>,
  pub email:         Option<String>,
  pub employee_id:   Option<String>,
  pub hire_date:     Option<String>,
  pub created_at:    String,
  pub updated_at:    String,
  pub departed:      bool,
  pub superseded_by: Option<String>,
}

impl RawRow {
  pub fn into_entry(self) -> Result<Entry> {
    Ok(Entry {
      entry_id:      decode_uuid(&self.entry_id)?,
      dn:            self.dn,
      display_name:  self.display_name,
      title:         self.title,
      department:    self.department,
      location:      self.location,
      email:         self.email,
      employee_id:   self.employee_id,
      hire_date:     self
        .hire_date
        .as_deref()
        .map(decode_date)
        .transpose()?,
      created_at:    decode_dt(&self.created_at)?,
      updated_at:    decode_dt(&self.updated_at)?,
      departed:      self.departed,
      superseded_by: self
        .superseded_by
        .as_deref()
        .map(decode_uuid)
        .transpose()?,
    })
  }
}
