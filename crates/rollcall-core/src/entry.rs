//! Entry — the unit of reconciliation.
//!
//! A directory identity passes through three representations: [`RawEntry`] as
//! fetched from the snapshot source, [`NormalizedEntry`] after the ingestion
//! gate, and [`Entry`] as persisted in the store. Validation happens once, at
//! the ingestion boundary; everything downstream works with the typed forms.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Raw wire form ───────────────────────────────────────────────────────────

/// One directory entry as reported by the snapshot source.
///
/// Only the distinguished name is guaranteed; every other attribute may be
/// missing, and the ingestion step decides what that means for the entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEntry {
  /// Distinguished name — the identity key, unique per live identity.
  pub dn:           String,
  pub display_name: Option<String>,
  pub title:        Option<String>,
  pub department:   Option<String>,
  pub location:     Option<String>,
  pub email:        Option<String>,
  pub employee_id:  Option<String>,
  /// Unparsed hire-date attribute, in the format documented at config time.
  pub hire_date:    Option<String>,
  /// The directory's own creation timestamp for the entry; the hire-date
  /// fallback when the explicit attribute is absent.
  pub when_created: Option<DateTime<Utc>>,
}

impl RawEntry {
  /// Minimal constructor: dn only, every attribute absent.
  pub fn new(dn: impl Into<String>) -> Self {
    Self {
      dn:           dn.into(),
      display_name: None,
      title:        None,
      department:   None,
      location:     None,
      email:        None,
      employee_id:  None,
      hire_date:    None,
      when_created: None,
    }
  }
}

// ─── Accepted form ───────────────────────────────────────────────────────────

/// A raw entry that passed the ingestion gate: display name, title, and
/// department are present and non-blank, optional attributes are normalised
/// to present/absent, and the hire date is resolved to a calendar date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedEntry {
  pub dn:           String,
  pub display_name: String,
  pub title:        String,
  pub department:   String,
  pub location:     Option<String>,
  pub email:        Option<String>,
  pub employee_id:  Option<String>,
  pub hire_date:    Option<NaiveDate>,
}

// ─── Persisted form ──────────────────────────────────────────────────────────

/// One persisted row: a distinguished identity observed over time.
///
/// `entry_id` is assigned on first observation and stable across updates.
/// The dn is unique among live rows only — a tombstone keeps its dn, and a
/// later, different identity may legitimately reuse it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
  pub entry_id:      Uuid,
  pub dn:            String,
  pub display_name:  String,
  pub title:         String,
  pub department:    String,
  pub location:      Option<String>,
  pub email:         Option<String>,
  pub employee_id:   Option<String>,
  pub hire_date:     Option<NaiveDate>,
  /// First observation of this surrogate identity; never changes afterwards.
  pub created_at:    DateTime<Utc>,
  /// Most recent run in which the identity was present in the snapshot.
  pub updated_at:    DateTime<Utc>,
  /// Monotonic tombstone flag: once true, never reset.
  pub departed:      bool,
  /// Set when this departed entry was matched to its replacement in the same
  /// run (a rename link).
  pub superseded_by: Option<Uuid>,
}
