//! Ingestion and filtering: raw snapshot entries → accepted batch.
//!
//! This is the single validation boundary. Everything the engine persists or
//! classifies has passed through here, so downstream code never re-checks
//! field presence. A malformed entry is skipped and logged, never fatal.

use chrono::NaiveDate;
use rollcall_core::{
  classify::dn_in_unit,
  entry::{NormalizedEntry, RawEntry},
};
use serde::Deserialize;

use crate::EngineConfig;

// ─── Hire-date precedence ────────────────────────────────────────────────────

/// Which signal populates the hire date.
///
/// Upstream revisions of this logic disagreed on the precedence; it is a
/// configuration value here so the active order is visible in the config
/// file rather than implied by parsing code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HireDateSource {
  /// Prefer the explicit hire-date attribute; fall back to the directory
  /// entry's creation timestamp.
  #[default]
  AttributeThenCreated,
  /// Ignore the attribute and use the creation timestamp alone.
  CreatedOnly,
}

// ─── Filtering ───────────────────────────────────────────────────────────────

/// Filter and normalise one snapshot.
///
/// Returns the accepted batch and the number of skipped entries. An entry is
/// skipped when its dn falls under an excluded unit, or when any of the
/// required fields (display name, title, department) is missing or blank.
pub fn filter_and_normalize(
  raw: &[RawEntry],
  config: &EngineConfig,
) -> (Vec<NormalizedEntry>, usize) {
  let mut accepted = Vec::with_capacity(raw.len());
  let mut skipped = 0;

  'entries: for entry in raw {
    for unit in &config.skip_units {
      if dn_in_unit(&entry.dn, unit) {
        tracing::debug!(dn = %entry.dn, unit = %unit, "skipping entry: excluded unit");
        skipped += 1;
        continue 'entries;
      }
    }

    let (Some(display_name), Some(title), Some(department)) = (
      non_blank(&entry.display_name),
      non_blank(&entry.title),
      non_blank(&entry.department),
    ) else {
      tracing::debug!(dn = %entry.dn, "skipping entry: missing required attributes");
      skipped += 1;
      continue;
    };

    accepted.push(NormalizedEntry {
      dn:           entry.dn.clone(),
      display_name: display_name.to_owned(),
      title:        title.to_owned(),
      department:   department.to_owned(),
      location:     non_blank(&entry.location).map(str::to_owned),
      email:        non_blank(&entry.email).map(str::to_owned),
      employee_id:  non_blank(&entry.employee_id).map(str::to_owned),
      hire_date:    resolve_hire_date(entry, config),
    });
  }

  (accepted, skipped)
}

/// A field counts as present only when it contains something visible.
fn non_blank(field: &Option<String>) -> Option<&str> {
  field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Resolve the hire date per the configured precedence. Never fails the
/// entry: an absent or unparseable date resolves to `None`.
fn resolve_hire_date(entry: &RawEntry, config: &EngineConfig) -> Option<NaiveDate> {
  let from_created = || entry.when_created.map(|dt| dt.date_naive());

  match config.hire_date_source {
    HireDateSource::AttributeThenCreated => {
      parse_hire_attribute(entry, &config.hire_date_format).or_else(from_created)
    }
    HireDateSource::CreatedOnly => from_created(),
  }
}

fn parse_hire_attribute(entry: &RawEntry, format: &str) -> Option<NaiveDate> {
  let value = non_blank(&entry.hire_date)?;
  match NaiveDate::parse_from_str(value, format) {
    Ok(date) => Some(date),
    Err(e) => {
      tracing::warn!(dn = %entry.dn, value, error = %e, "unparseable hire date attribute");
      None
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
