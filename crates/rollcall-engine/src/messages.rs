//! Notification message rendering.
//!
//! The engine's output is the message string plus a severity; how a channel
//! renders either is the notifier's concern.

use rollcall_core::{
  entry::Entry, matching::RenamePair, notify::Severity, report::RunReport,
};

pub fn departure(entry: &Entry) -> (String, Severity) {
  (
    format!(
      "goodbye {} ({}), {} in {} at {}",
      entry.display_name,
      opt(&entry.email),
      entry.title,
      entry.department,
      opt(&entry.location),
    ),
    Severity::Alert,
  )
}

pub fn arrival(entry: &Entry) -> (String, Severity) {
  (
    format!(
      "welcome {} ({}), {} in {} at {}",
      entry.display_name,
      opt(&entry.email),
      entry.title,
      entry.department,
      opt(&entry.location),
    ),
    Severity::Info,
  )
}

pub fn renamed(pair: &RenamePair) -> (String, Severity) {
  (
    format!(
      "renamed: {} ({}) is now {} ({})",
      pair.departed.display_name,
      pair.departed.dn,
      pair.replacement.display_name,
      pair.replacement.dn,
    ),
    Severity::Info,
  )
}

pub fn aggregate(report: &RunReport) -> (String, Severity) {
  (
    format!(
      "{} entries tracked ({} new, {} departed, {} renamed)",
      report.summary.total,
      report.arrived.len(),
      report.departed.len(),
      report.renamed.len(),
    ),
    Severity::Warn,
  )
}

pub fn first_run(total: usize) -> (String, Severity) {
  (format!("first run: tracking {total} entries"), Severity::Warn)
}

fn opt(field: &Option<String>) -> &str {
  field.as_deref().unwrap_or("-")
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};
  use uuid::Uuid;

  use super::*;

  fn entry(display_name: &str, email: Option<&str>) -> Entry {
    let ts = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    Entry {
      entry_id:      Uuid::new_v4(),
      dn:            format!("CN={display_name},OU=Employees,DC=x"),
      display_name:  display_name.into(),
      title:         "Engineer".into(),
      department:    "Engineering".into(),
      location:      Some("Berlin".into()),
      email:         email.map(Into::into),
      employee_id:   None,
      hire_date:     None,
      created_at:    ts,
      updated_at:    ts,
      departed:      false,
      superseded_by: None,
    }
  }

  #[test]
  fn departure_is_an_alert() {
    let (msg, severity) = departure(&entry("Jane Smith", Some("jane@x.com")));
    assert_eq!(severity, Severity::Alert);
    assert_eq!(
      msg,
      "goodbye Jane Smith (jane@x.com), Engineer in Engineering at Berlin"
    );
  }

  #[test]
  fn arrival_is_info() {
    let (msg, severity) = arrival(&entry("Jane Smith", None));
    assert_eq!(severity, Severity::Info);
    assert!(msg.starts_with("welcome Jane Smith (-)"));
  }

  #[test]
  fn rename_names_both_dns() {
    let pair = RenamePair {
      departed:    entry("Jane Smith", Some("jane@x.com")),
      replacement: entry("Jane Doe", Some("jane@x.com")),
    };
    let (msg, severity) = renamed(&pair);
    assert_eq!(severity, Severity::Info);
    assert!(msg.contains("CN=Jane Smith"));
    assert!(msg.contains("CN=Jane Doe"));
  }
}
