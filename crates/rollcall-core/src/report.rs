//! Run summary types — the computed output of a reconciliation pass.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  classify::{Category, ClassifierRules, classify},
  entry::{Entry, NormalizedEntry},
  matching::RenamePair,
};

// ─── Snapshot summary ────────────────────────────────────────────────────────

/// Headcount of one applied snapshot: accepted total plus per-category
/// counts. Category counts always sum to `total`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotSummary {
  pub total:      usize,
  pub categories: BTreeMap<Category, usize>,
}

/// Tally the accepted batch through the classifier.
pub fn summarize_entries(
  entries: &[NormalizedEntry],
  rules: &ClassifierRules,
) -> SnapshotSummary {
  let mut categories = BTreeMap::new();
  for entry in entries {
    let category = classify(&entry.dn, &entry.title, rules);
    *categories.entry(category).or_insert(0) += 1;
  }
  SnapshotSummary {
    total: entries.len(),
    categories,
  }
}

// ─── Run report ──────────────────────────────────────────────────────────────

/// The structured result of one reconciliation run, used both for per-entity
/// notifications and for the aggregate end-of-run notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
  /// The watermark dividing "touched this run" from "not touched this run".
  pub observed_at: DateTime<Utc>,
  /// True when the store held no entries before this run; lifecycle
  /// detection is skipped on a first run.
  pub first_run:   bool,
  /// Raw entries rejected at the ingestion gate.
  pub skipped:     usize,
  pub summary:     SnapshotSummary,
  pub renamed:     Vec<RenamePair>,
  pub departed:    Vec<Entry>,
  pub arrived:     Vec<Entry>,
}

impl RunReport {
  /// Whether the run observed any lifecycle change worth an aggregate
  /// notification.
  pub fn changed(&self) -> bool {
    !self.renamed.is_empty() || !self.departed.is_empty() || !self.arrived.is_empty()
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use crate::classify::UnitRule;

  fn normalized(dn: &str, title: &str) -> NormalizedEntry {
    NormalizedEntry {
      dn:           dn.into(),
      display_name: "Someone".into(),
      title:        title.into(),
      department:   "Dept".into(),
      location:     None,
      email:        None,
      employee_id:  None,
      hire_date:    None,
    }
  }

  #[test]
  fn category_counts_sum_to_total() {
    let rules = ClassifierRules {
      intern_marker: "intern".into(),
      unit_rules:    vec![UnitRule {
        unit:     "Employees".into(),
        category: Category::Regular,
      }],
    };
    let batch = vec![
      normalized("CN=A,OU=Employees,DC=x", "Engineer"),
      normalized("CN=B,OU=Employees,DC=x", "Engineering Intern"),
      normalized("CN=C,OU=Unknown,DC=x", "Engineer"),
    ];

    let summary = summarize_entries(&batch, &rules);

    assert_eq!(summary.total, 3);
    assert_eq!(summary.categories.values().sum::<usize>(), summary.total);
    assert_eq!(summary.categories[&Category::Regular], 1);
    assert_eq!(summary.categories[&Category::Intern], 1);
    assert_eq!(summary.categories[&Category::Other], 1);
  }

  #[test]
  fn empty_batch_summarizes_to_zero() {
    let summary = summarize_entries(&[], &ClassifierRules::default());
    assert_eq!(summary.total, 0);
    assert!(summary.categories.is_empty());
  }
}
