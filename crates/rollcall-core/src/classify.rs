//! Employment-category classification.
//!
//! Pure and total: every entry gets a category, with [`Category::Other`] as
//! the catch-all. The rule set is a configuration value, not a constant.

use serde::{Deserialize, Serialize};

// ─── Category ────────────────────────────────────────────────────────────────

/// Semantic role of a directory entry, used for reporting only.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
  Intern,
  Regular,
  Contractor,
  ManagedServices,
  Consultant,
  BoardMember,
  Partner,
  Other,
}

impl Category {
  /// The label used in reports and configuration files.
  /// Must match the `rename_all = "snake_case"` serde tags above.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Intern => "intern",
      Self::Regular => "regular",
      Self::Contractor => "contractor",
      Self::ManagedServices => "managed_services",
      Self::Consultant => "consultant",
      Self::BoardMember => "board_member",
      Self::Partner => "partner",
      Self::Other => "other",
    }
  }
}

// ─── Rules ───────────────────────────────────────────────────────────────────

/// Maps an organizational unit to the category of everyone filed under it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitRule {
  /// Organizational-unit name as it appears in dn components (`OU=<unit>`).
  pub unit:     String,
  pub category: Category,
}

/// The classifier's configuration surface.
///
/// `unit_rules` is an ordered list: the first rule whose unit appears in the
/// dn wins, so rule order in the configuration file is significant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifierRules {
  /// Title substring (case-insensitive) marking an internship.
  #[serde(default)]
  pub intern_marker: String,
  #[serde(default)]
  pub unit_rules:    Vec<UnitRule>,
}

// ─── Classification ──────────────────────────────────────────────────────────

/// Classify an entry by title and distinguished name.
///
/// First-match-wins, in order: internship marker in the title, then the
/// configured unit rules, then [`Category::Other`]. The title check precedes
/// the unit rules, so an intern filed under a contractor OU is an intern.
pub fn classify(dn: &str, title: &str, rules: &ClassifierRules) -> Category {
  if !rules.intern_marker.is_empty()
    && title
      .to_lowercase()
      .contains(&rules.intern_marker.to_lowercase())
  {
    return Category::Intern;
  }

  for rule in &rules.unit_rules {
    if dn_in_unit(dn, &rule.unit) {
      return rule.category;
    }
  }

  Category::Other
}

/// Whether `dn` has an `OU=<unit>` component. Component-wise and
/// case-insensitive, the way directory servers compare dn attributes.
pub fn dn_in_unit(dn: &str, unit: &str) -> bool {
  let needle = format!("ou={}", unit.to_lowercase());
  dn.to_lowercase()
    .split(',')
    .any(|component| component.trim() == needle)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
