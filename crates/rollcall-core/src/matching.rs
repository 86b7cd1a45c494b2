//! Identity match resolution between departed and newly-created entries.
//!
//! A distinguished-name change (marriage, transfer, re-platforming) otherwise
//! looks identical to one departure plus one coincidentally similar hire.
//! Matching links the two halves so a rename is reported once, not twice.

use serde::{Deserialize, Serialize};

use crate::entry::Entry;

// ─── Outcome types ───────────────────────────────────────────────────────────

/// A departed entry judged to be the same person as a newly-created entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenamePair {
  pub departed:    Entry,
  pub replacement: Entry,
}

/// The three disjoint result sets of match resolution. A matched pair is
/// removed from both raw sets and appears exactly once, in `renamed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchOutcome {
  pub renamed:  Vec<RenamePair>,
  pub departed: Vec<Entry>,
  pub arrived:  Vec<Entry>,
}

// ─── Resolution ──────────────────────────────────────────────────────────────

/// Greedily pair departed entries with newly-created ones.
///
/// For each departed entry in order, the first unconsumed new entry (snapshot
/// iteration order) with an equal display name or an equal email is its
/// match. First-found, no backtracking; ties are broken by iteration order,
/// not by similarity. The heuristic can mispair two unrelated people who
/// share a display name; that is accepted.
pub fn resolve_matches(departed: Vec<Entry>, arrived: Vec<Entry>) -> MatchOutcome {
  let mut candidates: Vec<Option<Entry>> = arrived.into_iter().map(Some).collect();
  let mut renamed = Vec::new();
  let mut unmatched_departed = Vec::new();

  for old in departed {
    // Consume the first matching candidate: each entry joins at most one pair.
    let mut replacement = None;
    for slot in candidates.iter_mut() {
      if slot.as_ref().is_some_and(|candidate| is_match(&old, candidate)) {
        replacement = slot.take();
        break;
      }
    }

    match replacement {
      Some(replacement) => renamed.push(RenamePair {
        departed: old,
        replacement,
      }),
      None => unmatched_departed.push(old),
    }
  }

  MatchOutcome {
    renamed,
    departed: unmatched_departed,
    arrived: candidates.into_iter().flatten().collect(),
  }
}

/// Equal display name, or equal email when both entries carry one.
fn is_match(old: &Entry, candidate: &Entry) -> bool {
  if old.display_name == candidate.display_name {
    return true;
  }
  match (&old.email, &candidate.email) {
    (Some(a), Some(b)) => a == b,
    _ => false,
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
