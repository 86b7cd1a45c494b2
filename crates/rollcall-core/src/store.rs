//! The `EntryStore` trait and its contract.
//!
//! The trait is implemented by storage backends (e.g.
//! `rollcall-store-sqlite`). The engine depends on this abstraction, not on
//! any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::entry::{Entry, NormalizedEntry};

/// Durable keyed storage for the last-known state of every entry ever
/// observed. Entries are never deleted; a departure is a tombstone flag.
///
/// All methods return `Send` futures so the trait can be used from
/// multi-threaded async runtimes.
pub trait EntryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Total number of rows, live and departed. Zero means first run.
  fn count(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Point lookup of the live row holding `dn`, if any.
  fn find_live<'a>(
    &'a self,
    dn: &'a str,
  ) -> impl Future<Output = Result<Option<Entry>, Self::Error>> + Send + 'a;

  /// Upsert the whole accepted batch in one atomic transaction.
  ///
  /// Per entry, keyed by dn against live rows: an existing live row has its
  /// descriptive fields updated and `updated_at` set to `observed_at`,
  /// preserving `entry_id` and `created_at`; otherwise a new row is inserted
  /// with `created_at = updated_at = observed_at`. Any failure aborts the
  /// whole batch — a half-applied snapshot would corrupt the next run's
  /// diff. The transaction holds the write lock for its duration, so a
  /// concurrent run can never observe a half-committed snapshot.
  fn apply_snapshot<'a>(
    &'a self,
    entries: &'a [NormalizedEntry],
    observed_at: DateTime<Utc>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Live rows not touched by the run at `watermark`
  /// (`updated_at < watermark`), in insertion order.
  fn stale_entries(
    &self,
    watermark: DateTime<Utc>,
  ) -> impl Future<Output = Result<Vec<Entry>, Self::Error>> + Send + '_;

  /// Live rows inserted rather than updated by their latest run
  /// (`created_at = updated_at`), in insertion order.
  fn fresh_entries(
    &self,
  ) -> impl Future<Output = Result<Vec<Entry>, Self::Error>> + Send + '_;

  /// Set the tombstone flag on the given rows, in one transaction.
  /// The flag is monotonic — there is no operation that clears it.
  fn mark_departed<'a>(
    &'a self,
    ids: &'a [Uuid],
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Record that `old` (departed) was replaced by `new` in the same run.
  fn link_superseded(
    &self,
    old: Uuid,
    new: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
