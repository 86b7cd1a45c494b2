//! The `SnapshotSource` trait — where raw directory entries come from.

use std::future::Future;

use crate::entry::RawEntry;

/// Yields the current full set of directory entries for one reconciliation
/// run. A fetch failure is fatal for the run; no partial run is attempted.
///
/// The directory protocol itself lives behind this seam — the engine only
/// ever sees a sequence of [`RawEntry`] values.
pub trait SnapshotSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn fetch(
    &self,
  ) -> impl Future<Output = Result<Vec<RawEntry>, Self::Error>> + Send + '_;
}
