//! JSON snapshot-file source.
//!
//! The directory protocol itself is out of scope: a separate export job
//! writes the current membership as a JSON array of raw entries, and this
//! source hands that file to the engine, one full snapshot per fetch.

use std::path::PathBuf;

use rollcall_core::{entry::RawEntry, source::SnapshotSource};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
}

/// Reads the full snapshot from a JSON file on every fetch.
pub struct JsonFileSource {
  path: PathBuf,
}

impl JsonFileSource {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }
}

impl SnapshotSource for JsonFileSource {
  type Error = Error;

  async fn fetch(&self) -> Result<Vec<RawEntry>, Error> {
    let bytes = tokio::fs::read(&self.path).await?;
    Ok(serde_json::from_slice(&bytes)?)
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
