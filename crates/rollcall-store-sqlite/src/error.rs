//! Error type for `rollcall-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("entry not found: {0}")]
  EntryNotFound(uuid::Uuid),

  #[error("cannot link an entry as its own replacement")]
  SelfSupersession,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
