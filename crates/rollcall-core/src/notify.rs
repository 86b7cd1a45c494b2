//! The `Notifier` trait — outbound lifecycle messages.

use std::future::Future;

use serde::{Deserialize, Serialize};

/// Urgency of an outbound message. Channels decide how to render it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  Info,
  Warn,
  Alert,
}

impl Severity {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Info => "info",
      Self::Warn => "warn",
      Self::Alert => "alert",
    }
  }
}

/// Delivers one rendered message. Both outcomes are terminal: the engine
/// never retries, and a delivery failure never rolls back persisted state.
pub trait Notifier: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn notify<'a>(
    &'a self,
    message: &'a str,
    severity: Severity,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
