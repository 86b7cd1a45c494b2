//! Chat-webhook [`Notifier`] backend.
//!
//! POSTs `{"color": …, "message": …, "notify": true}` to a room notification
//! endpoint. Severity maps onto the room color: info is green, warn is
//! yellow, alert is red. Delivery is best-effort by contract — the engine
//! logs a failure and moves on, so no retry logic lives here either.

use std::time::Duration;

use reqwest::Client;
use rollcall_core::notify::{Notifier, Severity};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Connection settings for the chat webhook, from the `[webhook]` section of
/// the configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
  /// Base URL of the chat server, e.g. `https://chat.example.com`.
  pub url:   String,
  /// Room to deliver lifecycle messages to.
  pub room:  String,
  /// Bearer token, passed as the `auth_token` query parameter.
  pub token: String,
}

// ─── Notifier ────────────────────────────────────────────────────────────────

/// Async webhook client.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct WebhookNotifier {
  client: Client,
  config: WebhookConfig,
}

impl WebhookNotifier {
  pub fn new(config: WebhookConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self { client, config })
  }

  fn notification_url(&self) -> String {
    format!(
      "{}/v2/room/{}/notification?auth_token={}",
      self.config.url.trim_end_matches('/'),
      self.config.room,
      self.config.token,
    )
  }
}

fn color(severity: Severity) -> &'static str {
  match severity {
    Severity::Info => "green",
    Severity::Warn => "yellow",
    Severity::Alert => "red",
  }
}

impl Notifier for WebhookNotifier {
  type Error = Error;

  async fn notify(&self, message: &str, severity: Severity) -> Result<()> {
    let body = serde_json::json!({
      "color":   color(severity),
      "message": message,
      "notify":  true,
    });

    self
      .client
      .post(self.notification_url())
      .json(&body)
      .send()
      .await?
      .error_for_status()?;

    Ok(())
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn severity_maps_to_room_color() {
    assert_eq!(color(Severity::Info), "green");
    assert_eq!(color(Severity::Warn), "yellow");
    assert_eq!(color(Severity::Alert), "red");
  }

  #[test]
  fn notification_url_trims_trailing_slash() {
    let notifier = WebhookNotifier::new(WebhookConfig {
      url:   "https://chat.example.com/".into(),
      room:  "people-ops".into(),
      token: "sekrit".into(),
    })
    .unwrap();

    assert_eq!(
      notifier.notification_url(),
      "https://chat.example.com/v2/room/people-ops/notification?auth_token=sekrit"
    );
  }
}
