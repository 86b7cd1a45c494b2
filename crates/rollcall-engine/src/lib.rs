//! The reconciliation engine: one full pass over a directory snapshot.
//!
//! The engine works entirely over the collaborator traits from
//! `rollcall-core` — where entries come from ([`SnapshotSource`]), where
//! their last-known state lives ([`EntryStore`]), and where lifecycle
//! messages go ([`Notifier`]). A pass fetches the snapshot, filters and
//! normalises it, applies it in one transaction, detects departures and
//! arrivals against the run watermark, resolves rename matches, and
//! dispatches notifications.

pub mod ingest;
pub mod messages;


use chrono::{DateTime, Utc};
use rollcall_core::{
  classify::ClassifierRules,
  matching::resolve_matches,
  notify::{Notifier, Severity},
  report::{RunReport, summarize_entries},
  source::SnapshotSource,
  store::EntryStore,
};
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use ingest::HireDateSource;

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Fatal-run failures. Per-entry problems never surface here — they are
/// handled inside ingestion — and notification failures are logged only.
#[derive(Debug, Error)]
pub enum Error {
  #[error("snapshot fetch failed: {0}")]
  Snapshot(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Configuration ───────────────────────────────────────────────────────────

/// The engine's configuration surface, passed in at construction.
/// No process-wide state: two engines with different configs can coexist.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
  /// Organizational units excluded outright (service accounts and similar).
  #[serde(default)]
  pub skip_units:       Vec<String>,
  /// Classifier rule set; flattened so the configuration file stays one
  /// level deep.
  #[serde(flatten)]
  pub rules:            ClassifierRules,
  /// chrono format string for the explicit hire-date attribute.
  #[serde(default = "default_hire_date_format")]
  pub hire_date_format: String,
  /// Which signal populates the hire date. Explicit configuration, not an
  /// implicit precedence buried in the parsing code.
  #[serde(default)]
  pub hire_date_source: HireDateSource,
}

fn default_hire_date_format() -> String {
  "%Y-%m-%d".into()
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self {
      skip_units:       Vec::new(),
      rules:            ClassifierRules::default(),
      hire_date_format: default_hire_date_format(),
      hire_date_source: HireDateSource::default(),
    }
  }
}

// ─── Engine ──────────────────────────────────────────────────────────────────

/// One reconciliation engine instance over concrete collaborators.
pub struct Engine<Src, St, N> {
  source:   Src,
  store:    St,
  notifier: N,
  config:   EngineConfig,
}

impl<Src, St, N> Engine<Src, St, N>
where
  Src: SnapshotSource,
  St: EntryStore,
  N: Notifier,
{
  pub fn new(source: Src, store: St, notifier: N, config: EngineConfig) -> Self {
    Self {
      source,
      store,
      notifier,
      config,
    }
  }

  /// Run one reconciliation pass with `observed_at` as the watermark.
  ///
  /// `observed_at` is normally wall-clock time at run start; it is a
  /// parameter so tests (and operators replaying a snapshot) can pin it.
  pub async fn run(&self, observed_at: DateTime<Utc>) -> Result<RunReport> {
    let raw = self
      .source
      .fetch()
      .await
      .map_err(|e| Error::Snapshot(Box::new(e)))?;
    tracing::info!(count = raw.len(), "fetched snapshot");

    let (accepted, skipped) = ingest::filter_and_normalize(&raw, &self.config);
    let summary = summarize_entries(&accepted, &self.config.rules);

    // First-run check must precede the apply: an empty store means there is
    // no last-known state to diff against.
    let first_run = self.store.count().await.map_err(store_error)? == 0;

    self
      .store
      .apply_snapshot(&accepted, observed_at)
      .await
      .map_err(store_error)?;
    tracing::info!(total = summary.total, skipped, "snapshot applied");

    if first_run {
      let report = RunReport {
        observed_at,
        first_run: true,
        skipped,
        summary,
        renamed: Vec::new(),
        departed: Vec::new(),
        arrived: Vec::new(),
      };
      self.dispatch(messages::first_run(report.summary.total)).await;
      return Ok(report);
    }

    // Lifecycle detection: live rows the run did not touch are departures,
    // live rows the run inserted are arrivals. Both sets may be non-empty.
    let stale = self
      .store
      .stale_entries(observed_at)
      .await
      .map_err(store_error)?;
    if !stale.is_empty() {
      let ids: Vec<Uuid> = stale.iter().map(|e| e.entry_id).collect();
      self.store.mark_departed(&ids).await.map_err(store_error)?;
      tracing::info!(count = ids.len(), "marked departed");
    }

    let fresh = self.store.fresh_entries().await.map_err(store_error)?;

    let outcome = resolve_matches(stale, fresh);
    for pair in &outcome.renamed {
      self
        .store
        .link_superseded(pair.departed.entry_id, pair.replacement.entry_id)
        .await
        .map_err(store_error)?;
    }

    let report = RunReport {
      observed_at,
      first_run: false,
      skipped,
      summary,
      renamed: outcome.renamed,
      departed: outcome.departed,
      arrived: outcome.arrived,
    };

    // Notification order is part of the contract: renames first, then
    // leftover departures, then leftover arrivals, then the aggregate.
    for pair in &report.renamed {
      self.dispatch(messages::renamed(pair)).await;
    }
    for entry in &report.departed {
      self.dispatch(messages::departure(entry)).await;
    }
    for entry in &report.arrived {
      self.dispatch(messages::arrival(entry)).await;
    }
    if report.changed() {
      self.dispatch(messages::aggregate(&report)).await;
    }

    Ok(report)
  }

  /// Fire-and-forget delivery: a failed notification is logged and the run
  /// carries on — persisted state is already committed at this point.
  async fn dispatch(&self, (message, severity): (String, Severity)) {
    if let Err(e) = self.notifier.notify(&message, severity).await {
      tracing::warn!(error = %e, severity = severity.as_str(), "notification failed");
    }
  }
}

fn store_error<E>(e: E) -> Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  Error::Store(Box::new(e))
}
