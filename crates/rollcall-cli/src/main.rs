//! `rollcall` — directory membership reconciliation batch job.
//!
//! Reads `config.toml` (or the path given with `--config`), loads the JSON
//! snapshot export, reconciles it against the SQLite entry store, and posts
//! lifecycle notifications to the configured chat webhook. Intended to run
//! from a scheduler; a failed run simply retries at the next invocation.
//!
//! # Configuration
//!
//! ```toml
//! store_path    = "~/.local/share/rollcall/entries.sq3"
//! snapshot_path = "/var/lib/rollcall/snapshot.json"
//!
//! [engine]
//! skip_units       = ["Service Accounts"]
//! intern_marker    = "intern"
//! hire_date_format = "%Y-%m-%d"
//! unit_rules = [
//!   { unit = "Employees",        category = "regular" },
//!   { unit = "Contractors",      category = "contractor" },
//!   { unit = "Managed Services", category = "managed_services" },
//! ]
//!
//! [webhook]
//! url   = "https://chat.example.com"
//! room  = "people-ops"
//! token = "..."
//! ```
//!
//! Environment variables prefixed `ROLLCALL_` override file values.

mod source;

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use clap::Parser;
use rollcall_core::notify::{Notifier, Severity};
use rollcall_engine::{Engine, EngineConfig};
use rollcall_store_sqlite::SqliteStore;
use rollcall_webhook::{WebhookConfig, WebhookNotifier};
use serde::Deserialize;
use source::JsonFileSource;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
  author,
  version,
  about = "Reconcile a directory snapshot against the entry store"
)]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// JSON snapshot file; overrides `snapshot_path` from the config.
  #[arg(short, long)]
  snapshot: Option<PathBuf>,

  /// Run watermark (RFC 3339); defaults to now. Useful for replays.
  #[arg(long)]
  observed_at: Option<DateTime<Utc>>,

  /// Log notifications instead of delivering them.
  #[arg(long)]
  dry_run: bool,
}

/// Shape of the TOML configuration file.
#[derive(Deserialize, Clone)]
struct CliConfig {
  store_path:    PathBuf,
  snapshot_path: Option<PathBuf>,
  #[serde(default)]
  engine:        EngineConfig,
  webhook:       Option<WebhookConfig>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config.clone()).required(false))
    .add_source(config::Environment::with_prefix("ROLLCALL").separator("__"))
    .build()
    .context("failed to read config file")?;

  let cfg: CliConfig = settings
    .try_deserialize()
    .context("failed to deserialise configuration")?;

  let snapshot_path = cli
    .snapshot
    .or(cfg.snapshot_path)
    .context("no snapshot file given (--snapshot or snapshot_path)")?;

  let store = SqliteStore::open(expand_tilde(&cfg.store_path))
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))?;
  let source = JsonFileSource::new(snapshot_path);
  let observed_at = cli.observed_at.unwrap_or_else(Utc::now);

  let report = match (&cfg.webhook, cli.dry_run) {
    (Some(webhook), false) => {
      let notifier = WebhookNotifier::new(webhook.clone())
        .context("failed to build webhook client")?;
      Engine::new(source, store, notifier, cfg.engine)
        .run(observed_at)
        .await?
    }
    _ => {
      if !cli.dry_run {
        tracing::warn!("no webhook configured; notifications go to the log");
      }
      Engine::new(source, store, LogNotifier, cfg.engine)
        .run(observed_at)
        .await?
    }
  };

  tracing::info!(
    total = report.summary.total,
    skipped = report.skipped,
    arrived = report.arrived.len(),
    departed = report.departed.len(),
    renamed = report.renamed.len(),
    first_run = report.first_run,
    "reconciliation complete"
  );

  Ok(())
}

/// Notifier used for dry runs (and when no webhook is configured): every
/// message lands in the process log instead of a chat room.
struct LogNotifier;

impl Notifier for LogNotifier {
  type Error = std::convert::Infallible;

  async fn notify(&self, message: &str, severity: Severity) -> Result<(), Self::Error> {
    tracing::info!(severity = severity.as_str(), "{message}");
    Ok(())
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
