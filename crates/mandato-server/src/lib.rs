//! HTTP server wiring for the Mandato dashboard.
//!
//! Resolves the configured row source, fronts it with a
//! [`DatasetCache`] and mounts the JSON API under `/api`.

pub mod error;

pub use error::Error;

use std::{future::Future, path::PathBuf, sync::Arc, time::Duration};

use axum::{Router, routing::get};
use mandato_api::{DatasetCache, api_router};
use mandato_core::source::{Record, RowSource, Table};
use mandato_sheets::{CsvSource, SheetsConfig, SheetsSource};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

fn default_host() -> String { "127.0.0.1".to_owned() }
fn default_port() -> u16 { 8080 }
fn default_cache_ttl_secs() -> u64 { 300 }

/// Runtime server configuration, deserialised from `config.toml` and
/// `MANDATO_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:           String,
  #[serde(default = "default_port")]
  pub port:           u16,
  /// How long a reconciled dataset is served before refetching; `0`
  /// refetches on every request.
  #[serde(default = "default_cache_ttl_secs")]
  pub cache_ttl_secs: u64,
  pub source:         SourceConfig,
}

/// Where the three tables are read from.
#[derive(Deserialize, Clone)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
  /// A live Google spreadsheet.
  Sheets(SheetsConfig),
  /// A directory of `<title>.csv` exports.
  Csv { dir: PathBuf },
}

impl ServerConfig {
  /// Reject configurations that cannot possibly serve requests.
  pub fn validate(&self) -> Result<(), Error> {
    if self.host.trim().is_empty() {
      return Err(Error::InvalidConfig("host must not be empty".into()));
    }
    match &self.source {
      SourceConfig::Sheets(sheets) => {
        sheets.validate()?;
      }
      SourceConfig::Csv { dir } => {
        if dir.as_os_str().is_empty() {
          return Err(Error::InvalidConfig("source.dir must not be empty".into()));
        }
      }
    }
    Ok(())
  }

  pub fn cache_ttl(&self) -> Duration { Duration::from_secs(self.cache_ttl_secs) }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Source ───────────────────────────────────────────────────────────────────

/// The row source selected by [`SourceConfig`].
#[derive(Clone)]
pub enum ConfiguredSource {
  Sheets(SheetsSource),
  Csv(CsvSource),
}

impl ConfiguredSource {
  pub fn from_config(config: &SourceConfig) -> Result<Self, Error> {
    Ok(match config {
      SourceConfig::Sheets(sheets) => Self::Sheets(SheetsSource::new(sheets.clone())?),
      SourceConfig::Csv { dir } => Self::Csv(CsvSource::new(dir.clone())),
    })
  }

  pub fn describe(&self) -> String {
    match self {
      Self::Sheets(_) => "google sheets".to_owned(),
      Self::Csv(csv) => format!("csv directory {}", csv.dir().display()),
    }
  }
}

impl RowSource for ConfiguredSource {
  type Error = mandato_sheets::Error;

  fn fetch_table(
    &self,
    table: Table,
  ) -> impl Future<Output = Result<Vec<Record>, Self::Error>> + Send + '_ {
    async move {
      match self {
        Self::Sheets(s) => s.fetch_table(table).await,
        Self::Csv(c) => c.fetch_table(table).await,
      }
    }
  }

  fn table_titles(
    &self,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_ {
    async move {
      match self {
        Self::Sheets(s) => s.table_titles().await,
        Self::Csv(c) => c.table_titles().await,
      }
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

async fn health() -> &'static str { "ok" }

/// Build the full application router: `/health` plus the API under `/api`.
pub fn app<S>(cache: Arc<DatasetCache<S>>) -> Router
where
  S: RowSource + 'static,
{
  Router::new()
    .route("/health", get(health))
    .nest("/api", api_router(cache))
    .layer(TraceLayer::new_for_http())
}
