//! mandato-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) layered with
//! `MANDATO_*` environment variables, checks that the three source tables
//! exist, and serves the dashboard API over HTTP.
//!
//! ```text
//! MANDATO_SOURCE__KIND=csv MANDATO_SOURCE__DIR=./data mandato-server --dump
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use mandato_api::DatasetCache;
use mandato_core::{fetch_dataset, source::ensure_tables};
use mandato_server::{ConfiguredSource, ServerConfig};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Mandato economic dashboard server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Fetch and reconcile once, print the dashboard JSON and exit.
  #[arg(long)]
  dump: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(
      config::Environment::with_prefix("MANDATO")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true),
    )
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;
  server_cfg.validate().context("invalid configuration")?;

  let source = ConfiguredSource::from_config(&server_cfg.source)
    .context("failed to build row source")?;
  ensure_tables(&source)
    .await
    .with_context(|| format!("required tables missing from {}", source.describe()))?;

  if cli.dump {
    let dataset = fetch_dataset(&source).await.context("failed to fetch dataset")?;
    let json = serde_json::to_string_pretty(&dataset.dashboard())
      .context("failed to serialise dashboard")?;
    println!("{json}");
    return Ok(());
  }

  tracing::info!(
    source = %source.describe(),
    cache_ttl_secs = server_cfg.cache_ttl_secs,
    "row source ready"
  );
  let cache = Arc::new(DatasetCache::new(source, server_cfg.cache_ttl()));
  let app = mandato_server::app(cache);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
