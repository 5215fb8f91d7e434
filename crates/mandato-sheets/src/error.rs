//! Error type for `mandato-sheets`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("missing configuration: {0}")]
  MissingConfig(&'static str),

  #[error("invalid base url: {0}")]
  InvalidUrl(String),

  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("sheets api returned {status} for {what}")]
  Status {
    what:   String,
    status: reqwest::StatusCode,
  },

  #[error("failed to read {path:?}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),

  #[error("table not found: {0:?}")]
  MissingTable(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
