//! Error types for `mandato-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("required table not found: {0:?}")]
  MissingTable(String),

  #[error("row source error: {0}")]
  Source(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("missing required cell {0:?}")]
  MissingCell(&'static str),

  #[error("invalid number: {0:?}")]
  InvalidNumber(String),

  #[error("invalid date: {0:?}")]
  InvalidDate(String),

  #[error("term {0:?} does not start before it ends")]
  InvertedTerm(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
