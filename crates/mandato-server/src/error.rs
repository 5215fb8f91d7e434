//! Startup error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid configuration: {0}")]
  InvalidConfig(String),
  #[error("row source error: {0}")]
  Source(#[from] mandato_sheets::Error),
}
