//! Core types and reconciliation logic for the Mandato economic dashboard.
//!
//! Turns three loosely-related tables (presidential terms, per-term summary
//! indicators, and the long economic history) into one date-aligned
//! [`Indicator`](indicator::Indicator) per term.
//!
//! This crate is deliberately free of HTTP dependencies. Table access goes
//! through the [`RowSource`](source::RowSource) trait; backends live in
//! `mandato-sheets`.

pub mod compare;
pub mod error;
pub mod indicator;
pub mod metric;
pub mod pipeline;
pub mod reconcile;
pub mod schema;
pub mod series;
pub mod source;
pub mod term;
pub mod value;

pub use error::{Error, Result};
pub use metric::MetricKind;
pub use pipeline::{Dataset, fetch_dataset};
