//! Row Source backends for the Mandato dashboard.
//!
//! - [`SheetsSource`]: the live spreadsheet, read through the Google Sheets
//!   v4 `values` endpoint.
//! - [`CsvSource`]: a directory of per-sheet CSV exports, for offline use.
//!
//! Both are read-only and return raw [`mandato_core::source::Record`]s; typing
//! happens in `mandato-core`.

mod csv_dir;
mod sheets;

pub mod error;

pub use csv_dir::CsvSource;
pub use error::{Error, Result};
pub use sheets::{DEFAULT_BASE_URL, SheetsAuth, SheetsConfig, SheetsSource};
