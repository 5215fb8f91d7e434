//! The `RowSource` trait and supporting record types.
//!
//! The trait is implemented by table backends (e.g. `mandato-sheets`).
//! Higher layers (`mandato-api`, `mandato-server`) depend on this
//! abstraction, not on any concrete backend.

use std::{collections::HashMap, future::Future};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Tables ──────────────────────────────────────────────────────────────────

/// The three logical tables the reconciliation reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Table {
  Terms,
  Summary,
  History,
}

impl Table {
  pub const ALL: [Table; 3] = [Table::Terms, Table::Summary, Table::History];

  /// The sheet title this table is stored under.
  pub fn title(self) -> &'static str {
    match self {
      Self::Terms => "periodos_presidenciais",
      Self::Summary => "indicadores",
      Self::History => "historico",
    }
  }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// One row of raw cell text, addressed by column header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
  cells: HashMap<String, String>,
}

impl Record {
  /// Build a record by zipping a header row with a data row.
  ///
  /// Short rows are padded with absent cells; surplus cells without a header
  /// are ignored.
  pub fn from_row<H, C>(headers: &[H], cells: impl IntoIterator<Item = C>) -> Self
  where
    H: AsRef<str>,
    C: Into<String>,
  {
    let cells = headers
      .iter()
      .zip(cells)
      .map(|(h, c)| (h.as_ref().to_owned(), c.into()))
      .collect();
    Self { cells }
  }

  /// The raw text of `column`; blank cells read as absent.
  pub fn get(&self, column: &str) -> Option<&str> {
    self
      .cells
      .get(column)
      .map(String::as_str)
      .filter(|s| !s.trim().is_empty())
  }
}

impl<K, V> FromIterator<(K, V)> for Record
where
  K: Into<String>,
  V: Into<String>,
{
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self {
      cells: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
    }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over wherever the three tables live.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait RowSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read every data row of `table`, in sheet order.
  fn fetch_table(
    &self,
    table: Table,
  ) -> impl Future<Output = Result<Vec<Record>, Self::Error>> + Send + '_;

  /// Titles of all tables the source currently exposes.
  fn table_titles(
    &self,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;
}

/// Fail unless every required table is present in `source`.
///
/// Meant to run once at startup: a missing table is fatal for the whole
/// process, not a per-request condition.
pub async fn ensure_tables<S: RowSource>(source: &S) -> Result<()> {
  let titles = source
    .table_titles()
    .await
    .map_err(|e| Error::Source(Box::new(e)))?;

  for table in Table::ALL {
    if !titles.iter().any(|t| t == table.title()) {
      return Err(Error::MissingTable(table.title().to_owned()));
    }
  }
  Ok(())
}

// ─── In-memory backend ───────────────────────────────────────────────────────

/// A [`RowSource`] over tables held in memory.
///
/// Cloning copies the tables.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
  tables: HashMap<String, Vec<Record>>,
}

impl MemorySource {
  pub fn new() -> Self { Self::default() }

  /// Builder-style: add or replace `table`.
  pub fn with_table(mut self, table: Table, records: Vec<Record>) -> Self {
    self.tables.insert(table.title().to_owned(), records);
    self
  }
}

impl RowSource for MemorySource {
  type Error = Error;

  fn fetch_table(
    &self,
    table: Table,
  ) -> impl Future<Output = Result<Vec<Record>>> + Send + '_ {
    async move {
      self
        .tables
        .get(table.title())
        .cloned()
        .ok_or_else(|| Error::MissingTable(table.title().to_owned()))
    }
  }

  fn table_titles(&self) -> impl Future<Output = Result<Vec<String>>> + Send + '_ {
    async move { Ok(self.tables.keys().cloned().collect()) }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn blank_cells_read_as_absent() {
    let r: Record = [("a", "1"), ("b", ""), ("c", "  ")].into_iter().collect();
    assert_eq!(r.get("a"), Some("1"));
    assert_eq!(r.get("b"), None);
    assert_eq!(r.get("c"), None);
    assert_eq!(r.get("missing"), None);
  }

  #[test]
  fn short_rows_are_padded() {
    let headers = ["x", "y", "z"];
    let r = Record::from_row(&headers, ["1", "2"]);
    assert_eq!(r.get("x"), Some("1"));
    assert_eq!(r.get("y"), Some("2"));
    assert_eq!(r.get("z"), None);
  }

  #[tokio::test]
  async fn memory_source_reports_missing_table() {
    let source = MemorySource::new().with_table(Table::Terms, vec![]);
    assert!(source.fetch_table(Table::Terms).await.unwrap().is_empty());
    let err = source.fetch_table(Table::History).await.unwrap_err();
    assert!(matches!(err, Error::MissingTable(t) if t == "historico"));
  }

  #[tokio::test]
  async fn ensure_tables_requires_all_three() {
    let partial = MemorySource::new()
      .with_table(Table::Terms, vec![])
      .with_table(Table::Summary, vec![]);
    let err = ensure_tables(&partial).await.unwrap_err();
    assert!(matches!(err, Error::MissingTable(t) if t == "historico"));

    let full = partial.with_table(Table::History, vec![]);
    ensure_tables(&full).await.unwrap();
  }
}
