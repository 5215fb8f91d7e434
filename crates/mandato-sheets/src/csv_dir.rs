//! [`CsvSource`]: tables exported as `<dir>/<title>.csv`.

use std::{
  future::Future,
  io::ErrorKind,
  path::{Path, PathBuf},
};

use mandato_core::source::{Record, RowSource, Table};
use tracing::debug;

use crate::{Error, Result};

/// A directory holding one CSV export per sheet, named after the sheet title.
#[derive(Debug, Clone)]
pub struct CsvSource {
  dir: PathBuf,
}

impl CsvSource {
  pub fn new(dir: impl Into<PathBuf>) -> Self { Self { dir: dir.into() } }

  pub fn dir(&self) -> &Path { &self.dir }

  fn path_for(&self, title: &str) -> PathBuf { self.dir.join(format!("{title}.csv")) }

  /// Read and parse `<dir>/<title>.csv`.
  pub async fn read_table(&self, title: &str) -> Result<Vec<Record>> {
    let path = self.path_for(title);
    let bytes = match tokio::fs::read(&path).await {
      Ok(bytes) => bytes,
      Err(e) if e.kind() == ErrorKind::NotFound => {
        return Err(Error::MissingTable(title.to_owned()));
      }
      Err(source) => return Err(Error::Io { path, source }),
    };
    let records = parse_csv(&bytes)?;
    debug!(table = title, path = %path.display(), rows = records.len(), "read csv table");
    Ok(records)
  }

  /// File stems of every `*.csv` in the directory.
  pub async fn list_titles(&self) -> Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(&self.dir).await.map_err(|source| Error::Io {
      path: self.dir.clone(),
      source,
    })?;

    let mut titles = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(|source| Error::Io {
      path: self.dir.clone(),
      source,
    })? {
      let path = entry.path();
      if !path.extension().is_some_and(|ext| ext == "csv") {
        continue;
      }
      if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
        titles.push(stem.to_owned());
      }
    }
    titles.sort();
    Ok(titles)
  }
}

impl RowSource for CsvSource {
  type Error = Error;

  fn fetch_table(
    &self,
    table: Table,
  ) -> impl Future<Output = Result<Vec<Record>>> + Send + '_ {
    self.read_table(table.title())
  }

  fn table_titles(&self) -> impl Future<Output = Result<Vec<String>>> + Send + '_ {
    self.list_titles()
  }
}

/// Parse CSV text whose first line is the header row.
pub(crate) fn parse_csv(bytes: &[u8]) -> Result<Vec<Record>> {
  let mut reader = csv::ReaderBuilder::new()
    .flexible(true)
    .trim(csv::Trim::All)
    .from_reader(bytes);

  let headers: Vec<String> = reader
    .headers()?
    .iter()
    .map(|h| h.trim_start_matches('\u{feff}').trim().to_owned())
    .collect();

  let mut records = Vec::new();
  for row in reader.records() {
    let row = row?;
    if row.iter().all(str::is_empty) {
      continue;
    }
    records.push(Record::from_row(headers.as_slice(), row.iter()));
  }
  Ok(records)
}
