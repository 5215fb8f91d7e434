//! [`SheetsSource`]: reads tables from a Google spreadsheet over HTTP.
//!
//! Uses two endpoints of the Sheets v4 API:
//!
//! | Method | Path | Used for |
//! |--------|------|----------|
//! | `GET` | `/v4/spreadsheets/{id}?fields=sheets.properties.title` | [`RowSource::table_titles`] |
//! | `GET` | `/v4/spreadsheets/{id}/values/{title}` | [`RowSource::fetch_table`] |

use std::{future::Future, time::Duration};

use mandato_core::source::{Record, RowSource, Table};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::debug;

use crate::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com";

fn default_base_url() -> String { DEFAULT_BASE_URL.to_owned() }

// ─── Configuration ────────────────────────────────────────────────────────────

/// Connection settings for one spreadsheet.
///
/// Exactly one credential is used: `access_token` wins over `api_key` when
/// both are set.
#[derive(Clone, Deserialize)]
pub struct SheetsConfig {
  pub spreadsheet_id: String,
  #[serde(default)]
  pub api_key:        Option<String>,
  /// OAuth bearer token, e.g. minted for a service account.
  #[serde(default)]
  pub access_token:   Option<String>,
  #[serde(default = "default_base_url")]
  pub base_url:       String,
}

/// How requests are authenticated.
#[derive(Clone)]
pub enum SheetsAuth {
  ApiKey(String),
  BearerToken(String),
}

fn non_blank(s: &Option<String>) -> Option<&str> {
  s.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl SheetsConfig {
  /// Check required fields and resolve the credential to use.
  pub fn validate(&self) -> Result<SheetsAuth> {
    if self.spreadsheet_id.trim().is_empty() {
      return Err(Error::MissingConfig("spreadsheet_id"));
    }
    if let Some(token) = non_blank(&self.access_token) {
      return Ok(SheetsAuth::BearerToken(token.to_owned()));
    }
    if let Some(key) = non_blank(&self.api_key) {
      return Ok(SheetsAuth::ApiKey(key.to_owned()));
    }
    Err(Error::MissingConfig("api_key or access_token"))
  }
}

// ─── Source ───────────────────────────────────────────────────────────────────

/// Async client for one spreadsheet.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct SheetsSource {
  client:         Client,
  base_url:       Url,
  spreadsheet_id: String,
  auth:           SheetsAuth,
}

impl SheetsSource {
  /// Validate `config` and build a client. Fails fast on missing fields.
  pub fn new(config: SheetsConfig) -> Result<Self> {
    let auth = config.validate()?;
    let base_url = Url::parse(&config.base_url)
      .map_err(|e| Error::InvalidUrl(format!("{}: {e}", config.base_url)))?;
    let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
    Ok(Self {
      client,
      base_url,
      spreadsheet_id: config.spreadsheet_id.trim().to_owned(),
      auth,
    })
  }

  fn url(&self, tail: &[&str]) -> Result<Url> {
    let mut url = self.base_url.clone();
    url
      .path_segments_mut()
      .map_err(|_| Error::InvalidUrl(self.base_url.to_string()))?
      .pop_if_empty()
      .extend(["v4", "spreadsheets", self.spreadsheet_id.as_str()])
      .extend(tail);
    Ok(url)
  }

  fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
    match &self.auth {
      SheetsAuth::ApiKey(key) => req.query(&[("key", key)]),
      SheetsAuth::BearerToken(token) => req.bearer_auth(token),
    }
  }

  async fn get_json<T: DeserializeOwned>(
    &self,
    req: RequestBuilder,
    what: &str,
  ) -> Result<T> {
    let resp = self.authorize(req).send().await?;
    if !resp.status().is_success() {
      return Err(Error::Status {
        what:   what.to_owned(),
        status: resp.status(),
      });
    }
    Ok(resp.json().await?)
  }

  /// `GET /v4/spreadsheets/{id}/values/{title}`
  pub async fn fetch_values(&self, title: &str) -> Result<Vec<Record>> {
    let url = self.url(&["values", title])?;
    let req = self.client.get(url).query(&[
      ("majorDimension", "ROWS"),
      ("valueRenderOption", "FORMATTED_VALUE"),
    ]);
    let range: ValueRange = self.get_json(req, title).await?;
    let records = records_from_values(range.values);
    debug!(table = title, rows = records.len(), "fetched sheet values");
    Ok(records)
  }

  /// `GET /v4/spreadsheets/{id}?fields=sheets.properties.title`
  pub async fn fetch_titles(&self) -> Result<Vec<String>> {
    let url = self.url(&[])?;
    let req = self
      .client
      .get(url)
      .query(&[("fields", "sheets.properties.title")]);
    let meta: SpreadsheetMeta = self.get_json(req, "spreadsheet metadata").await?;
    Ok(meta.sheets.into_iter().map(|s| s.properties.title).collect())
  }
}

impl RowSource for SheetsSource {
  type Error = Error;

  fn fetch_table(
    &self,
    table: Table,
  ) -> impl Future<Output = Result<Vec<Record>>> + Send + '_ {
    self.fetch_values(table.title())
  }

  fn table_titles(&self) -> impl Future<Output = Result<Vec<String>>> + Send + '_ {
    self.fetch_titles()
  }
}

// ─── Wire format ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ValueRange {
  /// Omitted entirely by the API when the sheet is empty.
  #[serde(default)]
  values: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
  #[serde(default)]
  sheets: Vec<SheetMeta>,
}

#[derive(Debug, Deserialize)]
struct SheetMeta {
  properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
  title: String,
}

fn cell_text(value: Value) -> String {
  match value {
    Value::String(s) => s,
    Value::Null => String::new(),
    other => other.to_string(),
  }
}

/// Turn a `values` grid into records keyed by the first (header) row.
///
/// The API trims trailing empty cells, so rows may be shorter than the
/// header; fully blank rows are dropped.
pub(crate) fn records_from_values(values: Vec<Vec<Value>>) -> Vec<Record> {
  let mut rows = values.into_iter();
  let Some(header) = rows.next() else {
    return Vec::new();
  };
  let headers: Vec<String> = header
    .into_iter()
    .map(|v| cell_text(v).trim().trim_start_matches('\u{feff}').to_owned())
    .collect();

  rows
    .map(|row| row.into_iter().map(cell_text).collect::<Vec<_>>())
    .filter(|cells| cells.iter().any(|c| !c.trim().is_empty()))
    .map(|cells| Record::from_row(headers.as_slice(), cells))
    .collect()
}
