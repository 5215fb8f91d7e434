//! Fixed column layout of the three tables and their typed conversions.
//!
//! Raw [`Record`]s are validated exactly once here; everything downstream
//! operates on [`Term`], [`SummaryRow`] and [`HistorySet`].

use chrono::NaiveDateTime;
use tracing::warn;

use crate::{
  Error, Result,
  metric::MetricKind,
  series::{HistoryRow, HistorySet},
  source::Record,
  term::Term,
  value::{parse_date, parse_number, try_parse_date},
};

// ─── Column names ────────────────────────────────────────────────────────────

pub mod terms {
  pub const ID: &str = "presidente";
  pub const NAME: &str = "Nome";
  pub const START: &str = "inicio";
  pub const END: &str = "fim";
  pub const PHOTO: &str = "Foto";
}

pub mod summary {
  pub const PRESIDENT: &str = "Presidente";
}

/// Summary columns for `metric`: `(variation %, period end date)`.
pub fn summary_columns(metric: MetricKind) -> (&'static str, &'static str) {
  match metric {
    MetricKind::Inflation => ("Inflação Acumulada (%)", "Data Final IPCA"),
    MetricKind::Exchange => ("Variação Cambial (%)", "Data Final Dólar"),
    MetricKind::PolicyRate => ("Variação Nominal SELIC (%)", "Data Final SELIC"),
    MetricKind::Unemployment => (
      "Variação Nominal Desemprego (%)",
      "Data Final Desemprego",
    ),
  }
}

/// History columns for `metric`: `(date, value)`.
pub fn history_columns(metric: MetricKind) -> (&'static str, &'static str) {
  match metric {
    MetricKind::Inflation => ("Data IPCA", "IPCA"),
    MetricKind::Exchange => ("Data Câmbio", "Câmbio"),
    MetricKind::PolicyRate => ("Data SELIC", "SELIC"),
    MetricKind::Unemployment => ("Data Desemprego", "Desemprego"),
  }
}

// ─── Terms ───────────────────────────────────────────────────────────────────

fn required<'a>(record: &'a Record, column: &'static str) -> Result<&'a str> {
  record.get(column).ok_or(Error::MissingCell(column))
}

/// Convert one `Terms` row.
pub fn term_from_record(record: &Record) -> Result<Term> {
  let id = required(record, terms::ID)?;
  let start = try_parse_date(required(record, terms::START)?)?;
  let end = try_parse_date(required(record, terms::END)?)?;
  Term::new(
    id.trim(),
    record.get(terms::NAME).unwrap_or(id).trim(),
    start,
    end,
    record.get(terms::PHOTO).unwrap_or_default(),
  )
}

/// Convert every `Terms` row, skipping (and logging) invalid ones.
pub fn terms_from_records(records: &[Record]) -> Vec<Term> {
  records
    .iter()
    .enumerate()
    .filter_map(|(idx, record)| match term_from_record(record) {
      Ok(term) => Some(term),
      Err(e) => {
        warn!(row = idx + 2, error = %e, "skipping invalid term row");
        None
      }
    })
    .collect()
}

// ─── Summary ─────────────────────────────────────────────────────────────────

/// One metric's pair of summary cells.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricSummary {
  pub variation_percent: Option<f64>,
  pub period_end:        Option<NaiveDateTime>,
}

/// A typed `Summary` row.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
  pub president_id: String,
  pub inflation:    MetricSummary,
  pub exchange:     MetricSummary,
  pub policy_rate:  MetricSummary,
  pub unemployment: MetricSummary,
}

impl SummaryRow {
  pub fn metric(&self, metric: MetricKind) -> &MetricSummary {
    match metric {
      MetricKind::Inflation => &self.inflation,
      MetricKind::Exchange => &self.exchange,
      MetricKind::PolicyRate => &self.policy_rate,
      MetricKind::Unemployment => &self.unemployment,
    }
  }
}

fn metric_summary(record: &Record, metric: MetricKind) -> MetricSummary {
  let (variation_col, end_col) = summary_columns(metric);
  MetricSummary {
    variation_percent: parse_number(record.get(variation_col)),
    period_end:        parse_date(record.get(end_col)),
  }
}

/// Convert one `Summary` row. Only the president id is required; every
/// other cell degrades to `None`.
pub fn summary_from_record(record: &Record) -> Result<SummaryRow> {
  let president_id = required(record, summary::PRESIDENT)?.trim().to_owned();
  Ok(SummaryRow {
    president_id,
    inflation: metric_summary(record, MetricKind::Inflation),
    exchange: metric_summary(record, MetricKind::Exchange),
    policy_rate: metric_summary(record, MetricKind::PolicyRate),
    unemployment: metric_summary(record, MetricKind::Unemployment),
  })
}

/// Convert every `Summary` row, skipping (and logging) rows without an id.
pub fn summary_from_records(records: &[Record]) -> Vec<SummaryRow> {
  records
    .iter()
    .enumerate()
    .filter_map(|(idx, record)| match summary_from_record(record) {
      Ok(row) => Some(row),
      Err(e) => {
        warn!(row = idx + 2, error = %e, "skipping invalid summary row");
        None
      }
    })
    .collect()
}

// ─── History ─────────────────────────────────────────────────────────────────

/// Split the wide `History` table into one series per metric.
///
/// A row contributes to a metric only when that metric's date cell parses;
/// the metrics' columns have independent lengths in the sheet.
pub fn history_from_records(records: &[Record]) -> HistorySet {
  let mut set = HistorySet::default();
  for record in records {
    for metric in MetricKind::ALL {
      let (date_col, value_col) = history_columns(metric);
      if let Some(date) = parse_date(record.get(date_col)) {
        set.get_mut(metric).push(HistoryRow {
          date,
          value: parse_number(record.get(value_col)),
        });
      }
    }
  }
  set
}
