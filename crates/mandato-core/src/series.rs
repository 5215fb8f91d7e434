//! Per-metric history series, the nearest-date resolver, and the range
//! extractor.
//!
//! A [`HistorySeries`] keeps rows in source order. The resolver depends on
//! that order for its first-seen tie-break, so nothing here sorts the series
//! itself; only the extracted sub-series handed to consumers is sorted.

use chrono::{Datelike, NaiveDateTime};

use crate::{metric::MetricKind, term::SeriesPoint};

/// First month with a meaningful exchange-rate reading (Plano Real).
pub const EXCHANGE_CUTOFF: (i32, u32) = (1994, 7);

// ─── Series ──────────────────────────────────────────────────────────────────

/// One row of a metric's history. The value may be absent when the sheet
/// has a date without a reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryRow {
  pub date:  NaiveDateTime,
  pub value: Option<f64>,
}

/// A date-keyed series for one metric, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistorySeries {
  rows: Vec<HistoryRow>,
}

impl HistorySeries {
  pub fn new(rows: Vec<HistoryRow>) -> Self { Self { rows } }

  pub fn rows(&self) -> &[HistoryRow] { &self.rows }

  pub fn len(&self) -> usize { self.rows.len() }

  pub fn is_empty(&self) -> bool { self.rows.is_empty() }

  pub fn push(&mut self, row: HistoryRow) { self.rows.push(row); }
}

impl FromIterator<HistoryRow> for HistorySeries {
  fn from_iter<I: IntoIterator<Item = HistoryRow>>(iter: I) -> Self {
    Self::new(iter.into_iter().collect())
  }
}

/// The four process-wide history series, one per metric.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistorySet {
  pub inflation:    HistorySeries,
  pub exchange:     HistorySeries,
  pub policy_rate:  HistorySeries,
  pub unemployment: HistorySeries,
}

impl HistorySet {
  pub fn get(&self, metric: MetricKind) -> &HistorySeries {
    match metric {
      MetricKind::Inflation => &self.inflation,
      MetricKind::Exchange => &self.exchange,
      MetricKind::PolicyRate => &self.policy_rate,
      MetricKind::Unemployment => &self.unemployment,
    }
  }

  pub fn get_mut(&mut self, metric: MetricKind) -> &mut HistorySeries {
    match metric {
      MetricKind::Inflation => &mut self.inflation,
      MetricKind::Exchange => &mut self.exchange,
      MetricKind::PolicyRate => &mut self.policy_rate,
      MetricKind::Unemployment => &mut self.unemployment,
    }
  }
}

// ─── Nearest-date resolver ───────────────────────────────────────────────────

fn before_exchange_cutoff(date: NaiveDateTime) -> bool {
  (date.year(), date.month()) < EXCHANGE_CUTOFF
}

/// Midnight on the first day of the month.
fn month_start(at: NaiveDateTime) -> NaiveDateTime {
  at.date()
    .with_day(1)
    .and_then(|d| d.and_hms_opt(0, 0, 0))
    .unwrap_or(at)
}

/// Align a target date to the series' reporting grid.
pub fn align_target(metric: MetricKind, target: NaiveDateTime) -> NaiveDateTime {
  if metric.is_monthly() { month_start(target) } else { target }
}

/// Value of the row whose date is closest to `target`.
///
/// - Exchange-rate targets before July 1994 resolve to `None`.
/// - Monthly metrics compare against midnight on the first day of the
///   target's month.
/// - Distances are measured at full date-time precision.
/// - Equidistant rows resolve to the one seen first in source order.
/// - An empty series resolves to `None`.
pub fn nearest_value(
  series: &HistorySeries,
  metric: MetricKind,
  target: NaiveDateTime,
) -> Option<f64> {
  if metric == MetricKind::Exchange && before_exchange_cutoff(target) {
    return None;
  }
  let target = align_target(metric, target);

  series
    .rows()
    .iter()
    .map(|row| (row, (row.date - target).num_milliseconds().abs()))
    .reduce(|best, candidate| if candidate.1 < best.1 { candidate } else { best })
    .and_then(|(row, _)| row.value)
}

// ─── Range extractor ─────────────────────────────────────────────────────────

/// Readings within `[start, end]` (inclusive on both ends), date-ascending.
/// Bounds compare with the time of day, so a reading later on the end date
/// falls outside.
///
/// An absent `end` yields an empty sequence. Rows without a value are not
/// reported; they are never zero-filled.
pub fn range_values(
  series: &HistorySeries,
  start: NaiveDateTime,
  end: Option<NaiveDateTime>,
) -> Vec<SeriesPoint> {
  let Some(end) = end else {
    return Vec::new();
  };

  let mut points: Vec<SeriesPoint> = series
    .rows()
    .iter()
    .filter(|row| start <= row.date && row.date <= end)
    .filter_map(|row| {
      row.value.map(|value| SeriesPoint {
        date: row.date,
        value,
      })
    })
    .collect();
  points.sort_by_key(|p| p.date);
  points
}
