//! Multi-term comparison views.
//!
//! Every function takes the selected term ids explicitly. Min/max bounds are
//! recomputed over that selection on each call, so picking a different subset
//! changes every term's relative score.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDateTime};
use serde::Serialize;

use crate::{metric::MetricKind, pipeline::Dataset, term::Term};

// ─── Normalization ───────────────────────────────────────────────────────────

/// Linear min-max scaling to `[0, 100]`; a degenerate range maps to `50`.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
  if min == max {
    return 50.0;
  }
  (value - min) / (max - min) * 100.0
}

/// Flip a score so that higher always means better.
pub fn invert_if_lower_is_better(score: f64, metric: MetricKind) -> f64 {
  if metric.lower_is_better() { 100.0 - score } else { score }
}

fn bounds(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
  values.into_iter().fold(None, |acc, v| match acc {
    None => Some((v, v)),
    Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
  })
}

/// Selected ids in order, first occurrence only.
fn dedup(selected: &[String]) -> Vec<&str> {
  let mut seen = Vec::with_capacity(selected.len());
  for id in selected {
    if !seen.contains(&id.as_str()) {
      seen.push(id.as_str());
    }
  }
  seen
}

// ─── Bars ────────────────────────────────────────────────────────────────────

/// One bar in a single-metric comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonBar {
  pub president_id: String,
  pub name:         String,
  pub start_year:   i32,
  pub end_year:     i32,
  /// Summary variation; `None` when the metric is not tracked for the term.
  pub value:        Option<f64>,
  pub start_value:  Option<f64>,
  pub end_value:    Option<f64>,
}

/// Bars for `metric` across the selected terms, in selection order.
///
/// Ids without both a term and an indicator are skipped.
pub fn comparison_bars(
  dataset: &Dataset,
  selected: &[String],
  metric: MetricKind,
) -> Vec<ComparisonBar> {
  dedup(selected)
    .into_iter()
    .filter_map(|id| {
      let term = dataset.term(id)?;
      let indicator = dataset.indicator(id)?;
      let m = indicator.metric(metric);
      Some(ComparisonBar {
        president_id: term.id.clone(),
        name:         term.name.clone(),
        start_year:   term.start.year(),
        end_year:     term.end.year(),
        value:        m.and_then(|m| m.variation_percent),
        start_value:  m.and_then(|m| m.start_value),
        end_value:    m.and_then(|m| m.end_value),
      })
    })
    .collect()
}

// ─── Radar ───────────────────────────────────────────────────────────────────

/// A term's position on one radar axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarScore {
  pub president_id: String,
  pub raw:          Option<f64>,
  /// Normalized, direction-adjusted score; higher is better.
  pub score:        Option<f64>,
}

/// One radar axis (metric) across the selected terms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarAxis {
  pub metric:          MetricKind,
  pub lower_is_better: bool,
  pub scores:          Vec<RadarScore>,
}

/// Normalized scores for every metric across the selected terms.
///
/// Terms with no variation for a metric get a `None` score and do not count
/// towards that metric's bounds.
pub fn radar(dataset: &Dataset, selected: &[String]) -> Vec<RadarAxis> {
  let members: Vec<_> = dedup(selected)
    .into_iter()
    .filter_map(|id| Some((dataset.term(id)?, dataset.indicator(id)?)))
    .collect();

  MetricKind::ALL
    .into_iter()
    .map(|metric| {
      let raws: Vec<_> = members
        .iter()
        .map(|(term, ind)| (term.id.clone(), ind.variation(metric)))
        .collect();
      let range = bounds(raws.iter().filter_map(|(_, v)| *v));

      let scores = raws
        .into_iter()
        .map(|(president_id, raw)| {
          let score = raw.zip(range).map(|(v, (lo, hi))| {
            invert_if_lower_is_better(normalize(v, lo, hi), metric)
          });
          RadarScore {
            president_id,
            raw,
            score,
          }
        })
        .collect();

      RadarAxis {
        metric,
        lower_is_better: metric.lower_is_better(),
        scores,
      }
    })
    .collect()
}

// ─── Timelines ───────────────────────────────────────────────────────────────

/// One date on a merged multi-term chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineRow {
  pub date:   NaiveDateTime,
  /// Reading per term id for this date.
  pub values: BTreeMap<String, f64>,
}

/// Merge each selected term's history for `metric` onto one date axis.
pub fn merge_timelines(
  dataset: &Dataset,
  selected: &[String],
  metric: MetricKind,
) -> Vec<TimelineRow> {
  let mut by_date: BTreeMap<NaiveDateTime, BTreeMap<String, f64>> = BTreeMap::new();

  for id in dedup(selected) {
    let Some(history) = dataset
      .indicator(id)
      .and_then(|ind| ind.metric(metric))
      .map(|m| &m.history)
    else {
      continue;
    };
    for point in history {
      by_date
        .entry(point.date)
        .or_default()
        .insert(id.to_owned(), point.value);
    }
  }

  by_date
    .into_iter()
    .map(|(date, values)| TimelineRow { date, values })
    .collect()
}

/// Terms whose `[start, end]` contains `date`.
pub fn terms_covering(terms: &[Term], date: NaiveDateTime) -> Vec<&Term> {
  terms.iter().filter(|t| t.contains(date)).collect()
}
