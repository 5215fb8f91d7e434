//! The term reconciler: joins summary rows to terms and resolves each
//! metric's endpoints and history against the global series.

use std::collections::HashSet;

use tracing::warn;

use crate::{
  indicator::{Indicator, MetricIndicator},
  metric::MetricKind,
  schema::{MetricSummary, SummaryRow},
  series::{HistorySeries, HistorySet, nearest_value, range_values},
  term::Term,
};

/// Build one [`Indicator`] per summary row whose president id matches a term.
///
/// Rows referencing an unknown id are dropped; that is filtering, not an
/// error. When several rows share an id the first one wins and the rest are
/// logged and ignored. Output follows summary order; display ordering is the
/// caller's.
pub fn reconcile(
  terms: &[Term],
  summary: &[SummaryRow],
  history: &HistorySet,
) -> Vec<Indicator> {
  let mut seen = HashSet::new();
  summary
    .iter()
    .filter(|row| {
      let first = seen.insert(row.president_id.as_str());
      if !first {
        warn!(president_id = %row.president_id, "ignoring duplicate summary row");
      }
      first
    })
    .filter_map(|row| {
      let term = terms.iter().find(|t| t.id == row.president_id)?;
      Some(reconcile_term(term, row, history))
    })
    .collect()
}

/// Reconcile a single summary row against its term.
pub fn reconcile_term(term: &Term, row: &SummaryRow, history: &HistorySet) -> Indicator {
  let tracked = |metric: MetricKind| {
    let summary = row.metric(metric);
    let mut indicator = resolve_metric(term, summary, history.get(metric), metric);
    // Required metrics fall back to a zero variation when the cell is blank.
    indicator.variation_percent = Some(summary.variation_percent.unwrap_or(0.0));
    indicator
  };

  // Unemployment is tracked for a term only when its window end is known.
  let unemployment = row.unemployment.period_end.map(|_| {
    resolve_metric(
      term,
      &row.unemployment,
      history.get(MetricKind::Unemployment),
      MetricKind::Unemployment,
    )
  });

  Indicator {
    president_id: row.president_id.clone(),
    inflation: tracked(MetricKind::Inflation),
    exchange: tracked(MetricKind::Exchange),
    policy_rate: tracked(MetricKind::PolicyRate),
    unemployment,
  }
}

fn resolve_metric(
  term: &Term,
  summary: &MetricSummary,
  series: &HistorySeries,
  metric: MetricKind,
) -> MetricIndicator {
  MetricIndicator {
    variation_percent: summary.variation_percent,
    period_end:        summary.period_end,
    start_value:       nearest_value(series, metric, term.start),
    end_value:         summary
      .period_end
      .and_then(|end| nearest_value(series, metric, end)),
    history:           range_values(series, term.start, summary.period_end),
  }
}
