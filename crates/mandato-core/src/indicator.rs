//! The reconciled per-term indicator record.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{metric::MetricKind, term::SeriesPoint};

/// One metric's view of a term: the precomputed variation from the summary
/// table plus reconciled endpoints and the in-term history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricIndicator {
  /// Percentage change as supplied by the summary table; never recomputed.
  pub variation_percent: Option<f64>,
  /// End of this metric's observation window for the term.
  pub period_end:        Option<NaiveDateTime>,
  pub start_value:       Option<f64>,
  pub end_value:         Option<f64>,
  /// Readings within `[term.start, period_end]`, date-ascending.
  pub history:           Vec<SeriesPoint>,
}

/// Reconciled economic indicators for one term.
///
/// `unemployment` is `None` when the metric was not tracked for the term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicator {
  pub president_id: String,
  pub inflation:    MetricIndicator,
  pub exchange:     MetricIndicator,
  pub policy_rate:  MetricIndicator,
  pub unemployment: Option<MetricIndicator>,
}

impl Indicator {
  pub fn metric(&self, metric: MetricKind) -> Option<&MetricIndicator> {
    match metric {
      MetricKind::Inflation => Some(&self.inflation),
      MetricKind::Exchange => Some(&self.exchange),
      MetricKind::PolicyRate => Some(&self.policy_rate),
      MetricKind::Unemployment => self.unemployment.as_ref(),
    }
  }

  /// The summary variation for `metric`, if tracked.
  pub fn variation(&self, metric: MetricKind) -> Option<f64> {
    self.metric(metric).and_then(|m| m.variation_percent)
  }
}
