//! Fetch-then-reconcile: the single entry point callers use.
//!
//! Row Source -> typed rows -> reconciler -> [`Dataset`]
//!
//! The pipeline is stateless; every call constructs fresh values from the
//! rows it fetched, so concurrent calls share nothing.

use serde::Serialize;
use tracing::{debug, info};

use crate::{
  Error, Result,
  indicator::Indicator,
  reconcile::reconcile,
  schema::{history_from_records, summary_from_records, terms_from_records},
  source::{Record, RowSource, Table},
  term::{Term, sort_for_display},
};

/// The reconciled dataset for one fetch cycle.
#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
  /// Valid terms, most recent start first.
  pub terms:      Vec<Term>,
  /// One indicator per summary row with a matching term.
  pub indicators: Vec<Indicator>,
}

/// A term paired with its indicator, as rendered on the dashboard.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DashboardEntry<'a> {
  pub term:      &'a Term,
  pub indicator: &'a Indicator,
}

impl Dataset {
  /// Type and reconcile the three raw tables.
  pub fn from_records(terms: &[Record], summary: &[Record], history: &[Record]) -> Self {
    let mut terms = terms_from_records(terms);
    sort_for_display(&mut terms);
    let summary = summary_from_records(summary);
    let history = history_from_records(history);

    debug!(
      terms = terms.len(),
      summary_rows = summary.len(),
      inflation_rows = history.inflation.len(),
      exchange_rows = history.exchange.len(),
      policy_rate_rows = history.policy_rate.len(),
      unemployment_rows = history.unemployment.len(),
      "typed source tables"
    );

    let indicators = reconcile(&terms, &summary, &history);
    let dropped = summary.len() - indicators.len();
    if dropped > 0 {
      debug!(dropped, "summary rows without a matching term or duplicated");
    }

    Self { terms, indicators }
  }

  pub fn term(&self, id: &str) -> Option<&Term> { self.terms.iter().find(|t| t.id == id) }

  pub fn indicator(&self, id: &str) -> Option<&Indicator> {
    self.indicators.iter().find(|i| i.president_id == id)
  }

  /// Terms in display order with their indicator; terms without one are
  /// omitted.
  pub fn dashboard(&self) -> Vec<DashboardEntry<'_>> {
    self
      .terms
      .iter()
      .filter_map(|term| {
        self
          .indicator(&term.id)
          .map(|indicator| DashboardEntry { term, indicator })
      })
      .collect()
  }
}

/// Fetch the three tables concurrently and reconcile them.
///
/// Any fetch failure fails the whole call; no partial dataset is returned.
pub async fn fetch_dataset<S: RowSource>(source: &S) -> Result<Dataset> {
  let (terms, summary, history) = tokio::try_join!(
    source.fetch_table(Table::Terms),
    source.fetch_table(Table::Summary),
    source.fetch_table(Table::History),
  )
  .map_err(|e| Error::Source(Box::new(e)))?;

  let dataset = Dataset::from_records(&terms, &summary, &history);
  info!(
    terms = dataset.terms.len(),
    indicators = dataset.indicators.len(),
    "reconciled dataset"
  );
  Ok(dataset)
}
