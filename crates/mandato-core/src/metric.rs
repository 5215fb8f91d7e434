//! The four economic variables tracked per presidential term.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// An economic metric shown on the dashboard.
///
/// The serde names double as query-parameter values (`?metric=policy_rate`);
/// the spreadsheet's own summary keys are accepted as aliases.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MetricKind {
  /// Consumer price inflation (IPCA), monthly.
  #[serde(alias = "inflacaoAcumulada")]
  #[strum(to_string = "inflation", serialize = "inflacaoAcumulada")]
  Inflation,
  /// BRL/USD exchange rate (PTAX), daily.
  #[serde(alias = "variacaoCambial")]
  #[strum(to_string = "exchange", serialize = "variacaoCambial")]
  Exchange,
  /// Policy interest rate (SELIC), monthly.
  #[serde(alias = "variacaoSelic")]
  #[strum(to_string = "policy_rate", serialize = "variacaoSelic")]
  PolicyRate,
  /// Unemployment rate, monthly; not tracked for every term.
  #[serde(alias = "variacaoDesemprego")]
  #[strum(to_string = "unemployment", serialize = "variacaoDesemprego")]
  Unemployment,
}

impl MetricKind {
  pub const ALL: [MetricKind; 4] = [
    MetricKind::Inflation,
    MetricKind::Exchange,
    MetricKind::PolicyRate,
    MetricKind::Unemployment,
  ];

  /// Monthly series are keyed to the first day of each month.
  pub fn is_monthly(self) -> bool { !matches!(self, Self::Exchange) }

  /// Whether a lower variation counts as a better outcome when scoring.
  ///
  /// The policy rate is scored higher-is-better.
  pub fn lower_is_better(self) -> bool {
    matches!(self, Self::Inflation | Self::Exchange | Self::Unemployment)
  }
}
