//! Handlers for the multi-term comparison views.
//!
//! `ids` is a comma-separated list of term ids; unknown ids are skipped.
//! `metric` accepts both the short names (`inflation`, `exchange`,
//! `policy_rate`, `unemployment`) and the sheet keys
//! (`inflacaoAcumulada`, ...).

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use mandato_core::{
  MetricKind,
  compare::{
    ComparisonBar, RadarAxis, TimelineRow, comparison_bars, merge_timelines,
    radar,
  },
  source::RowSource,
};
use serde::Deserialize;

use crate::{cache::DatasetCache, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct MetricParams {
  pub metric: MetricKind,
  pub ids:    String,
}

#[derive(Debug, Deserialize)]
pub struct IdsParams {
  pub ids: String,
}

/// Split a comma-separated id list, dropping blanks.
pub fn parse_ids(raw: &str) -> Result<Vec<String>, ApiError> {
  let ids: Vec<String> = raw
    .split(',')
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::to_owned)
    .collect();
  if ids.is_empty() {
    return Err(ApiError::BadRequest("ids must name at least one term".into()));
  }
  Ok(ids)
}

/// `GET /compare?metric=<metric>&ids=<a,b,...>`
pub async fn compare<S: RowSource>(
  State(cache): State<Arc<DatasetCache<S>>>,
  Query(params): Query<MetricParams>,
) -> Result<Json<Vec<ComparisonBar>>, ApiError> {
  let ids = parse_ids(&params.ids)?;
  let snapshot = cache.snapshot().await?;
  Ok(Json(comparison_bars(&snapshot.dataset, &ids, params.metric)))
}

/// `GET /radar?ids=<a,b,...>`
pub async fn radar_scores<S: RowSource>(
  State(cache): State<Arc<DatasetCache<S>>>,
  Query(params): Query<IdsParams>,
) -> Result<Json<Vec<RadarAxis>>, ApiError> {
  let ids = parse_ids(&params.ids)?;
  let snapshot = cache.snapshot().await?;
  Ok(Json(radar(&snapshot.dataset, &ids)))
}

/// `GET /timeline?metric=<metric>&ids=<a,b,...>`
pub async fn timeline<S: RowSource>(
  State(cache): State<Arc<DatasetCache<S>>>,
  Query(params): Query<MetricParams>,
) -> Result<Json<Vec<TimelineRow>>, ApiError> {
  let ids = parse_ids(&params.ids)?;
  let snapshot = cache.snapshot().await?;
  Ok(Json(merge_timelines(&snapshot.dataset, &ids, params.metric)))
}
