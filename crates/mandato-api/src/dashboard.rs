//! Handlers for the per-term views.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/dashboard` | `ETag`; `If-None-Match` answers `304` |
//! | `GET`  | `/terms` | Optional `?at=<date or date-time>` keeps terms covering that instant |
//! | `GET`  | `/indicators/{id}` | 404 if the term has no indicator |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::{HeaderMap, StatusCode, header},
  response::{IntoResponse, Response},
};
use mandato_core::{
  compare::terms_covering, indicator::Indicator, source::RowSource,
  term::Term, value::try_parse_date,
};
use serde::Deserialize;

use crate::{cache::DatasetCache, error::ApiError, etag::if_none_match};

// ─── Dashboard ────────────────────────────────────────────────────────────────

/// `GET /dashboard`
pub async fn dashboard<S: RowSource>(
  State(cache): State<Arc<DatasetCache<S>>>,
  headers: HeaderMap,
) -> Result<Response, ApiError> {
  let snapshot = cache.snapshot().await?;
  let etag = snapshot.etag.to_string();

  let fresh = headers
    .get(header::IF_NONE_MATCH)
    .and_then(|v| v.to_str().ok())
    .is_some_and(|v| if_none_match(v, &etag));
  if fresh {
    return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response());
  }

  Ok(([(header::ETAG, etag)], Json(snapshot.dataset.dashboard())).into_response())
}

// ─── Terms ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct TermsParams {
  /// Keep only terms whose window contains this instant. Accepts the same
  /// formats as sheet cells; a bare date means midnight.
  pub at: Option<String>,
}

/// `GET /terms[?at=<date>]`
pub async fn terms<S: RowSource>(
  State(cache): State<Arc<DatasetCache<S>>>,
  Query(params): Query<TermsParams>,
) -> Result<Json<Vec<Term>>, ApiError> {
  let at = params
    .at
    .as_deref()
    .map(try_parse_date)
    .transpose()
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;

  let snapshot = cache.snapshot().await?;
  let terms = match at {
    Some(date) => terms_covering(&snapshot.dataset.terms, date)
      .into_iter()
      .cloned()
      .collect(),
    None => snapshot.dataset.terms.clone(),
  };
  Ok(Json(terms))
}

// ─── Indicator ────────────────────────────────────────────────────────────────

/// `GET /indicators/{id}`
pub async fn indicator<S: RowSource>(
  State(cache): State<Arc<DatasetCache<S>>>,
  Path(id): Path<String>,
) -> Result<Json<Indicator>, ApiError> {
  let snapshot = cache.snapshot().await?;
  let indicator = snapshot
    .dataset
    .indicator(&id)
    .cloned()
    .ok_or_else(|| ApiError::NotFound(format!("no indicators for term {id}")))?;
  Ok(Json(indicator))
}
