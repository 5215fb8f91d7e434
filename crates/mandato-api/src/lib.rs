//! JSON REST API for the Mandato dashboard.
//!
//! Exposes an axum [`Router`] backed by any [`RowSource`], fronted by a
//! [`DatasetCache`]. TLS and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", mandato_api::api_router(cache.clone()))
//! ```

pub mod cache;
pub mod compare;
pub mod dashboard;
pub mod error;
pub mod etag;

use std::sync::Arc;

use axum::{Router, routing::get};
use mandato_core::source::RowSource;

pub use cache::{DatasetCache, Snapshot};
pub use error::ApiError;

/// Build a fully-materialised API router for `cache`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(cache: Arc<DatasetCache<S>>) -> Router<()>
where
  S: RowSource + 'static,
{
  Router::new()
    .route("/dashboard", get(dashboard::dashboard::<S>))
    .route("/terms", get(dashboard::terms::<S>))
    .route("/indicators/{id}", get(dashboard::indicator::<S>))
    .route("/compare", get(compare::compare::<S>))
    .route("/radar", get(compare::radar_scores::<S>))
    .route("/timeline", get(compare::timeline::<S>))
    .with_state(cache)
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
  };
  use mandato_core::source::{MemorySource, Record, Table};
  use serde_json::Value;
  use tower::ServiceExt;

  use super::*;

  fn rec(pairs: &[(&str, &str)]) -> Record { pairs.iter().copied().collect() }

  fn source() -> MemorySource {
    MemorySource::new()
      .with_table(
        Table::Terms,
        vec![
          rec(&[("presidente", "fhc"), ("Nome", "FHC"), ("inicio", "1995-01-01"), ("fim", "2003-01-01")]),
          rec(&[("presidente", "lula"), ("Nome", "Lula"), ("inicio", "2003-01-01"), ("fim", "2011-01-01")]),
        ],
      )
      .with_table(
        Table::Summary,
        vec![
          rec(&[
            ("Presidente", "fhc"),
            ("Inflação Acumulada (%)", "100,0"),
            ("Data Final IPCA", "2003-01-01"),
          ]),
          rec(&[
            ("Presidente", "lula"),
            ("Inflação Acumulada (%)", "56,7"),
            ("Data Final IPCA", "2011-01-01"),
            ("Variação Nominal SELIC (%)", "-14,25"),
          ]),
        ],
      )
      .with_table(
        Table::History,
        vec![
          rec(&[("Data IPCA", "1995-01-01"), ("IPCA", "22,4")]),
          rec(&[("Data IPCA", "2003-01-01"), ("IPCA", "10")]),
          rec(&[("Data IPCA", "2011-01-01"), ("IPCA", "15")]),
        ],
      )
  }

  fn router_for(source: MemorySource) -> Router {
    api_router(Arc::new(DatasetCache::new(source, Duration::from_secs(60))))
  }

  async fn get(router: Router, uri: &str, headers: &[(header::HeaderName, &str)]) -> Response {
    let mut builder = Request::builder().uri(uri);
    for (k, v) in headers {
      builder = builder.header(k, *v);
    }
    router
      .oneshot(builder.body(Body::empty()).unwrap())
      .await
      .unwrap()
  }

  async fn json(resp: Response) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  // ── Dashboard ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn dashboard_lists_terms_most_recent_first() {
    let resp = get(router_for(source()), "/dashboard", &[]).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key(header::ETAG));

    let body = json(resp).await;
    assert_eq!(body[0]["term"]["id"], "lula");
    assert_eq!(body[1]["term"]["id"], "fhc");
    assert_eq!(body[0]["indicator"]["inflation"]["start_value"], 10.0);
    assert_eq!(body[0]["indicator"]["inflation"]["end_value"], 15.0);
    assert_eq!(body[0]["indicator"]["exchange"]["variation_percent"], 0.0);
  }

  #[tokio::test]
  async fn dashboard_honours_if_none_match() {
    let router = router_for(source());
    let first = get(router.clone(), "/dashboard", &[]).await;
    let etag = first.headers()[header::ETAG].to_str().unwrap().to_owned();

    let second = get(router, "/dashboard", &[(header::IF_NONE_MATCH, &etag)]).await;
    assert_eq!(second.status(), StatusCode::NOT_MODIFIED);
    assert_eq!(second.headers()[header::ETAG], etag.as_str());
  }

  #[tokio::test]
  async fn unreadable_source_is_502_with_generic_body() {
    let broken = MemorySource::new().with_table(Table::Terms, vec![]);
    let resp = get(router_for(broken), "/dashboard", &[]).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body = json(resp).await;
    assert_eq!(body["error"], error::UNAVAILABLE_MESSAGE);
  }

  // ── Terms / indicators ──────────────────────────────────────────────────────

  #[tokio::test]
  async fn terms_filter_by_date() {
    let resp = get(router_for(source()), "/terms?at=2003-01-01", &[]).await;
    let body = json(resp).await;
    let ids: Vec<_> = body
      .as_array()
      .unwrap()
      .iter()
      .map(|t| t["id"].as_str().unwrap().to_owned())
      .collect();
    assert_eq!(ids, ["lula", "fhc"]);

    let body = json(get(router_for(source()), "/terms?at=2005-06-01", &[]).await).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    // Lula's term ends at midnight on 2011-01-01; later that day is outside.
    let body = json(get(router_for(source()), "/terms?at=2011-01-01T09:30:00", &[]).await).await;
    assert!(body.as_array().unwrap().is_empty());

    let resp = get(router_for(source()), "/terms?at=yesterday", &[]).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn indicator_found_and_missing() {
    let router = router_for(source());
    let resp = get(router.clone(), "/indicators/lula", &[]).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json(resp).await;
    assert_eq!(body["president_id"], "lula");
    assert_eq!(body["policy_rate"]["variation_percent"], -14.25);

    let resp = get(router, "/indicators/nobody", &[]).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── Comparisons ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn compare_accepts_sheet_metric_keys() {
    let resp = get(
      router_for(source()),
      "/compare?metric=inflacaoAcumulada&ids=fhc,ghost,lula",
      &[],
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json(resp).await;
    let bars = body.as_array().unwrap();
    assert_eq!(bars.len(), 2);
    assert_eq!(bars[0]["president_id"], "fhc");
    assert_eq!(bars[0]["value"], 100.0);
    assert_eq!(bars[1]["start_year"], 2003);
  }

  #[tokio::test]
  async fn compare_rejects_empty_ids() {
    let resp = get(router_for(source()), "/compare?metric=inflation&ids=,", &[]).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn radar_scores_lower_inflation_higher() {
    let resp = get(router_for(source()), "/radar?ids=fhc,lula", &[]).await;
    let body = json(resp).await;
    let inflation = &body[0];
    assert_eq!(inflation["metric"], "inflation");
    assert_eq!(inflation["lower_is_better"], true);
    assert_eq!(inflation["scores"][0]["score"], 0.0);
    assert_eq!(inflation["scores"][1]["score"], 100.0);
  }

  #[tokio::test]
  async fn timeline_merges_histories_by_date() {
    let resp = get(router_for(source()), "/timeline?metric=inflation&ids=fhc,lula", &[]).await;
    let body = json(resp).await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["date"], "1995-01-01T00:00:00");
    assert_eq!(rows[1]["values"]["fhc"], 10.0);
    assert_eq!(rows[1]["values"]["lula"], 10.0);
    assert_eq!(rows[2]["values"]["lula"], 15.0);
  }
}
