//! Read-through cache of the reconciled [`Dataset`].
//!
//! Every request asks the cache for a [`Snapshot`]. A fresh snapshot is
//! served from memory; an expired or missing one is rebuilt by fetching all
//! three tables. A failed fetch is returned to the caller and leaves the
//! previous entry untouched.

use std::{
  sync::Arc,
  time::{Duration, Instant},
};

use mandato_core::{Dataset, fetch_dataset, source::RowSource};
use tokio::sync::Mutex;
use tracing::debug;

use crate::{error::ApiError, etag::compute_etag};

/// An immutable, shareable view of one fetch cycle.
#[derive(Debug, Clone)]
pub struct Snapshot {
  pub dataset: Arc<Dataset>,
  pub etag:    Arc<str>,
}

struct Entry {
  snapshot:   Snapshot,
  fetched_at: Instant,
}

/// A [`RowSource`] fronted by a TTL cache.
///
/// A TTL of zero disables caching: every call fetches.
pub struct DatasetCache<S> {
  source: S,
  ttl:    Duration,
  entry:  Mutex<Option<Entry>>,
}

impl<S: RowSource> DatasetCache<S> {
  pub fn new(source: S, ttl: Duration) -> Self {
    Self {
      source,
      ttl,
      entry: Mutex::new(None),
    }
  }

  pub fn source(&self) -> &S { &self.source }

  pub fn ttl(&self) -> Duration { self.ttl }

  /// Return the cached snapshot, refreshing it first if it has expired.
  ///
  /// The lock is held across the refresh so concurrent callers wait for a
  /// single fetch instead of each issuing their own.
  pub async fn snapshot(&self) -> Result<Snapshot, ApiError> {
    let mut entry = self.entry.lock().await;

    if let Some(cached) = entry.as_ref().filter(|e| e.fetched_at.elapsed() < self.ttl) {
      return Ok(cached.snapshot.clone());
    }

    let snapshot = self.load().await?;
    if !self.ttl.is_zero() {
      *entry = Some(Entry {
        snapshot:   snapshot.clone(),
        fetched_at: Instant::now(),
      });
    }
    Ok(snapshot)
  }

  /// Drop the cached entry so the next call refetches.
  pub async fn invalidate(&self) { *self.entry.lock().await = None; }

  async fn load(&self) -> Result<Snapshot, ApiError> {
    let dataset = fetch_dataset(&self.source)
      .await
      .map_err(ApiError::Unavailable)?;
    let etag = compute_etag(&dataset).map_err(|e| ApiError::Internal(e.to_string()))?;
    debug!(etag = %etag, ttl_secs = self.ttl.as_secs(), "refreshed dataset cache");
    Ok(Snapshot {
      dataset: Arc::new(dataset),
      etag:    etag.into(),
    })
  }
}
