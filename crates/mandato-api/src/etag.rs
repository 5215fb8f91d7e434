//! ETag computation for the dashboard payload.
//!
//! The ETag is a SHA-256 hash over the serialized dashboard JSON, so it
//! changes exactly when the rendered response would.

use mandato_core::Dataset;
use sha2::{Digest, Sha256};

/// Compute a quoted strong ETag for `dataset`'s dashboard.
pub fn compute_etag(dataset: &Dataset) -> Result<String, serde_json::Error> {
  let body = serde_json::to_vec(&dataset.dashboard())?;
  Ok(etag_for_bytes(&body))
}

pub fn etag_for_bytes(body: &[u8]) -> String {
  let hash = Sha256::digest(body);
  format!("\"{}\"", hex::encode(hash))
}

/// Whether an `If-None-Match` header value matches `etag`.
///
/// Handles comma-separated lists, weak validators and `*`.
pub fn if_none_match(header: &str, etag: &str) -> bool {
  header.split(',').map(str::trim).any(|candidate| {
    candidate == "*" || candidate.trim_start_matches("W/") == etag
  })
}

#[cfg(test)]
mod tests {
  use mandato_core::source::Record;

  use super::*;

  fn rec(pairs: &[(&str, &str)]) -> Record { pairs.iter().copied().collect() }

  fn dataset(variation: &str) -> Dataset {
    Dataset::from_records(
      &[rec(&[("presidente", "a"), ("inicio", "2003-01-01"), ("fim", "2007-01-01")])],
      &[rec(&[("Presidente", "a"), ("Inflação Acumulada (%)", variation)])],
      &[],
    )
  }

  #[test]
  fn etag_is_quoted_hex_sha256() {
    let etag = compute_etag(&dataset("1")).unwrap();
    assert!(etag.starts_with('"') && etag.ends_with('"'));
    assert_eq!(etag.len(), 64 + 2);
  }

  #[test]
  fn same_data_same_etag() {
    assert_eq!(
      compute_etag(&dataset("1")).unwrap(),
      compute_etag(&dataset("1")).unwrap()
    );
  }

  #[test]
  fn changed_variation_changes_etag() {
    assert_ne!(
      compute_etag(&dataset("1")).unwrap(),
      compute_etag(&dataset("2")).unwrap()
    );
  }

  #[test]
  fn if_none_match_variants() {
    let etag = "\"abc\"";
    assert!(if_none_match("\"abc\"", etag));
    assert!(if_none_match("\"x\", W/\"abc\"", etag));
    assert!(if_none_match("*", etag));
    assert!(!if_none_match("\"abd\"", etag));
  }
}
