//! Presidential terms and dated observations.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One presidential mandate. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
  /// Stable identifier, unique across terms; joins against the summary table.
  pub id:        String,
  pub name:      String,
  pub start:     NaiveDateTime,
  pub end:       NaiveDateTime,
  /// Opaque image reference; never interpreted here.
  pub photo_url: String,
}

impl Term {
  /// Build a term, rejecting `start >= end`.
  pub fn new(
    id: impl Into<String>,
    name: impl Into<String>,
    start: NaiveDateTime,
    end: NaiveDateTime,
    photo_url: impl Into<String>,
  ) -> Result<Self> {
    let id = id.into();
    if start >= end {
      return Err(Error::InvertedTerm(id));
    }
    Ok(Self {
      id,
      name: name.into(),
      start,
      end,
      photo_url: photo_url.into(),
    })
  }

  /// Whether `date` falls within `[start, end]`.
  pub fn contains(&self, date: NaiveDateTime) -> bool {
    self.start <= date && date <= self.end
  }
}

/// Sort terms for display: most recent start first.
pub fn sort_for_display(terms: &mut [Term]) {
  terms.sort_by(|a, b| b.start.cmp(&a.start));
}

/// A single dated reading exposed to consumers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
  pub date:  NaiveDateTime,
  pub value: f64,
}

#[cfg(test)]
mod tests {
  use super::*;

  use chrono::NaiveDate;

  fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
  }

  #[test]
  fn inverted_term_is_rejected() {
    let r = Term::new("x", "X", ymd(2011, 1, 1), ymd(2003, 1, 1), "");
    assert!(matches!(r, Err(Error::InvertedTerm(id)) if id == "x"));

    let r = Term::new("y", "Y", ymd(2011, 1, 1), ymd(2011, 1, 1), "");
    assert!(r.is_err());
  }

  #[test]
  fn contains_is_inclusive() {
    let t = Term::new("a", "A", ymd(2003, 1, 1), ymd(2011, 1, 1), "").unwrap();
    assert!(t.contains(ymd(2003, 1, 1)));
    assert!(t.contains(ymd(2011, 1, 1)));
    assert!(!t.contains(ymd(2002, 12, 31)));
    assert!(!t.contains(ymd(2011, 1, 2)));
    let late = NaiveDate::from_ymd_opt(2011, 1, 1).unwrap().and_hms_opt(0, 0, 1).unwrap();
    assert!(!t.contains(late));
  }

  #[test]
  fn display_order_is_start_descending() {
    let mut terms = vec![
      Term::new("fhc", "FHC", ymd(1995, 1, 1), ymd(2003, 1, 1), "").unwrap(),
      Term::new("dilma", "Dilma", ymd(2011, 1, 1), ymd(2016, 8, 31), "").unwrap(),
      Term::new("lula", "Lula", ymd(2003, 1, 1), ymd(2011, 1, 1), "").unwrap(),
    ];
    sort_for_display(&mut terms);
    let ids: Vec<_> = terms.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, ["dilma", "lula", "fhc"]);
  }
}
