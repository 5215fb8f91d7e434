//! Cell-level parsing of locale-formatted spreadsheet text.
//!
//! The spreadsheet uses a comma as decimal separator (`"12,34"`) and mixes
//! ISO and Brazilian day-first date formats. Everything here is pure and
//! synchronous.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::{Error, Result};

// ─── Numbers ─────────────────────────────────────────────────────────────────

/// Parse a comma-decimal number, failing loudly on malformed input.
///
/// Absent or blank input is `Ok(None)`, never zero.
pub fn try_parse_number(raw: Option<&str>) -> Result<Option<f64>> {
  let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
    return Ok(None);
  };
  let normalized = raw.replacen(',', ".", 1);
  match normalized.parse::<f64>() {
    Ok(v) if v.is_finite() => Ok(Some(v)),
    _ => Err(Error::InvalidNumber(raw.to_owned())),
  }
}

/// Parse a comma-decimal number, degrading malformed input to `None`.
pub fn parse_number(raw: Option<&str>) -> Option<f64> {
  try_parse_number(raw).ok().flatten()
}

// ─── Dates ───────────────────────────────────────────────────────────────────

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

const DATETIME_FORMATS: [&str; 3] = [
  "%Y-%m-%dT%H:%M:%S%.f",
  "%Y-%m-%d %H:%M:%S%.f",
  "%d/%m/%Y %H:%M:%S",
];

/// Parse a date or date-time cell at full precision.
///
/// Accepts `YYYY-MM-DD`, `DD/MM/YYYY` (both read as midnight), naive
/// date-times, and RFC 3339 timestamps (converted to UTC).
pub fn try_parse_date(raw: &str) -> Result<NaiveDateTime> {
  let raw = raw.trim();
  for fmt in DATETIME_FORMATS {
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
      return Ok(dt);
    }
  }
  for fmt in DATE_FORMATS {
    if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
      return Ok(d.and_time(NaiveTime::MIN));
    }
  }
  DateTime::parse_from_rfc3339(raw)
    .map(|dt| dt.naive_utc())
    .map_err(|_| Error::InvalidDate(raw.to_owned()))
}

/// Parse an optional date cell, degrading blank or malformed input to `None`.
pub fn parse_date(raw: Option<&str>) -> Option<NaiveDateTime> {
  raw
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .and_then(|s| try_parse_date(s).ok())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
  }

  fn ymd_hms(y: i32, m: u32, d: u32, h: u32, min: u32, sec: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
      .unwrap()
      .and_hms_opt(h, min, sec)
      .unwrap()
  }

  #[test]
  fn comma_decimal_is_parsed() {
    assert_eq!(parse_number(Some("12,34")), Some(12.34));
    assert_eq!(parse_number(Some("-0,5")), Some(-0.5));
    assert_eq!(parse_number(Some(" 7 ")), Some(7.0));
  }

  #[test]
  fn dot_decimal_still_parses() {
    assert_eq!(parse_number(Some("3.75")), Some(3.75));
  }

  #[test]
  fn absent_and_blank_are_none_not_zero() {
    assert_eq!(parse_number(None), None);
    assert_eq!(parse_number(Some("")), None);
    assert_eq!(parse_number(Some("   ")), None);
    assert!(matches!(try_parse_number(Some("")), Ok(None)));
  }

  #[test]
  fn malformed_number_degrades_to_none() {
    assert_eq!(parse_number(Some("n/d")), None);
    assert_eq!(parse_number(Some("1,2,3")), None);
    assert!(matches!(
      try_parse_number(Some("n/d")),
      Err(Error::InvalidNumber(s)) if s == "n/d"
    ));
  }

  #[test]
  fn non_finite_is_rejected() {
    assert_eq!(parse_number(Some("inf")), None);
    assert_eq!(parse_number(Some("NaN")), None);
  }

  #[test]
  fn iso_and_day_first_dates() {
    assert_eq!(try_parse_date("2003-01-01").unwrap(), ymd(2003, 1, 1));
    assert_eq!(try_parse_date("15/03/1990").unwrap(), ymd(1990, 3, 15));
  }

  #[test]
  fn datetime_keeps_time_of_day() {
    assert_eq!(
      try_parse_date("2011-01-01T00:00:00").unwrap(),
      ymd(2011, 1, 1)
    );
    assert_eq!(
      try_parse_date("2010-12-31T18:00:00").unwrap(),
      ymd_hms(2010, 12, 31, 18, 0, 0)
    );
    assert_eq!(
      try_parse_date("2010-12-31 09:30:15").unwrap(),
      ymd_hms(2010, 12, 31, 9, 30, 15)
    );
    assert_eq!(
      try_parse_date("31/12/2010 18:00:00").unwrap(),
      ymd_hms(2010, 12, 31, 18, 0, 0)
    );
  }

  #[test]
  fn rfc3339_is_converted_to_utc() {
    assert_eq!(
      try_parse_date("2011-01-01T00:00:00.000Z").unwrap(),
      ymd(2011, 1, 1)
    );
    assert_eq!(
      try_parse_date("2010-12-31T21:00:00-03:00").unwrap(),
      ymd(2011, 1, 1)
    );
  }

  #[test]
  fn bad_dates() {
    assert!(matches!(try_parse_date("soon"), Err(Error::InvalidDate(_))));
    assert_eq!(parse_date(Some("2003-13-01")), None);
    assert_eq!(parse_date(Some("")), None);
    assert_eq!(parse_date(None), None);
  }
}
