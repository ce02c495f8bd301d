//! NAV record types and the upstream date/decimal normalization rules

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use mf_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Upstream date format: `DD-MM-YYYY`
pub const UPSTREAM_DATE_FORMAT: &str = "%d-%m-%Y";

/// One NAV entry exactly as the upstream sends it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavRecordRaw {
  /// Date in `DD-MM-YYYY`
  pub date: String,

  /// NAV as a decimal string
  pub nav: String,
}

/// A normalized NAV observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavPoint {
  /// ISO calendar date
  pub date: NaiveDate,

  /// Net asset value per unit
  pub nav: BigDecimal,
}

impl NavRecordRaw {
  /// Parse the upstream record into a normalized point
  ///
  /// Returns `Ok(None)` for non-positive NAVs: the upstream emits `0.00000`
  /// placeholders on non-traded dates and those carry no price information.
  pub fn normalize(&self) -> Result<Option<NavPoint>> {
    let date = parse_upstream_date(&self.date)?;
    let nav = BigDecimal::from_str(self.nav.trim())
      .map_err(|e| Error::Parse(format!("invalid NAV '{}': {}", self.nav, e)))?;

    if nav <= BigDecimal::from(0) {
      return Ok(None);
    }

    Ok(Some(NavPoint { date, nav }))
  }
}

/// Convert an upstream `DD-MM-YYYY` date to a calendar date
pub fn parse_upstream_date(raw: &str) -> Result<NaiveDate> {
  Ok(NaiveDate::parse_from_str(raw.trim(), UPSTREAM_DATE_FORMAT)?)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_upstream_date() {
    let date = parse_upstream_date("27-06-2025").unwrap();
    assert_eq!(date, NaiveDate::from_ymd_opt(2025, 6, 27).unwrap());
    assert_eq!(date.to_string(), "2025-06-27");
  }

  #[test]
  fn test_parse_upstream_date_rejects_iso() {
    assert!(parse_upstream_date("2025-06-27").is_err());
  }

  #[test]
  fn test_normalize_record() {
    let raw = NavRecordRaw { date: "02-01-2024".to_string(), nav: "104.3151".to_string() };
    let point = raw.normalize().unwrap().unwrap();
    assert_eq!(point.date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    assert_eq!(point.nav, BigDecimal::from_str("104.3151").unwrap());
  }

  #[test]
  fn test_normalize_drops_zero_nav() {
    let raw = NavRecordRaw { date: "02-01-2024".to_string(), nav: "0.00000".to_string() };
    assert!(raw.normalize().unwrap().is_none());
  }

  #[test]
  fn test_normalize_rejects_garbage() {
    let raw = NavRecordRaw { date: "02-01-2024".to_string(), nav: "N.A.".to_string() };
    assert!(raw.normalize().is_err());
  }
}
