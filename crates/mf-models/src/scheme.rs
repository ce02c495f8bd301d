//! Scheme catalog and per-scheme history models
//!
//! The upstream serves scheme codes as JSON numbers in some payloads and as
//! strings in others; both are accepted and carried as opaque strings.

use crate::nav::{NavPoint, NavRecordRaw};
use mf_core::Result;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

/// One entry of the full upstream catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeRef {
  /// Opaque scheme identifier
  #[serde(rename = "schemeCode", deserialize_with = "scheme_code_from_any")]
  pub scheme_code: String,

  /// Scheme display name
  #[serde(rename = "schemeName")]
  pub scheme_name: String,
}

/// Metadata block of a per-scheme history response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeMeta {
  /// Asset management company name
  pub fund_house: String,

  /// Scheme type (e.g. "Open Ended Schemes")
  pub scheme_type: String,

  /// Upstream category label
  pub scheme_category: String,

  #[serde(deserialize_with = "scheme_code_from_any")]
  pub scheme_code: String,

  pub scheme_name: String,
}

/// Raw per-scheme history response: `data` arrives newest-first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeHistoryResponse {
  pub meta: SchemeMeta,
  pub data: Vec<NavRecordRaw>,
}

/// A normalized scheme history: ISO dates, decimal NAVs, ascending order,
/// at most one observation per calendar date
#[derive(Debug, Clone, PartialEq)]
pub struct SchemeHistory {
  pub meta: SchemeMeta,
  pub nav_history: Vec<NavPoint>,
}

impl SchemeHistoryResponse {
  /// Normalize the upstream payload for downstream consumers
  ///
  /// Reverses the newest-first ordering, parses dates and NAVs, and collapses
  /// duplicate dates keeping the entry the upstream listed first (its most
  /// recent revision of that date).
  pub fn normalize(self) -> Result<SchemeHistory> {
    let mut by_date = std::collections::BTreeMap::new();
    let mut dropped = 0usize;

    for raw in &self.data {
      match raw.normalize()? {
        // First insertion wins within a date.
        Some(point) => {
          by_date.entry(point.date).or_insert(point.nav);
        }
        None => dropped += 1,
      }
    }

    if dropped > 0 {
      debug!(scheme_code = %self.meta.scheme_code, dropped, "dropped non-positive NAV records");
    }

    let nav_history = by_date.into_iter().map(|(date, nav)| NavPoint { date, nav }).collect();
    Ok(SchemeHistory { meta: self.meta, nav_history })
  }
}

/// Accept a scheme code as either a JSON number or string
fn scheme_code_from_any<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum NumberOrString {
    Number(u64),
    String(String),
  }

  match NumberOrString::deserialize(deserializer)? {
    NumberOrString::Number(n) => Ok(n.to_string()),
    NumberOrString::String(s) => Ok(s),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use bigdecimal::BigDecimal;
  use chrono::NaiveDate;
  use std::str::FromStr;

  #[test]
  fn test_catalog_entry_numeric_code() {
    let json = r#"{"schemeCode": 119551, "schemeName": "Axis Midcap Fund - Direct Plan - Growth"}"#;
    let entry: SchemeRef = serde_json::from_str(json).unwrap();
    assert_eq!(entry.scheme_code, "119551");
  }

  #[test]
  fn test_catalog_entry_string_code() {
    let json = r#"{"schemeCode": "119551", "schemeName": "Axis Midcap Fund - Direct Plan - Growth"}"#;
    let entry: SchemeRef = serde_json::from_str(json).unwrap();
    assert_eq!(entry.scheme_code, "119551");
  }

  fn history_fixture() -> SchemeHistoryResponse {
    serde_json::from_str(
      r#"{
        "meta": {
          "fund_house": "Axis Mutual Fund",
          "scheme_type": "Open Ended Schemes",
          "scheme_category": "Equity Scheme - Mid Cap Fund",
          "scheme_code": 119551,
          "scheme_name": "Axis Midcap Fund - Direct Plan - Growth"
        },
        "data": [
          {"date": "05-01-2024", "nav": "104.9000"},
          {"date": "04-01-2024", "nav": "103.2500"},
          {"date": "02-01-2024", "nav": "101.0000"}
        ]
      }"#,
    )
    .unwrap()
  }

  #[test]
  fn test_normalize_reverses_to_ascending() {
    let history = history_fixture().normalize().unwrap();
    let dates: Vec<NaiveDate> = history.nav_history.iter().map(|p| p.date).collect();
    assert_eq!(
      dates,
      vec![
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        NaiveDate::from_ymd_opt(2024, 1, 4).unwrap(),
        NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
      ]
    );
    assert_eq!(history.nav_history[2].nav, BigDecimal::from_str("104.9000").unwrap());
  }

  #[test]
  fn test_normalize_round_trip_matches_reparsed_input() {
    // The ascending view must equal the upstream array re-parsed and reversed.
    let raw = history_fixture();
    let mut expected: Vec<(NaiveDate, BigDecimal)> = raw
      .data
      .iter()
      .map(|r| {
        (
          crate::nav::parse_upstream_date(&r.date).unwrap(),
          BigDecimal::from_str(&r.nav).unwrap(),
        )
      })
      .collect();
    expected.reverse();

    let normalized = raw.normalize().unwrap();
    let actual: Vec<(NaiveDate, BigDecimal)> =
      normalized.nav_history.iter().map(|p| (p.date, p.nav.clone())).collect();
    assert_eq!(actual, expected);
  }

  #[test]
  fn test_normalize_dedups_duplicate_dates() {
    let mut raw = history_fixture();
    raw.data.insert(0, NavRecordRaw { date: "05-01-2024".to_string(), nav: "105.1111".to_string() });
    let history = raw.normalize().unwrap();
    assert_eq!(history.nav_history.len(), 3);
    // The entry listed first by the upstream wins.
    assert_eq!(
      history.nav_history.last().unwrap().nav,
      BigDecimal::from_str("105.1111").unwrap()
    );
  }

  #[test]
  fn test_normalize_skips_zero_nav_rows() {
    let mut raw = history_fixture();
    raw.data.push(NavRecordRaw { date: "01-01-2024".to_string(), nav: "0.00000".to_string() });
    let history = raw.normalize().unwrap();
    assert_eq!(history.nav_history.len(), 3);
  }
}
