/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 *
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

//! Catalog discovery: filter the full upstream catalog down to the
//! configured AMC x category universe
//!
//! Matching is case-insensitive substring inspection of the scheme name. A
//! scheme qualifies when it names a recognized AMC, carries a recognized
//! category token, and contains every mandatory token.

use mf_models::SchemeRef;
use std::collections::HashSet;

/// AMCs tracked by default
const DEFAULT_AMCS: [&str; 10] = [
  "HDFC",
  "ICICI",
  "SBI",
  "Nippon",
  "Axis",
  "Kotak",
  "UTI",
  "DSP",
  "Tata",
  "Motilal Oswal",
];

/// Category tokens tracked by default; spelled both ways because fund
/// houses are not consistent about the space
const DEFAULT_CATEGORY_TOKENS: [&str; 4] = ["mid cap", "midcap", "small cap", "smallcap"];

/// Every scheme must carry these tokens
const MANDATORY_TOKENS: [&str; 2] = ["direct", "growth"];

const SMALL_CAP_LABEL: &str = "Small Cap Direct Growth";
const MID_CAP_LABEL: &str = "Mid Cap Direct Growth";

/// A scheme selected by discovery, labeled and ready for ingestion
#[derive(Debug, Clone, PartialEq)]
pub struct SchemeDescriptor {
  pub scheme_code: String,
  pub scheme_name: String,
  pub amc: String,
  pub category: String,
}

/// The configured scheme universe
#[derive(Debug, Clone)]
pub struct SchemeFilter {
  amcs: Vec<String>,
  category_tokens: Vec<String>,
  mandatory_tokens: Vec<String>,
}

impl Default for SchemeFilter {
  fn default() -> Self {
    Self::new(
      DEFAULT_AMCS.iter().map(|s| s.to_string()).collect(),
      DEFAULT_CATEGORY_TOKENS.iter().map(|s| s.to_string()).collect(),
    )
  }
}

impl SchemeFilter {
  pub fn new(amcs: Vec<String>, category_tokens: Vec<String>) -> Self {
    Self {
      amcs,
      category_tokens,
      mandatory_tokens: MANDATORY_TOKENS.iter().map(|s| s.to_string()).collect(),
    }
  }

  /// Filter the catalog, deduplicating by scheme code
  pub fn filter(&self, catalog: &[SchemeRef]) -> Vec<SchemeDescriptor> {
    let mut seen = HashSet::new();
    let mut selected = Vec::new();

    for entry in catalog {
      let Some(descriptor) = self.classify(entry) else { continue };
      if seen.insert(descriptor.scheme_code.clone()) {
        selected.push(descriptor);
      }
    }

    selected
  }

  /// Classify a single catalog entry, or None when it falls outside the universe
  pub fn classify(&self, entry: &SchemeRef) -> Option<SchemeDescriptor> {
    let name = entry.scheme_name.to_lowercase();

    let amc = self.amcs.iter().find(|amc| name.contains(&amc.to_lowercase()))?;
    self.category_tokens.iter().find(|token| name.contains(&token.to_lowercase()))?;
    if !self.mandatory_tokens.iter().all(|token| name.contains(&token.to_lowercase())) {
      return None;
    }

    Some(SchemeDescriptor {
      scheme_code: entry.scheme_code.clone(),
      scheme_name: entry.scheme_name.clone(),
      amc: amc.clone(),
      category: categorize(&name).to_string(),
    })
  }
}

/// Label a matched scheme from its name tokens
fn categorize(lower_name: &str) -> &'static str {
  if lower_name.contains("small cap") || lower_name.contains("smallcap") {
    SMALL_CAP_LABEL
  } else {
    MID_CAP_LABEL
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn entry(code: &str, name: &str) -> SchemeRef {
    SchemeRef { scheme_code: code.to_string(), scheme_name: name.to_string() }
  }

  #[test]
  fn test_matches_mid_cap_direct_growth() {
    let filter = SchemeFilter::default();
    let descriptor = filter
      .classify(&entry("119551", "Axis Midcap Fund - Direct Plan - Growth"))
      .unwrap();
    assert_eq!(descriptor.amc, "Axis");
    assert_eq!(descriptor.category, "Mid Cap Direct Growth");
  }

  #[test]
  fn test_matches_small_cap() {
    let filter = SchemeFilter::default();
    let descriptor = filter
      .classify(&entry("125497", "SBI Small Cap Fund - Direct Plan - Growth"))
      .unwrap();
    assert_eq!(descriptor.amc, "SBI");
    assert_eq!(descriptor.category, "Small Cap Direct Growth");
  }

  #[test]
  fn test_rejects_regular_plan() {
    let filter = SchemeFilter::default();
    assert!(filter.classify(&entry("100", "Axis Midcap Fund - Regular Plan - Growth")).is_none());
  }

  #[test]
  fn test_rejects_idcw_option() {
    let filter = SchemeFilter::default();
    assert!(filter.classify(&entry("100", "Axis Midcap Fund - Direct Plan - IDCW")).is_none());
  }

  #[test]
  fn test_rejects_unknown_amc() {
    let filter = SchemeFilter::default();
    assert!(filter
      .classify(&entry("100", "Quant Mid Cap Fund - Direct Plan - Growth"))
      .is_none());
  }

  #[test]
  fn test_rejects_other_categories() {
    let filter = SchemeFilter::default();
    assert!(filter
      .classify(&entry("100", "Axis Large Cap Fund - Direct Plan - Growth"))
      .is_none());
  }

  #[test]
  fn test_matching_is_case_insensitive() {
    let filter = SchemeFilter::default();
    assert!(filter.classify(&entry("100", "AXIS MIDCAP FUND - DIRECT PLAN - GROWTH")).is_some());
  }

  #[test]
  fn test_filter_dedups_by_code() {
    let filter = SchemeFilter::default();
    let catalog = vec![
      entry("119551", "Axis Midcap Fund - Direct Plan - Growth"),
      entry("119551", "Axis Midcap Fund - Direct Plan - Growth"),
      entry("125497", "SBI Small Cap Fund - Direct Plan - Growth"),
      entry("999999", "Some Other Fund - Direct Plan - Growth"),
    ];
    let selected = filter.filter(&catalog);
    assert_eq!(selected.len(), 2);
  }

  #[test]
  fn test_custom_universe() {
    let filter =
      SchemeFilter::new(vec!["Quant".to_string()], vec!["mid cap".to_string()]);
    assert!(filter
      .classify(&entry("100", "Quant Mid Cap Fund - Direct Plan - Growth"))
      .is_some());
    assert!(filter
      .classify(&entry("101", "Axis Midcap Fund - Direct Plan - Growth"))
      .is_none());
  }
}
