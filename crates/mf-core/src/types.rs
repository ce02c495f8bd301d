//! Domain enumerations shared across the mf-* crates
//!
//! These are closed sets: analytics windows, sync phases, and row statuses
//! all round-trip through their string forms for storage and API responses.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed look-back windows for the analytics engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnalyticsWindow {
  OneYear,
  ThreeYear,
  FiveYear,
  TenYear,
}

impl AnalyticsWindow {
  /// All windows, in ascending order
  pub const ALL: [AnalyticsWindow; 4] = [
    AnalyticsWindow::OneYear,
    AnalyticsWindow::ThreeYear,
    AnalyticsWindow::FiveYear,
    AnalyticsWindow::TenYear,
  ];

  /// Integer year count for CAGR exponents
  pub fn years(&self) -> u32 {
    match self {
      AnalyticsWindow::OneYear => 1,
      AnalyticsWindow::ThreeYear => 3,
      AnalyticsWindow::FiveYear => 5,
      AnalyticsWindow::TenYear => 10,
    }
  }

  /// Window length in calendar days (365 x years)
  pub fn days(&self) -> i64 {
    365 * self.years() as i64
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      AnalyticsWindow::OneYear => "1Y",
      AnalyticsWindow::ThreeYear => "3Y",
      AnalyticsWindow::FiveYear => "5Y",
      AnalyticsWindow::TenYear => "10Y",
    }
  }
}

impl fmt::Display for AnalyticsWindow {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for AnalyticsWindow {
  type Err = crate::Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "1Y" => Ok(AnalyticsWindow::OneYear),
      "3Y" => Ok(AnalyticsWindow::ThreeYear),
      "5Y" => Ok(AnalyticsWindow::FiveYear),
      "10Y" => Ok(AnalyticsWindow::TenYear),
      other => Err(crate::Error::Parse(format!("unknown analytics window: {}", other))),
    }
  }
}

/// Which sync a per-scheme progress row belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SyncType {
  Backfill,
  Incremental,
}

impl SyncType {
  pub fn as_str(&self) -> &'static str {
    match self {
      SyncType::Backfill => "backfill",
      SyncType::Incremental => "incremental",
    }
  }
}

impl fmt::Display for SyncType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for SyncType {
  type Err = crate::Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "backfill" => Ok(SyncType::Backfill),
      "incremental" => Ok(SyncType::Incremental),
      other => Err(crate::Error::Parse(format!("unknown sync type: {}", other))),
    }
  }
}

/// Lifecycle of a per-scheme sync-state row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncStatus {
  Pending,
  InProgress,
  Completed,
  Failed,
}

impl SyncStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      SyncStatus::Pending => "pending",
      SyncStatus::InProgress => "in_progress",
      SyncStatus::Completed => "completed",
      SyncStatus::Failed => "failed",
    }
  }
}

impl fmt::Display for SyncStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for SyncStatus {
  type Err = crate::Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "pending" => Ok(SyncStatus::Pending),
      "in_progress" => Ok(SyncStatus::InProgress),
      "completed" => Ok(SyncStatus::Completed),
      "failed" => Ok(SyncStatus::Failed),
      other => Err(crate::Error::Parse(format!("unknown sync status: {}", other))),
    }
  }
}

/// Phase of a pipeline run, recorded in the singleton status row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
  Discovery,
  Backfill,
  Incremental,
  Analytics,
}

impl PipelinePhase {
  pub fn as_str(&self) -> &'static str {
    match self {
      PipelinePhase::Discovery => "discovery",
      PipelinePhase::Backfill => "backfill",
      PipelinePhase::Incremental => "incremental",
      PipelinePhase::Analytics => "analytics",
    }
  }
}

impl fmt::Display for PipelinePhase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Process-wide pipeline state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineState {
  Idle,
  Running,
  Failed,
}

impl PipelineState {
  pub fn as_str(&self) -> &'static str {
    match self {
      PipelineState::Idle => "idle",
      PipelineState::Running => "running",
      PipelineState::Failed => "failed",
    }
  }
}

impl fmt::Display for PipelineState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for PipelineState {
  type Err = crate::Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "idle" => Ok(PipelineState::Idle),
      "running" => Ok(PipelineState::Running),
      "failed" => Ok(PipelineState::Failed),
      other => Err(crate::Error::Parse(format!("unknown pipeline state: {}", other))),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_window_days() {
    assert_eq!(AnalyticsWindow::OneYear.days(), 365);
    assert_eq!(AnalyticsWindow::ThreeYear.days(), 1095);
    assert_eq!(AnalyticsWindow::FiveYear.days(), 1825);
    assert_eq!(AnalyticsWindow::TenYear.days(), 3650);
  }

  #[test]
  fn test_window_round_trip() {
    for w in AnalyticsWindow::ALL {
      assert_eq!(w.as_str().parse::<AnalyticsWindow>().unwrap(), w);
    }
  }

  #[test]
  fn test_window_rejects_unknown() {
    assert!("2Y".parse::<AnalyticsWindow>().is_err());
    assert!("1y".parse::<AnalyticsWindow>().is_err());
  }

  #[test]
  fn test_sync_status_round_trip() {
    for s in [
      SyncStatus::Pending,
      SyncStatus::InProgress,
      SyncStatus::Completed,
      SyncStatus::Failed,
    ] {
      assert_eq!(s.as_str().parse::<SyncStatus>().unwrap(), s);
    }
  }

  #[test]
  fn test_pipeline_state_round_trip() {
    for s in [PipelineState::Idle, PipelineState::Running, PipelineState::Failed] {
      assert_eq!(s.as_str().parse::<PipelineState>().unwrap(), s);
    }
  }
}
