//! Date-indexed NAV series with gap-tolerant lookup

use chrono::{Days, NaiveDate};
use std::collections::HashMap;

/// How many days forward a lookup probes past a missing date. Covers
/// weekends and public-holiday clusters without synthesizing prices for
/// longer outages.
pub const MAX_GAP_PROBE_DAYS: u64 = 5;

/// An ascending-by-date NAV series for one scheme
#[derive(Debug, Clone)]
pub struct NavSeries {
    points: Vec<(NaiveDate, f64)>,
    by_date: HashMap<NaiveDate, f64>,
}

impl NavSeries {
    /// Build a series from (date, nav) observations
    ///
    /// Input is sorted and deduplicated (last value per date wins), so
    /// callers may pass rows in any order.
    pub fn new(mut observations: Vec<(NaiveDate, f64)>) -> Self {
        observations.sort_by_key(|(date, _)| *date);

        let by_date: HashMap<NaiveDate, f64> = observations.iter().copied().collect();
        let mut points = observations;
        points.dedup_by_key(|(date, _)| *date);
        // Align deduped values with the map (map kept the last duplicate).
        for (date, nav) in points.iter_mut() {
            *nav = by_date[date];
        }

        Self { points, by_date }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[(NaiveDate, f64)] {
        &self.points
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|(date, _)| *date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|(date, _)| *date)
    }

    /// Calendar span of the series in days
    pub fn history_days(&self) -> i64 {
        match (self.first_date(), self.last_date()) {
            (Some(first), Some(last)) => (last - first).num_days(),
            _ => 0,
        }
    }

    /// NAV on `date`, probing forward up to [`MAX_GAP_PROBE_DAYS`]
    ///
    /// Probes `date, date+1, …, date+5` and returns the first observation,
    /// absorbing weekend and holiday gaps.
    pub fn nav_near(&self, date: NaiveDate) -> Option<f64> {
        (0..=MAX_GAP_PROBE_DAYS)
            .filter_map(|offset| date.checked_add_days(Days::new(offset)))
            .find_map(|probe| self.by_date.get(&probe).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_sorts_unordered_input() {
        let series = NavSeries::new(vec![(d(2024, 1, 5), 102.0), (d(2024, 1, 2), 100.0)]);
        assert_eq!(series.first_date(), Some(d(2024, 1, 2)));
        assert_eq!(series.last_date(), Some(d(2024, 1, 5)));
    }

    #[test]
    fn test_history_days() {
        let series = NavSeries::new(vec![(d(2024, 1, 1), 100.0), (d(2024, 12, 31), 110.0)]);
        assert_eq!(series.history_days(), 365);
    }

    #[test]
    fn test_nav_near_exact_hit() {
        let series = NavSeries::new(vec![(d(2024, 1, 2), 100.0)]);
        assert_eq!(series.nav_near(d(2024, 1, 2)), Some(100.0));
    }

    #[test]
    fn test_nav_near_probes_over_weekend() {
        // Friday the 5th, then Monday the 8th. A Saturday lookup lands on Monday.
        let series = NavSeries::new(vec![(d(2024, 1, 5), 100.0), (d(2024, 1, 8), 101.0)]);
        assert_eq!(series.nav_near(d(2024, 1, 6)), Some(101.0));
    }

    #[test]
    fn test_nav_near_refuses_long_gaps() {
        let series = NavSeries::new(vec![(d(2024, 1, 10), 100.0)]);
        assert_eq!(series.nav_near(d(2024, 1, 4)), None);
        assert_eq!(series.nav_near(d(2024, 1, 5)), Some(100.0));
    }

    #[test]
    fn test_duplicate_dates_keep_last_value() {
        let series = NavSeries::new(vec![(d(2024, 1, 2), 100.0), (d(2024, 1, 2), 101.0)]);
        assert_eq!(series.len(), 1);
        assert_eq!(series.nav_near(d(2024, 1, 2)), Some(101.0));
    }
}
