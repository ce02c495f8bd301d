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

//! Rolling-window metrics over a NAV series

use crate::series::NavSeries;
use chrono::{Days, NaiveDate};
use mf_core::AnalyticsWindow;

/// Fraction of the window a series must span before metrics are computed
const SUFFICIENCY_RATIO: f64 = 0.9;

/// Distribution of rolling simple returns for one window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnDistribution {
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub p25: f64,
    pub p75: f64,
}

/// Distribution of rolling CAGRs for one window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CagrDistribution {
    pub min: f64,
    pub max: f64,
    pub median: f64,
}

/// Everything the analytics store persists for one `(scheme, window)`
#[derive(Debug, Clone, PartialEq)]
pub struct WindowMetrics {
    pub window: AnalyticsWindow,
    pub rolling_returns: Option<ReturnDistribution>,
    pub cagr: Option<CagrDistribution>,
    pub max_drawdown: f64,
    pub data_start_date: NaiveDate,
    pub data_end_date: NaiveDate,
}

/// Compute all metrics for one window, or `None` when the series is too
/// short for it
///
/// The series must span strictly more than 90% of the window; a span of
/// exactly 0.9 x window days is still insufficient.
pub fn compute_window(series: &NavSeries, window: AnalyticsWindow) -> Option<WindowMetrics> {
    let first = series.first_date()?;
    let last = series.last_date()?;

    if (series.history_days() as f64) <= SUFFICIENCY_RATIO * window.days() as f64 {
        return None;
    }

    let returns = rolling_returns(series, window);
    let cagrs = rolling_cagrs(series, window);

    Some(WindowMetrics {
        window,
        rolling_returns: return_distribution(returns),
        cagr: cagr_distribution(cagrs),
        max_drawdown: max_drawdown(series),
        data_start_date: first,
        data_end_date: last,
    })
}

/// Simple look-back returns sampled at every observation
///
/// For each point, the NAV one window earlier is looked up with the gap
/// probe; points whose look-back date has no observation contribute nothing.
pub fn rolling_returns(series: &NavSeries, window: AnalyticsWindow) -> Vec<f64> {
    sample_window(series, window, |nav, nav_past| (nav - nav_past) / nav_past)
}

/// Annualized look-back growth rates sampled at every observation
pub fn rolling_cagrs(series: &NavSeries, window: AnalyticsWindow) -> Vec<f64> {
    let years = window.years() as f64;
    sample_window(series, window, move |nav, nav_past| (nav / nav_past).powf(1.0 / years) - 1.0)
}

fn sample_window<F>(series: &NavSeries, window: AnalyticsWindow, f: F) -> Vec<f64>
where
    F: Fn(f64, f64) -> f64,
{
    let mut samples = Vec::new();
    for &(date, nav) in series.points() {
        let Some(target) = date.checked_sub_days(Days::new(window.days() as u64)) else {
            continue;
        };
        if let Some(nav_past) = series.nav_near(target) {
            if nav_past > 0.0 {
                samples.push(f(nav, nav_past));
            }
        }
    }
    samples
}

/// Largest peak-to-trough decline over the whole series
///
/// Always ≤ 0; exactly 0 for monotone non-decreasing histories. Scans the
/// full available history, not just the requested window.
pub fn max_drawdown(series: &NavSeries) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst: f64 = 0.0;

    for &(_, nav) in series.points() {
        if nav > peak {
            peak = nav;
        }
        if peak > 0.0 {
            worst = worst.min((nav - peak) / peak);
        }
    }

    worst
}

/// Linear-interpolation percentile over an unsorted sample
///
/// `index = p/100 x (n-1)`; the result interpolates between the two
/// bracketing order statistics. Returns `None` for an empty sample.
pub fn percentile(samples: &[f64], p: f64) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    if samples.len() == 1 {
        return Some(samples[0]);
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let index = p / 100.0 * (sorted.len() - 1) as f64;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;
    let frac = index - lower as f64;

    Some(sorted[lower] * (1.0 - frac) + sorted[upper] * frac)
}

fn return_distribution(samples: Vec<f64>) -> Option<ReturnDistribution> {
    Some(ReturnDistribution {
        min: percentile(&samples, 0.0)?,
        max: percentile(&samples, 100.0)?,
        median: percentile(&samples, 50.0)?,
        p25: percentile(&samples, 25.0)?,
        p75: percentile(&samples, 75.0)?,
    })
}

fn cagr_distribution(samples: Vec<f64>) -> Option<CagrDistribution> {
    Some(CagrDistribution {
        min: percentile(&samples, 0.0)?,
        max: percentile(&samples, 100.0)?,
        median: percentile(&samples, 50.0)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    /// Daily series over `days+1` calendar days with the given NAV function
    fn daily_series(start: NaiveDate, days: u64, nav_at: impl Fn(u64) -> f64) -> NavSeries {
        NavSeries::new(
            (0..=days)
                .map(|i| (start.checked_add_days(Days::new(i)).unwrap(), nav_at(i)))
                .collect(),
        )
    }

    #[test]
    fn test_percentile_interpolates() {
        let samples = vec![10.0, 20.0, 30.0, 40.0];
        assert_eq!(percentile(&samples, 50.0), Some(25.0));
        assert_eq!(percentile(&samples, 0.0), Some(10.0));
        assert_eq!(percentile(&samples, 100.0), Some(40.0));
        assert_eq!(percentile(&samples, 25.0), Some(17.5));
    }

    #[test]
    fn test_percentile_single_sample() {
        assert_eq!(percentile(&[42.0], 75.0), Some(42.0));
    }

    #[test]
    fn test_percentile_empty() {
        assert_eq!(percentile(&[], 50.0), None);
    }

    #[test]
    fn test_percentile_ignores_input_order() {
        let shuffled = vec![40.0, 10.0, 30.0, 20.0];
        assert_eq!(percentile(&shuffled, 50.0), Some(25.0));
    }

    #[test]
    fn test_cagr_doubling_over_five_years() {
        // 100 -> 200 over a five-year window is about 14.87% a year. With
        // exactly two observations one window apart, the sample holds the
        // single look-back from the last point.
        let start = d(2015, 1, 1);
        let end = start.checked_add_days(Days::new(1825)).unwrap();
        let series = NavSeries::new(vec![(start, 100.0), (end, 200.0)]);

        let cagrs = rolling_cagrs(&series, AnalyticsWindow::FiveYear);
        assert_eq!(cagrs.len(), 1);
        assert!((cagrs[0] - 0.1487).abs() < 1e-4);
    }

    #[test]
    fn test_max_drawdown_with_recovery() {
        let navs = [100.0, 110.0, 95.0, 88.0, 105.0];
        let series = NavSeries::new(
            navs.iter()
                .enumerate()
                .map(|(i, &nav)| (d(2024, 1, 1).checked_add_days(Days::new(i as u64)).unwrap(), nav))
                .collect(),
        );
        assert!((max_drawdown(&series) - (-0.20)).abs() < 1e-12);
    }

    #[test]
    fn test_max_drawdown_multiple_peaks() {
        let navs = [100.0, 90.0, 95.0, 110.0, 77.0, 100.0];
        let series = NavSeries::new(
            navs.iter()
                .enumerate()
                .map(|(i, &nav)| (d(2024, 1, 1).checked_add_days(Days::new(i as u64)).unwrap(), nav))
                .collect(),
        );
        assert!((max_drawdown(&series) - (-0.30)).abs() < 1e-12);
    }

    #[test]
    fn test_max_drawdown_monotone_rise_is_zero() {
        let series = daily_series(d(2024, 1, 1), 10, |i| 100.0 + i as f64);
        assert_eq!(max_drawdown(&series), 0.0);
    }

    #[test]
    fn test_rolling_return_round_trip() {
        // nav_b must be recoverable as nav_a * (1 + r) to within 1e-9.
        let series = daily_series(d(2020, 1, 1), 400, |i| 100.0 + i as f64 * 0.05);
        let returns = rolling_returns(&series, AnalyticsWindow::OneYear);
        assert!(!returns.is_empty());

        let (last_date, nav_b) = *series.points().last().unwrap();
        let target = last_date.checked_sub_days(Days::new(365)).unwrap();
        let nav_a = series.nav_near(target).unwrap();
        let r = *returns.last().unwrap();
        assert!((nav_b - nav_a * (1.0 + r)).abs() < 1e-9);
    }

    #[test]
    fn test_rolling_samples_skip_uncovered_lookbacks() {
        // 401 daily points: a point samples only when its look-back date (or
        // the five probe days after it) falls inside the series, i.e. from
        // day 360 onward.
        let series = daily_series(d(2020, 1, 1), 400, |i| 100.0 + i as f64);
        let returns = rolling_returns(&series, AnalyticsWindow::OneYear);
        assert_eq!(returns.len(), 41);
    }

    #[test]
    fn test_compute_window_insufficient_history() {
        // 300 days is under 90% of a one-year window.
        let series = daily_series(d(2023, 1, 1), 300, |i| 100.0 + i as f64);
        assert!(compute_window(&series, AnalyticsWindow::OneYear).is_none());
    }

    #[test]
    fn test_compute_window_exactly_at_threshold_is_insufficient() {
        // Exactly 90% of a ten-year window (3285 days) still skips.
        let series = daily_series(d(2010, 1, 1), 3285, |i| 100.0 + i as f64);
        assert_eq!(series.history_days(), 3285);
        assert!(compute_window(&series, AnalyticsWindow::TenYear).is_none());
    }

    #[test]
    fn test_compute_window_just_past_threshold() {
        let series = daily_series(d(2010, 1, 1), 3286, |i| 100.0 + i as f64);
        assert!(compute_window(&series, AnalyticsWindow::TenYear).is_some());
    }

    #[test]
    fn test_single_point_has_no_metrics() {
        let series = NavSeries::new(vec![(d(2024, 1, 1), 100.0)]);
        for window in AnalyticsWindow::ALL {
            assert!(compute_window(&series, window).is_none());
        }
    }

    #[test]
    fn test_window_metrics_distribution_ordering() {
        let series = daily_series(d(2020, 1, 1), 500, |i| {
            100.0 * (1.0 + 0.001 * i as f64) * (1.0 + 0.05 * ((i % 30) as f64 / 30.0))
        });
        let metrics = compute_window(&series, AnalyticsWindow::OneYear).unwrap();
        let dist = metrics.rolling_returns.unwrap();
        assert!(dist.min <= dist.p25);
        assert!(dist.p25 <= dist.median);
        assert!(dist.median <= dist.p75);
        assert!(dist.p75 <= dist.max);
        assert!(metrics.max_drawdown <= 0.0);
    }

    #[test]
    fn test_determinism() {
        let series = daily_series(d(2020, 1, 1), 500, |i| 100.0 + (i as f64).sin() * 5.0);
        let a = compute_window(&series, AnalyticsWindow::OneYear).unwrap();
        let b = compute_window(&series, AnalyticsWindow::OneYear).unwrap();
        assert_eq!(a, b);
    }
}
