//! Fund listing, detail, analytics, and ranking handlers

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use bigdecimal::ToPrimitive;
use chrono::{NaiveDate, NaiveDateTime};
use mf_core::AnalyticsWindow;
use mf_database_mysql::{Fund, FundAnalytics, RankBy};
use serde::{Deserialize, Serialize};

const DEFAULT_RANK_LIMIT: i64 = 5;
const MAX_RANK_LIMIT: i64 = 100;

#[derive(Debug, Deserialize, Default)]
pub struct FundListQuery {
    pub category: Option<String>,
    pub amc: Option<String>,
}

pub async fn list_funds(
    State(state): State<AppState>,
    Query(query): Query<FundListQuery>,
) -> ApiResult<Json<Vec<Fund>>> {
    let funds = state.funds.list(query.category.as_deref(), query.amc.as_deref()).await?;
    Ok(Json(funds))
}

#[derive(Debug, Serialize)]
pub struct LatestNav {
    pub date: NaiveDate,
    pub nav: f64,
}

#[derive(Debug, Serialize)]
pub struct FundDetail {
    #[serde(flatten)]
    pub fund: Fund,
    pub latest_nav: Option<LatestNav>,
}

pub async fn get_fund(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Json<FundDetail>> {
    let fund = state
        .funds
        .get(&code)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("unknown scheme: {}", code)))?;

    let latest_nav = state.navs.latest(&code).await?.and_then(|row| {
        row.nav.to_f64().map(|nav| LatestNav { date: row.nav_date, nav })
    });

    Ok(Json(FundDetail { fund, latest_nav }))
}

#[derive(Debug, Deserialize, Default)]
pub struct AnalyticsQuery {
    pub window: Option<String>,
}

/// Analytics response with ratios scaled to percentages, one decimal
#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub scheme_code: String,
    pub window: String,
    pub rolling_return_min: Option<f64>,
    pub rolling_return_max: Option<f64>,
    pub rolling_return_median: Option<f64>,
    pub rolling_return_p25: Option<f64>,
    pub rolling_return_p75: Option<f64>,
    pub max_drawdown: Option<f64>,
    pub cagr_min: Option<f64>,
    pub cagr_max: Option<f64>,
    pub cagr_median: Option<f64>,
    pub data_start_date: NaiveDate,
    pub data_end_date: NaiveDate,
    pub computed_at: NaiveDateTime,
}

pub async fn get_analytics(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(query): Query<AnalyticsQuery>,
) -> ApiResult<Json<AnalyticsResponse>> {
    let window = parse_window(query.window.as_deref())?;

    let row = state
        .analytics
        .get(&code, window.as_str())
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("no {} analytics for scheme {}", window, code))
        })?;

    Ok(Json(to_analytics_response(row)))
}

#[derive(Debug, Deserialize, Default)]
pub struct RankQuery {
    pub category: Option<String>,
    pub window: Option<String>,
    pub sort_by: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct RankEntry {
    pub scheme_code: String,
    pub scheme_name: String,
    pub amc: String,
    pub category: String,
    pub median_return: Option<f64>,
    pub max_drawdown: Option<f64>,
}

pub async fn rank(
    State(state): State<AppState>,
    Query(query): Query<RankQuery>,
) -> ApiResult<Json<Vec<RankEntry>>> {
    let window = parse_window(query.window.as_deref())?;

    let sort_by = match query.sort_by.as_deref() {
        None | Some("median_return") => RankBy::MedianReturn,
        Some("max_drawdown") => RankBy::MaxDrawdown,
        Some(other) => {
            return Err(ApiError::BadRequest(format!("unknown sort_by: {}", other)));
        }
    };

    let limit = query.limit.unwrap_or(DEFAULT_RANK_LIMIT);
    if !(1..=MAX_RANK_LIMIT).contains(&limit) {
        return Err(ApiError::BadRequest(format!(
            "limit must be between 1 and {}",
            MAX_RANK_LIMIT
        )));
    }

    let rows = state
        .analytics
        .rank(query.category.as_deref(), window.as_str(), sort_by, limit)
        .await?;

    let entries = rows
        .into_iter()
        .map(|(fund, analytics)| RankEntry {
            scheme_code: fund.scheme_code,
            scheme_name: fund.scheme_name,
            amc: fund.amc,
            category: fund.category,
            median_return: analytics.rolling_return_median.map(as_percent),
            max_drawdown: analytics.max_drawdown.map(as_percent),
        })
        .collect();

    Ok(Json(entries))
}

fn parse_window(raw: Option<&str>) -> ApiResult<AnalyticsWindow> {
    let raw = raw.ok_or_else(|| {
        ApiError::BadRequest("missing required query parameter: window".to_string())
    })?;
    raw.parse().map_err(|_| {
        ApiError::BadRequest(format!("invalid window '{}'; expected 1Y, 3Y, 5Y, or 10Y", raw))
    })
}

/// Scale a ratio to a percentage rounded to one decimal
fn as_percent(ratio: f64) -> f64 {
    (ratio * 1000.0).round() / 10.0
}

fn to_analytics_response(row: FundAnalytics) -> AnalyticsResponse {
    AnalyticsResponse {
        scheme_code: row.scheme_code,
        window: row.window_type,
        rolling_return_min: row.rolling_return_min.map(as_percent),
        rolling_return_max: row.rolling_return_max.map(as_percent),
        rolling_return_median: row.rolling_return_median.map(as_percent),
        rolling_return_p25: row.rolling_return_p25.map(as_percent),
        rolling_return_p75: row.rolling_return_p75.map(as_percent),
        max_drawdown: row.max_drawdown.map(as_percent),
        cagr_min: row.cagr_min.map(as_percent),
        cagr_max: row.cagr_max.map(as_percent),
        cagr_median: row.cagr_median.map(as_percent),
        data_start_date: row.data_start_date,
        data_end_date: row.data_end_date,
        computed_at: row.computed_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_percent_rounds_to_one_decimal() {
        assert_eq!(as_percent(0.14869), 14.9);
        assert_eq!(as_percent(-0.20), -20.0);
        assert_eq!(as_percent(0.0), 0.0);
        assert_eq!(as_percent(0.12345), 12.3);
    }

    #[test]
    fn test_parse_window_requires_value() {
        assert!(parse_window(None).is_err());
        assert!(parse_window(Some("2Y")).is_err());
        assert_eq!(parse_window(Some("5Y")).unwrap(), AnalyticsWindow::FiveYear);
    }
}
