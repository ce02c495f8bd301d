use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::fund_analytics;

/// A persisted `(scheme, window)` analytics row
#[derive(Queryable, Selectable, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = fund_analytics)]
pub struct FundAnalytics {
    pub scheme_code: String,
    pub window_type: String,
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

/// Insert form for a full analytics recompute
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = fund_analytics)]
pub struct NewFundAnalytics {
    pub scheme_code: String,
    pub window_type: String,
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
