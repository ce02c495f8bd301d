use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::nav_points;

/// A persisted NAV observation
#[derive(Queryable, Selectable, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = nav_points)]
pub struct NavPointRow {
    pub scheme_code: String,
    pub nav_date: NaiveDate,
    pub nav: BigDecimal,
    pub created_at: NaiveDateTime,
}

/// Insert form for a NAV observation
///
/// Written with `REPLACE INTO`, so re-ingesting a date overwrites the price
/// and repeated syncs leave the table unchanged.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = nav_points)]
pub struct NewNavPoint {
    pub scheme_code: String,
    pub nav_date: NaiveDate,
    pub nav: BigDecimal,
}
