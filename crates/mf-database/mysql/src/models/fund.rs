use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::funds;

/// A persisted fund row
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = funds)]
#[diesel(primary_key(scheme_code))]
pub struct Fund {
    pub scheme_code: String,
    pub scheme_name: String,
    pub amc: String,
    pub category: String,
    pub scheme_type: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Authoritative fund metadata for an idempotent upsert
///
/// Not an `Insertable`: the upsert runs as raw SQL so a duplicate key
/// updates the metadata columns while leaving `created_at` untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct FundUpsert {
    pub scheme_code: String,
    pub scheme_name: String,
    pub amc: String,
    pub category: String,
    pub scheme_type: String,
}
