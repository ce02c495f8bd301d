use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::sync_states;

/// Per-scheme, per-phase ingestion progress
///
/// Created lazily the first time a scheme is processed; transitions
/// pending -> in_progress -> (completed | failed) and may re-enter
/// in_progress on a later run.
#[derive(Queryable, Selectable, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = sync_states)]
pub struct SyncState {
    pub scheme_code: String,
    pub sync_type: String,
    pub status: String,
    pub last_synced_date: Option<NaiveDate>,
    pub total_records: Option<i32>,
    pub error_message: Option<String>,
    pub started_at: Option<NaiveDateTime>,
    pub completed_at: Option<NaiveDateTime>,
    pub updated_at: NaiveDateTime,
}

/// Insert form used by the lazy create (INSERT IGNORE)
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = sync_states)]
pub struct NewSyncState {
    pub scheme_code: String,
    pub sync_type: String,
    pub status: String,
}
