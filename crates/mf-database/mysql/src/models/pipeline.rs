use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::pipeline_status;

/// The singleton (`id = 1`) pipeline status row
#[derive(Queryable, Selectable, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = pipeline_status)]
pub struct PipelineStatusRow {
    pub id: i32,
    pub status: String,
    pub current_phase: Option<String>,
    pub progress_percent: f64,
    pub total_schemes: i32,
    pub completed_schemes: i32,
    pub failed_schemes: i32,
    pub started_at: Option<NaiveDateTime>,
    pub completed_at: Option<NaiveDateTime>,
    pub last_error: Option<String>,
    pub updated_at: NaiveDateTime,
}

/// Insert form used to seed the singleton row
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = pipeline_status)]
pub struct NewPipelineStatus {
    pub id: i32,
    pub status: String,
    pub progress_percent: f64,
    pub total_schemes: i32,
    pub completed_schemes: i32,
    pub failed_schemes: i32,
}
