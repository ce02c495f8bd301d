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

//! The singleton pipeline-status row
//!
//! The pipeline orchestrator is the only writer; the read API only reads.
//! The row doubles as the cross-restart record of an interrupted run.

use crate::connection::DbPool;
use crate::models::pipeline::NewPipelineStatus;
use crate::models::PipelineStatusRow;
use crate::repositories::{RepositoryError, RepositoryResult};
use crate::schema::pipeline_status;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mf_core::{PipelinePhase, PipelineState};
use tracing::warn;

const ROW_ID: i32 = 1;

pub struct PipelineStatusRepository {
  pool: DbPool,
}

impl PipelineStatusRepository {
  pub fn new(pool: DbPool) -> Self {
    Self { pool }
  }

  /// Seed the singleton row if the table is empty
  pub async fn ensure_row(&self) -> RepositoryResult<()> {
    let mut conn = self.pool.get().await?;

    diesel::insert_or_ignore_into(pipeline_status::table)
      .values(NewPipelineStatus {
        id: ROW_ID,
        status: PipelineState::Idle.to_string(),
        progress_percent: 0.0,
        total_schemes: 0,
        completed_schemes: 0,
        failed_schemes: 0,
      })
      .execute(&mut conn)
      .await?;

    Ok(())
  }

  pub async fn get(&self) -> RepositoryResult<PipelineStatusRow> {
    let mut conn = self.pool.get().await?;

    pipeline_status::table
      .find(ROW_ID)
      .select(PipelineStatusRow::as_select())
      .first(&mut conn)
      .await
      .optional()?
      .ok_or_else(|| RepositoryError::NotFound("pipeline status row missing".to_string()))
  }

  /// Transition to `running` at the start of a run
  pub async fn begin_run(&self, phase: PipelinePhase) -> RepositoryResult<()> {
    let mut conn = self.pool.get().await?;

    diesel::update(pipeline_status::table.find(ROW_ID))
      .set((
        pipeline_status::status.eq(PipelineState::Running.to_string()),
        pipeline_status::current_phase.eq(Some(phase.to_string())),
        pipeline_status::progress_percent.eq(0.0),
        pipeline_status::total_schemes.eq(0),
        pipeline_status::completed_schemes.eq(0),
        pipeline_status::failed_schemes.eq(0),
        pipeline_status::started_at.eq(Some(Utc::now().naive_utc())),
        pipeline_status::completed_at.eq(None::<chrono::NaiveDateTime>),
        pipeline_status::last_error.eq(None::<String>),
      ))
      .execute(&mut conn)
      .await?;

    Ok(())
  }

  pub async fn set_total_schemes(&self, total: i32) -> RepositoryResult<()> {
    let mut conn = self.pool.get().await?;

    diesel::update(pipeline_status::table.find(ROW_ID))
      .set(pipeline_status::total_schemes.eq(total))
      .execute(&mut conn)
      .await?;

    Ok(())
  }

  /// Record phase and interpolated progress while a run advances
  pub async fn update_progress(
    &self,
    phase: PipelinePhase,
    progress_percent: f64,
    completed_schemes: i32,
    failed_schemes: i32,
  ) -> RepositoryResult<()> {
    let mut conn = self.pool.get().await?;

    diesel::update(pipeline_status::table.find(ROW_ID))
      .set((
        pipeline_status::current_phase.eq(Some(phase.to_string())),
        pipeline_status::progress_percent.eq(progress_percent.clamp(0.0, 100.0)),
        pipeline_status::completed_schemes.eq(completed_schemes),
        pipeline_status::failed_schemes.eq(failed_schemes),
      ))
      .execute(&mut conn)
      .await?;

    Ok(())
  }

  /// Mark the run successful: `idle` at 100%
  pub async fn complete(&self) -> RepositoryResult<()> {
    let mut conn = self.pool.get().await?;

    diesel::update(pipeline_status::table.find(ROW_ID))
      .set((
        pipeline_status::status.eq(PipelineState::Idle.to_string()),
        pipeline_status::current_phase.eq(None::<String>),
        pipeline_status::progress_percent.eq(100.0),
        pipeline_status::completed_at.eq(Some(Utc::now().naive_utc())),
      ))
      .execute(&mut conn)
      .await?;

    Ok(())
  }

  /// Mark the run failed, preserving the error string
  pub async fn fail(&self, message: &str) -> RepositoryResult<()> {
    let mut conn = self.pool.get().await?;

    diesel::update(pipeline_status::table.find(ROW_ID))
      .set((
        pipeline_status::status.eq(PipelineState::Failed.to_string()),
        pipeline_status::completed_at.eq(Some(Utc::now().naive_utc())),
        pipeline_status::last_error.eq(Some(message.to_string())),
      ))
      .execute(&mut conn)
      .await?;

    Ok(())
  }

  /// Recover from a process kill that left the row `running`
  ///
  /// Called once at startup, before any trigger is accepted. Returns true
  /// when an interrupted run was found and reset.
  pub async fn reset_if_interrupted(&self) -> RepositoryResult<bool> {
    let mut conn = self.pool.get().await?;

    let updated = diesel::update(
      pipeline_status::table
        .find(ROW_ID)
        .filter(pipeline_status::status.eq(PipelineState::Running.to_string())),
    )
    .set((
      pipeline_status::status.eq(PipelineState::Idle.to_string()),
      pipeline_status::current_phase.eq(None::<String>),
      pipeline_status::last_error.eq(Some("previous run interrupted by restart".to_string())),
    ))
    .execute(&mut conn)
    .await?;

    if updated > 0 {
      warn!("pipeline status was 'running' at startup; reset to idle");
    }

    Ok(updated > 0)
  }
}
