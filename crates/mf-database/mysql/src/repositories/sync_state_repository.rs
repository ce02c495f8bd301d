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

//! Per-scheme sync progress persistence
//!
//! Each `(scheme_code, sync_type)` row is owned by the worker processing
//! that scheme while it is in_progress; readers may observe any row at any
//! time.

use crate::connection::DbPool;
use crate::models::sync_state::NewSyncState;
use crate::models::SyncState;
use crate::repositories::RepositoryResult;
use crate::schema::sync_states;
use chrono::{NaiveDate, Utc};
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mf_core::{SyncStatus, SyncType};

pub struct SyncStateRepository {
  pool: DbPool,
}

impl SyncStateRepository {
  pub fn new(pool: DbPool) -> Self {
    Self { pool }
  }

  /// Lazily create the row in `pending` if it does not exist yet
  pub async fn ensure(&self, scheme_code: &str, sync_type: SyncType) -> RepositoryResult<()> {
    let mut conn = self.pool.get().await?;

    diesel::insert_or_ignore_into(sync_states::table)
      .values(NewSyncState {
        scheme_code: scheme_code.to_string(),
        sync_type: sync_type.to_string(),
        status: SyncStatus::Pending.to_string(),
      })
      .execute(&mut conn)
      .await?;

    Ok(())
  }

  pub async fn get(
    &self,
    scheme_code: &str,
    sync_type: SyncType,
  ) -> RepositoryResult<Option<SyncState>> {
    let mut conn = self.pool.get().await?;

    let row = sync_states::table
      .find((scheme_code, sync_type.to_string()))
      .select(SyncState::as_select())
      .first(&mut conn)
      .await
      .optional()?;

    Ok(row)
  }

  pub async fn list_by_type(&self, sync_type: SyncType) -> RepositoryResult<Vec<SyncState>> {
    let mut conn = self.pool.get().await?;

    let rows = sync_states::table
      .filter(sync_states::sync_type.eq(sync_type.to_string()))
      .order(sync_states::scheme_code.asc())
      .select(SyncState::as_select())
      .load(&mut conn)
      .await?;

    Ok(rows)
  }

  /// Scheme codes whose sync of the given type has completed
  pub async fn completed_scheme_codes(&self, sync_type: SyncType) -> RepositoryResult<Vec<String>> {
    let mut conn = self.pool.get().await?;

    let codes = sync_states::table
      .filter(sync_states::sync_type.eq(sync_type.to_string()))
      .filter(sync_states::status.eq(SyncStatus::Completed.to_string()))
      .order(sync_states::scheme_code.asc())
      .select(sync_states::scheme_code)
      .load(&mut conn)
      .await?;

    Ok(codes)
  }

  /// Enter the in_progress window, clearing any previous outcome
  pub async fn mark_in_progress(
    &self,
    scheme_code: &str,
    sync_type: SyncType,
  ) -> RepositoryResult<()> {
    let mut conn = self.pool.get().await?;

    diesel::update(sync_states::table.find((scheme_code, sync_type.to_string())))
      .set((
        sync_states::status.eq(SyncStatus::InProgress.to_string()),
        sync_states::started_at.eq(Some(Utc::now().naive_utc())),
        sync_states::error_message.eq(None::<String>),
        sync_states::completed_at.eq(None::<chrono::NaiveDateTime>),
      ))
      .execute(&mut conn)
      .await?;

    Ok(())
  }

  pub async fn mark_completed(
    &self,
    scheme_code: &str,
    sync_type: SyncType,
    last_synced_date: Option<NaiveDate>,
    total_records: i32,
  ) -> RepositoryResult<()> {
    let mut conn = self.pool.get().await?;

    diesel::update(sync_states::table.find((scheme_code, sync_type.to_string())))
      .set((
        sync_states::status.eq(SyncStatus::Completed.to_string()),
        sync_states::last_synced_date.eq(last_synced_date),
        sync_states::total_records.eq(Some(total_records)),
        sync_states::error_message.eq(None::<String>),
        sync_states::completed_at.eq(Some(Utc::now().naive_utc())),
      ))
      .execute(&mut conn)
      .await?;

    Ok(())
  }

  pub async fn mark_failed(
    &self,
    scheme_code: &str,
    sync_type: SyncType,
    message: &str,
  ) -> RepositoryResult<()> {
    let mut conn = self.pool.get().await?;

    diesel::update(sync_states::table.find((scheme_code, sync_type.to_string())))
      .set((
        sync_states::status.eq(SyncStatus::Failed.to_string()),
        sync_states::error_message.eq(Some(message.to_string())),
        sync_states::completed_at.eq(Some(Utc::now().naive_utc())),
      ))
      .execute(&mut conn)
      .await?;

    Ok(())
  }

  /// `(sync_type, status, count)` histogram for the status endpoint
  pub async fn status_counts(&self) -> RepositoryResult<Vec<(String, String, i64)>> {
    let mut conn = self.pool.get().await?;

    let counts = sync_states::table
      .group_by((sync_states::sync_type, sync_states::status))
      .select((sync_states::sync_type, sync_states::status, count_star()))
      .load(&mut conn)
      .await?;

    Ok(counts)
  }
}
