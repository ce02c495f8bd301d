//! NAV point persistence and range queries

use crate::connection::DbPool;
use crate::models::{NavPointRow, NewNavPoint};
use crate::repositories::RepositoryResult;
use crate::schema::nav_points;
use chrono::NaiveDate;
use diesel::dsl::max;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

/// Rows per REPLACE statement during bulk ingestion
const BATCH_SIZE: usize = 1000;

pub struct NavRepository {
  pool: DbPool,
}

impl NavRepository {
  pub fn new(pool: DbPool) -> Self {
    Self { pool }
  }

  /// Idempotent bulk upsert
  ///
  /// `REPLACE INTO` keeps the one-NAV-per-date invariant: a duplicate
  /// `(scheme_code, nav_date)` overwrites the stored price, so re-running a
  /// sync is a no-op and upstream corrections win.
  pub async fn bulk_upsert(&self, records: &[NewNavPoint]) -> RepositoryResult<usize> {
    let mut conn = self.pool.get().await?;
    let mut total = 0;

    for chunk in records.chunks(BATCH_SIZE) {
      diesel::replace_into(nav_points::table).values(chunk).execute(&mut conn).await?;
      total += chunk.len();
    }

    Ok(total)
  }

  /// Latest persisted date for a scheme
  pub async fn max_date(&self, scheme_code: &str) -> RepositoryResult<Option<NaiveDate>> {
    let mut conn = self.pool.get().await?;

    let date = nav_points::table
      .filter(nav_points::scheme_code.eq(scheme_code))
      .select(max(nav_points::nav_date))
      .first::<Option<NaiveDate>>(&mut conn)
      .await?;

    Ok(date)
  }

  /// Full ascending history for a scheme
  pub async fn series(&self, scheme_code: &str) -> RepositoryResult<Vec<NavPointRow>> {
    let mut conn = self.pool.get().await?;

    let rows = nav_points::table
      .filter(nav_points::scheme_code.eq(scheme_code))
      .order(nav_points::nav_date.asc())
      .select(NavPointRow::as_select())
      .load(&mut conn)
      .await?;

    Ok(rows)
  }

  /// Most recent observation for a scheme
  pub async fn latest(&self, scheme_code: &str) -> RepositoryResult<Option<NavPointRow>> {
    let mut conn = self.pool.get().await?;

    let row = nav_points::table
      .filter(nav_points::scheme_code.eq(scheme_code))
      .order(nav_points::nav_date.desc())
      .select(NavPointRow::as_select())
      .first(&mut conn)
      .await
      .optional()?;

    Ok(row)
  }
}
