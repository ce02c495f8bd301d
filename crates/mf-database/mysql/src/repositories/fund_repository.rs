//! Fund metadata persistence

use crate::connection::DbPool;
use crate::models::{Fund, FundUpsert};
use crate::repositories::RepositoryResult;
use crate::schema::funds;
use diesel::prelude::*;
use diesel::sql_types::Text;
use diesel_async::RunQueryDsl;

pub struct FundRepository {
  pool: DbPool,
}

impl FundRepository {
  pub fn new(pool: DbPool) -> Self {
    Self { pool }
  }

  /// Idempotent metadata upsert
  ///
  /// A new scheme inserts a row; a known scheme updates every metadata
  /// column with the authoritative upstream values while `created_at`
  /// keeps recording first discovery.
  pub async fn upsert(&self, fund: &FundUpsert) -> RepositoryResult<()> {
    let mut conn = self.pool.get().await?;

    diesel::sql_query(
      "INSERT INTO funds (scheme_code, scheme_name, amc, category, scheme_type) \
       VALUES (?, ?, ?, ?, ?) \
       ON DUPLICATE KEY UPDATE \
         scheme_name = VALUES(scheme_name), \
         amc = VALUES(amc), \
         category = VALUES(category), \
         scheme_type = VALUES(scheme_type)",
    )
    .bind::<Text, _>(&fund.scheme_code)
    .bind::<Text, _>(&fund.scheme_name)
    .bind::<Text, _>(&fund.amc)
    .bind::<Text, _>(&fund.category)
    .bind::<Text, _>(&fund.scheme_type)
    .execute(&mut conn)
    .await?;

    Ok(())
  }

  pub async fn get(&self, scheme_code: &str) -> RepositoryResult<Option<Fund>> {
    let mut conn = self.pool.get().await?;

    let fund = funds::table
      .find(scheme_code)
      .select(Fund::as_select())
      .first(&mut conn)
      .await
      .optional()?;

    Ok(fund)
  }

  /// List funds with optional case-insensitive substring filters
  pub async fn list(
    &self,
    category: Option<&str>,
    amc: Option<&str>,
  ) -> RepositoryResult<Vec<Fund>> {
    let mut conn = self.pool.get().await?;

    let mut query = funds::table.select(Fund::as_select()).into_boxed();
    if let Some(category) = category {
      query = query.filter(funds::category.like(format!("%{}%", category)));
    }
    if let Some(amc) = amc {
      query = query.filter(funds::amc.like(format!("%{}%", amc)));
    }

    let rows = query.order(funds::scheme_name.asc()).load(&mut conn).await?;

    Ok(rows)
  }

  /// All scheme codes currently known
  pub async fn scheme_codes(&self) -> RepositoryResult<Vec<String>> {
    let mut conn = self.pool.get().await?;
    let codes =
      funds::table.order(funds::scheme_code.asc()).select(funds::scheme_code).load(&mut conn).await?;
    Ok(codes)
  }
}
