//! Windowed analytics persistence and ranking

use crate::connection::DbPool;
use crate::models::{Fund, FundAnalytics, NewFundAnalytics};
use crate::repositories::RepositoryResult;
use crate::schema::{fund_analytics, funds};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

/// Ranking metric for the leaderboard query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankBy {
  /// Median rolling return, best first (descending)
  MedianReturn,
  /// Max drawdown, shallowest first (ascending; values are ≤ 0)
  MaxDrawdown,
}

pub struct AnalyticsRepository {
  pool: DbPool,
}

impl AnalyticsRepository {
  pub fn new(pool: DbPool) -> Self {
    Self { pool }
  }

  /// Replace a scheme's analytics with a fresh recompute
  ///
  /// Windows in `rows` are overwritten; any previously stored window the
  /// recompute no longer produced (history shrank below sufficiency) is
  /// deleted so stale numbers never linger.
  pub async fn replace_for_scheme(
    &self,
    scheme_code: &str,
    rows: &[NewFundAnalytics],
  ) -> RepositoryResult<usize> {
    let mut conn = self.pool.get().await?;

    if !rows.is_empty() {
      diesel::replace_into(fund_analytics::table).values(rows).execute(&mut conn).await?;
    }

    let kept: Vec<&str> = rows.iter().map(|r| r.window_type.as_str()).collect();
    diesel::delete(
      fund_analytics::table
        .filter(fund_analytics::scheme_code.eq(scheme_code))
        .filter(fund_analytics::window_type.ne_all(kept)),
    )
    .execute(&mut conn)
    .await?;

    Ok(rows.len())
  }

  pub async fn get(
    &self,
    scheme_code: &str,
    window_type: &str,
  ) -> RepositoryResult<Option<FundAnalytics>> {
    let mut conn = self.pool.get().await?;

    let row = fund_analytics::table
      .find((scheme_code, window_type))
      .select(FundAnalytics::as_select())
      .first(&mut conn)
      .await
      .optional()?;

    Ok(row)
  }

  /// Rank funds within an optional category for one window
  ///
  /// Returns are ranked descending, drawdowns ascending; ties break on
  /// `scheme_code` so the ordering is total.
  pub async fn rank(
    &self,
    category: Option<&str>,
    window_type: &str,
    sort_by: RankBy,
    limit: i64,
  ) -> RepositoryResult<Vec<(Fund, FundAnalytics)>> {
    let mut conn = self.pool.get().await?;

    let mut query = fund_analytics::table
      .inner_join(funds::table)
      .select((Fund::as_select(), FundAnalytics::as_select()))
      .filter(fund_analytics::window_type.eq(window_type))
      .into_boxed();

    if let Some(category) = category {
      query = query.filter(funds::category.like(format!("%{}%", category)));
    }

    query = match sort_by {
      RankBy::MedianReturn => query
        .filter(fund_analytics::rolling_return_median.is_not_null())
        .order((fund_analytics::rolling_return_median.desc(), fund_analytics::scheme_code.asc())),
      RankBy::MaxDrawdown => query
        .filter(fund_analytics::max_drawdown.is_not_null())
        .order((fund_analytics::max_drawdown.asc(), fund_analytics::scheme_code.asc())),
    };

    let rows = query.limit(limit).load(&mut conn).await?;

    Ok(rows)
  }
}
