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

//! Repository layer over the MySQL store
//!
//! Each repository owns the SQL for one relation. All of them share the
//! bounded deadpool pool and surface errors through [`RepositoryError`].

pub mod analytics_repository;
pub mod fund_repository;
pub mod nav_repository;
pub mod pipeline_repository;
pub mod sync_state_repository;

pub use analytics_repository::{AnalyticsRepository, RankBy};
pub use fund_repository::FundRepository;
pub use nav_repository::NavRepository;
pub use pipeline_repository::PipelineStatusRepository;
pub use sync_state_repository::SyncStateRepository;

use diesel::result::Error as DieselError;
use thiserror::Error;

/// Database repository errors
#[derive(Error, Debug)]
pub enum RepositoryError {
  #[error("Connection pool error: {0}")]
  Pool(String),

  #[error("Database query error: {0}")]
  Query(String),

  #[error("Not found: {0}")]
  NotFound(String),

  #[error("Constraint violation: {0}")]
  ConstraintViolation(String),
}

impl From<DieselError> for RepositoryError {
  fn from(err: DieselError) -> Self {
    match err {
      DieselError::NotFound => RepositoryError::NotFound("Record not found".to_string()),
      DieselError::DatabaseError(kind, info) => match kind {
        diesel::result::DatabaseErrorKind::UniqueViolation
        | diesel::result::DatabaseErrorKind::ForeignKeyViolation => {
          RepositoryError::ConstraintViolation(info.message().to_string())
        }
        _ => RepositoryError::Query(info.message().to_string()),
      },
      _ => RepositoryError::Query(err.to_string()),
    }
  }
}

impl From<diesel_async::pooled_connection::deadpool::PoolError> for RepositoryError {
  fn from(err: diesel_async::pooled_connection::deadpool::PoolError) -> Self {
    RepositoryError::Pool(err.to_string())
  }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
