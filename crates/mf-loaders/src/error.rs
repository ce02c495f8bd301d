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

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
  #[error("API error: {0}")]
  ApiError(String),

  /// Upstream 429: the limiter has drifted, the run must abort
  #[error("Rate limit breach: {0}")]
  RateLimitBreach(String),

  #[error("Database error: {0}")]
  DatabaseError(String),

  #[error("Invalid data: {0}")]
  InvalidData(String),

  #[error("A pipeline run is already in progress")]
  AlreadyRunning,
}

impl From<mf_core::Error> for LoaderError {
  fn from(err: mf_core::Error) -> Self {
    match err {
      mf_core::Error::RateLimitBreach(message) => LoaderError::RateLimitBreach(message),
      other => LoaderError::ApiError(other.to_string()),
    }
  }
}

impl From<mf_database_mysql::RepositoryError> for LoaderError {
  fn from(err: mf_database_mysql::RepositoryError) -> Self {
    LoaderError::DatabaseError(err.to_string())
  }
}

pub type LoaderResult<T> = Result<T, LoaderError>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_loader_error_display() {
    let err = LoaderError::ApiError("connection failed".to_string());
    assert_eq!(err.to_string(), "API error: connection failed");

    let err = LoaderError::AlreadyRunning;
    assert_eq!(err.to_string(), "A pipeline run is already in progress");
  }

  #[test]
  fn test_loader_error_from_core_error() {
    let core_err = mf_core::Error::Config("bad config".to_string());
    let err = LoaderError::from(core_err);
    assert!(matches!(err, LoaderError::ApiError(_)));
  }
}
