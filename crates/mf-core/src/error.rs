use thiserror::Error;

/// The main error type for mf-* crates
#[derive(Error, Debug)]
pub enum Error {
  /// Environment variable error
  #[error("Environment variable error: {0}")]
  EnvVar(#[from] std::env::VarError),

  /// Configuration error
  #[error("Configuration error: {0}")]
  Config(String),

  /// Serialization/Deserialization error
  #[error("Serialization error")]
  Serde(#[from] serde_json::Error),

  /// Date/Time parsing error
  #[error("Date parsing error")]
  ParseDate(#[from] chrono::ParseError),

  /// Missing required field in response
  #[error("Missing required field: {0}")]
  MissingField(String),

  /// Upstream returned 429: the limiter is miscalibrated
  #[error("Upstream rate limit breach: {0}")]
  RateLimitBreach(String),

  /// Invalid response from the upstream API
  #[error("Invalid API response: {0}")]
  InvalidResponse(String),

  /// HTTP transport error
  #[error("HTTP error: {0}")]
  Http(String),

  /// Upstream API returned a non-success status
  #[error("Upstream status {status}: {message}")]
  UpstreamStatus { status: u16, message: String },

  /// Parse error for data processing
  #[error("Parse error: {0}")]
  Parse(String),
}

/// Result type alias for mf-* crates
pub type Result<T> = std::result::Result<T, Error>;
