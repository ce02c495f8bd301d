use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The key-value store rejected or dropped a command
    #[error("Store error: {0}")]
    Store(String),

    /// The store returned something the limiter cannot interpret
    #[error("Malformed store reply: {0}")]
    MalformedReply(String),

    /// `wait_for_token` ran past its deadline
    #[error("No token acquired within {waited_ms} ms")]
    DeadlineExceeded { waited_ms: u64 },
}

impl From<redis::RedisError> for Error {
    fn from(err: redis::RedisError) -> Self {
        Error::Store(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Store(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
