// src/error.rs
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ForumError>;

#[derive(Debug, Error)]
pub enum ForumError {
    /// Misuse of an API by the calling code, never a user-facing condition.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("configuration error: {0}")]
    Config(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ForumError {
    pub fn invalid_argument<T: ToString>(msg: T) -> Self {
        Self::InvalidArgument(msg.to_string())
    }

    pub fn config<T: ToString>(msg: T) -> Self {
        Self::Config(msg.to_string())
    }

    pub fn poll_not_found(id: i64) -> Self {
        Self::NotFound { entity: "poll", id }
    }
}
