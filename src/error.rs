use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AffinityError {
    #[error("Invalid generation request: {0}")]
    InvalidRequest(String),

    #[error("Generation backend error: {0}")]
    Backend(String),

    #[error("Generation backend timed out after {0:?}")]
    BackendTimeout(Duration),

    #[error("Knowledge base error: {0}")]
    KnowledgeBase(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AffinityError>;

/// Failure of a single `generate` call, with tips the caller can show next
/// to its retry affordance.
#[derive(Error, Debug)]
#[error("{cause}")]
pub struct GenerationError {
    pub cause: AffinityError,
    pub tips: Vec<String>,
}

impl GenerationError {
    pub fn new(cause: AffinityError, tips: Vec<String>) -> Self {
        Self { cause, tips }
    }

    pub fn is_invalid_request(&self) -> bool {
        matches!(self.cause, AffinityError::InvalidRequest(_))
    }

    pub fn is_backend_failure(&self) -> bool {
        matches!(
            self.cause,
            AffinityError::Backend(_) | AffinityError::BackendTimeout(_)
        )
    }
}
