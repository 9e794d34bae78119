// Error types for ghtimeline.
// Covers upstream HTTP failures, decoding errors, and configuration problems.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimelineError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Authentication failed: invalid or expired token")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded, resets at {reset_at}")]
    RateLimited { reset_at: String },

    /// Non-success status that has no dedicated variant.
    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl TimelineError {
    /// HTTP status code behind this error, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            TimelineError::Unauthorized => Some(401),
            TimelineError::NotFound(_) => Some(404),
            TimelineError::RateLimited { .. } => Some(403),
            TimelineError::Status(code) => Some(*code),
            TimelineError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TimelineError>;
