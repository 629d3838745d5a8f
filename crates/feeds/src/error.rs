//! Error types for listing retrieval.

use thiserror::Error;

/// Errors that can occur while fetching a listing page.
///
/// All of these end pagination for the current cycle; none is fatal.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("HTTP status {0}")]
    HttpStatus(u16),

    #[error("Unexpected payload: {0}")]
    UnexpectedPayload(String),
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FeedError::Timeout(err.to_string())
        } else if let Some(status) = err.status() {
            FeedError::HttpStatus(status.as_u16())
        } else if err.is_decode() {
            FeedError::UnexpectedPayload(err.to_string())
        } else {
            FeedError::Request(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        FeedError::UnexpectedPayload(err.to_string())
    }
}
