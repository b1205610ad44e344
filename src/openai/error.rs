//! OpenAI-specific error handling.

use thiserror::Error;

/// OpenAI API specific errors.
#[derive(Error, Debug)]
pub enum HuskyError {
    /// API key not found in flags, environment, or settings.
    #[error(
        "OpenAI API key not found. Pass --api-key or set the OPENAI_API_KEY environment variable"
    )]
    ApiKeyNotFound,

    /// OpenAI API request failed with error message.
    #[error("OpenAI API request failed: {0}")]
    ApiRequestFailed(String),

    /// Invalid response format from OpenAI API.
    #[error("Invalid response format from OpenAI API: {0}")]
    InvalidResponseFormat(String),

    /// Network connectivity error.
    #[error("Network error: {0}")]
    NetworkError(String),
}

// Note: anyhow already has a blanket impl for thiserror::Error types
