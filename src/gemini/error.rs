//! Error types for Gemini API integration

use thiserror::Error;

/// Errors that can occur when interacting with the Gemini API
#[derive(Debug, Error)]
pub enum GeminiError {
    /// No credential in the environment or keyring
    #[error("API key not configured. Set GEMINI_API_KEY or run `smartstudy auth set <KEY>`")]
    ApiKeyNotFound,

    /// Failed to access system keyring
    #[error("Failed to access keyring: {0}")]
    KeyringError(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error ({status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from API
        message: String,
    },

    /// Rate limited by the API
    #[error("Rate limited. Retry after {retry_after_seconds} seconds")]
    RateLimited {
        /// Seconds to wait before retrying
        retry_after_seconds: u64,
    },

    /// Failed to parse streaming response
    #[error("Stream parsing error: {0}")]
    StreamParseError(String),

    /// The prompt or the candidate was blocked by safety filters
    #[error("Response blocked: {reason}")]
    Blocked {
        /// Block or finish reason reported by the API
        reason: String,
    },

    /// The response carried no candidate text
    #[error("Empty response from model")]
    EmptyResponse,

    /// Stream was cancelled at shutdown
    #[error("Request cancelled")]
    Cancelled,

    /// Invalid API key format
    #[error("Invalid API key format")]
    InvalidApiKey,

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl GeminiError {
    /// Check if this error is recoverable (user can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GeminiError::RateLimited { .. }
                | GeminiError::RequestError(_)
                | GeminiError::StreamParseError(_)
                | GeminiError::EmptyResponse
                | GeminiError::ApiError { status: 500..=599, .. }
        )
    }

    /// Check if this error requires re-authentication
    pub fn requires_reauth(&self) -> bool {
        matches!(
            self,
            GeminiError::ApiKeyNotFound
                | GeminiError::InvalidApiKey
                | GeminiError::ApiError { status: 401 | 403, .. }
        )
    }
}
