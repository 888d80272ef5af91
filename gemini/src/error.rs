//! Error types for the Gemini API client

use thiserror::Error;

/// Errors that can occur when interacting with the Gemini API
#[derive(Debug, Error)]
pub enum GeminiError {
    /// Missing `GEMINI_API_KEY` environment variable
    #[error("Missing GEMINI_API_KEY environment variable")]
    MissingApiKey,

    /// HTTP request failed before a response arrived
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response parsing failed
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// Rate limited - too many requests
    #[error("Rate limited - too many requests")]
    RateLimited,

    /// Unauthorized - invalid API key
    #[error("Unauthorized - invalid API key")]
    Unauthorized,

    /// API returned an error
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from API
        message: String,
    },

    /// The response carried no candidate text
    #[error("Response contained no text")]
    EmptyResponse,
}
