//! Error types for the Gemini client.

use thiserror::Error;

/// Result type for Gemini client operations.
pub type Result<T> = std::result::Result<T, GeminiError>;

/// Gemini client errors.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// Configuration error (missing API key, invalid settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// API error (non-2xx response, rate limit, invalid request)
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Parse error (invalid JSON, unexpected response format)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl GeminiError {
    /// Whether a retry could plausibly succeed.
    ///
    /// Network failures, rate limits (429), request timeouts (408), and
    /// server errors (5xx) are retryable; other API rejections and malformed
    /// responses are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            GeminiError::Network(_) => true,
            GeminiError::Api { status, .. } => {
                *status == 408 || *status == 429 || *status >= 500
            }
            GeminiError::Config(_) | GeminiError::Parse(_) => false,
        }
    }
}
