//! Typed errors for the summarization pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling. Per-item errors carry an
//! `is_transient` classifier so the retry policy can tell a flaky network
//! from a structurally unusable input.

use thiserror::Error;

/// Run-level errors. These abort a whole pipeline stage before or instead of
/// per-item processing.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Links workbook could not be opened or read
    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// Workbook has no worksheet to read
    #[error("no worksheet in {path}")]
    NoWorksheet { path: String },

    /// Required column missing from the header row
    #[error("missing required column: {name}")]
    MissingColumn { name: String },

    /// Aggregation found nothing to combine
    #[error("no summaries found in {path}")]
    NoSummaries { path: String },

    /// Missing or unusable configuration input (prompt file, credentials)
    #[error("config error: {0}")]
    Config(String),

    /// Filesystem operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can fail a single fetch attempt.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (connection, timeout, TLS)
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response
    #[error("HTTP {status} fetching {url}")]
    Status { status: u16, url: String },

    /// Local write failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FetchError {
    /// Whether a retry could plausibly succeed.
    ///
    /// Transport failures, request timeouts (408), rate limits (429), and
    /// server errors (5xx) are transient; other statuses and local I/O
    /// failures are not.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Transport(_) => true,
            FetchError::Status { status, .. } => {
                *status == 408 || *status == 429 || *status >= 500
            }
            FetchError::Io(_) => false,
        }
    }
}

/// Errors that can fail a single summarize attempt.
#[derive(Debug, Error)]
pub enum SummarizeError {
    /// Source document missing from disk
    #[error("document not found: {path}")]
    DocumentMissing { path: String },

    /// Document exceeds the provider size limit
    #[error("document too large: {size} bytes (limit {limit})")]
    DocumentTooLarge { size: u64, limit: u64 },

    /// Model call failed
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// Local read/write failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SummarizeError {
    /// Whether a retry could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, SummarizeError::Model(e) if e.is_transient())
    }
}

/// Errors surfaced by a generative model implementation.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Provider rate limit hit
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Provider or network temporarily unavailable
    #[error("model unavailable: {0}")]
    Unavailable(String),

    /// Provider rejected the request (bad input, auth, size)
    #[error("request rejected: {0}")]
    Rejected(String),

    /// Response arrived but carried no usable text
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ModelError {
    /// Whether a retry could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, ModelError::RateLimited(_) | ModelError::Unavailable(_))
    }
}

/// Result type alias for run-level pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
