//! Configuration types for the pipeline stages.
//!
//! Everything an operation needs is passed in at construction time; there
//! are no ambient globals. Defaults match the small, polite footprint the
//! pipeline is meant to have against both the document hosts and the model
//! provider.

use std::time::Duration;

use crate::retry::RetryPolicy;

/// Configuration for the fetch stage.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Timeout for one HTTP attempt, response body included
    pub timeout: Duration,

    /// User agent sent with every request
    pub user_agent: String,

    /// Retry policy for transient failures
    pub retry: RetryPolicy,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: "Mozilla/5.0 (compatible; DigestBot/1.0)".to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

impl FetchConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Configuration for the summarize stage.
#[derive(Debug, Clone)]
pub struct SummarizeConfig {
    /// Upper bound on the document size sent to the provider
    pub max_document_bytes: u64,

    /// Mime type reported for documents
    pub mime_type: String,

    /// Retry policy for transient model failures
    pub retry: RetryPolicy,
}

impl Default for SummarizeConfig {
    fn default() -> Self {
        Self {
            max_document_bytes: 20 * 1024 * 1024,
            mime_type: "application/pdf".to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

impl SummarizeConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document size limit.
    pub fn with_max_document_bytes(mut self, max_document_bytes: u64) -> Self {
        self.max_document_bytes = max_document_bytes;
        self
    }

    /// Set the document mime type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}
