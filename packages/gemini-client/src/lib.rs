//! Pure Gemini REST API client
//!
//! A clean, minimal client for the Google Gemini API with no domain-specific
//! logic. Supports content generation over text and inline documents.
//!
//! # Example
//!
//! ```rust,ignore
//! use gemini_client::{GeminiClient, GenerateContentRequest, GenerationConfig, Part};
//!
//! let client = GeminiClient::from_env()?;
//!
//! let request = GenerateContentRequest::from_parts(vec![
//!     Part::inline_data("application/pdf", &pdf_bytes),
//!     Part::text("Summarize this document."),
//! ])
//! .generation_config(GenerationConfig {
//!     temperature: Some(0.0),
//!     max_output_tokens: Some(4096),
//! });
//!
//! let response = client.generate_content("gemini-2.0-flash", request).await?;
//! println!("{}", response.first_text().unwrap_or_default());
//! ```

pub mod error;
pub mod types;

pub use error::{GeminiError, Result};
pub use types::*;

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default request timeout. Inline documents make for slow generations.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Pure Gemini API client.
#[derive(Clone)]
pub struct GeminiClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a new Gemini client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        let http_client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");
        Self {
            http_client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create from environment variable `GOOGLE_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GOOGLE_API_KEY")
            .map_err(|_| GeminiError::Config("GOOGLE_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    /// Set a custom base URL (for proxies or regional endpoints).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set a custom request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http_client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Content generation.
    ///
    /// Send a request to the `generateContent` endpoint and get the parsed
    /// response back.
    pub async fn generate_content(
        &self,
        model: &str,
        request: GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, model
            ))
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Gemini request failed");
                GeminiError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = extract_error_message(&error_text);
            warn!(status = %status, error = %message, "Gemini API error");
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let generate_response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GeminiError::Parse(e.to_string()))?;

        debug!(
            model = %model,
            duration_ms = start.elapsed().as_millis(),
            "Gemini content generation"
        );

        Ok(generate_response)
    }

    /// Generate text from an inline document plus a prompt.
    ///
    /// Convenience wrapper that sends the document and prompt as a single
    /// user turn and returns the first candidate's text.
    pub async fn generate_from_document(
        &self,
        model: &str,
        mime_type: &str,
        document: &[u8],
        prompt: &str,
        config: GenerationConfig,
    ) -> Result<String> {
        let request = GenerateContentRequest::from_parts(vec![
            Part::inline_data(mime_type, document),
            Part::text(prompt),
        ])
        .generation_config(config);

        let response = self.generate_content(model, request).await?;

        response
            .first_text()
            .map(|t| t.to_string())
            .ok_or_else(|| GeminiError::Parse("No text in Gemini response".into()))
    }
}

/// Pull the human-readable message out of an API error body, falling back to
/// the raw text when the body is not the documented JSON envelope.
fn extract_error_message(body: &str) -> String {
    match serde_json::from_str::<types::ErrorResponse>(body) {
        Ok(parsed) => match parsed.error.status {
            Some(status) if !status.is_empty() => {
                format!("{}: {}", status, parsed.error.message)
            }
            _ => parsed.error.message,
        },
        Err(_) => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = GeminiClient::new("test-key").with_base_url("https://custom.api.com");
        assert_eq!(client.base_url(), "https://custom.api.com");
        assert_eq!(client.api_key, "test-key");
    }

    #[test]
    fn test_default_base_url() {
        let client = GeminiClient::new("test-key");
        assert_eq!(
            client.base_url(),
            "https://generativelanguage.googleapis.com/v1beta"
        );
    }

    #[test]
    fn test_extract_error_message_json() {
        let body =
            r#"{"error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(
            extract_error_message(body),
            "RESOURCE_EXHAUSTED: Quota exceeded"
        );
    }

    #[test]
    fn test_extract_error_message_raw_body() {
        assert_eq!(
            extract_error_message("  upstream gateway timeout  "),
            "upstream gateway timeout"
        );
    }

    #[tokio::test]
    async fn test_connection_failure_is_network_error() {
        // Nothing listens on the discard port, so the request fails at
        // connect time without leaving the machine.
        let client = GeminiClient::new("test-key")
            .with_base_url("http://127.0.0.1:9")
            .with_timeout(Duration::from_secs(2));

        let request = GenerateContentRequest::from_parts(vec![Part::text("hello")]);
        let err = client
            .generate_content("gemini-2.0-flash", request)
            .await
            .unwrap_err();

        assert!(matches!(err, GeminiError::Network(_)));
        assert!(err.is_retryable());
    }
}
