//! Gemini implementation of the GenerativeModel trait.
//!
//! A reference implementation over the `generateContent` API with inline
//! document payloads.
//!
//! # Example
//!
//! ```rust,ignore
//! use summarization::ai::GeminiModel;
//!
//! let model = GeminiModel::from_env()?.with_model("gemini-2.0-flash");
//! let summarizer = Summarizer::new(model, prompt, SummarizeConfig::default());
//! ```

use async_trait::async_trait;
use gemini_client::{GeminiClient, GeminiError, GenerationConfig};

use crate::error::ModelError;
use crate::traits::model::GenerativeModel;

/// Gemini-backed model implementation.
///
/// Defaults to `gemini-2.0-flash` at temperature 0.0 so repeated runs over
/// the same documents stay comparable.
#[derive(Clone)]
pub struct GeminiModel {
    client: GeminiClient,
    model: String,
    temperature: f32,
    max_output_tokens: u32,
}

impl GeminiModel {
    /// Create a new Gemini model over an existing client.
    pub fn new(client: GeminiClient) -> Self {
        Self {
            client,
            model: "gemini-2.0-flash".to_string(),
            temperature: 0.0,
            max_output_tokens: 4096,
        }
    }

    /// Create from environment variable `GOOGLE_API_KEY`.
    pub fn from_env() -> Result<Self, GeminiError> {
        Ok(Self::new(GeminiClient::from_env()?))
    }

    /// Set the model (default: gemini-2.0-flash).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the sampling temperature (default: 0.0).
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the output token bound (default: 4096).
    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// Get the current model name.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl GenerativeModel for GeminiModel {
    async fn generate(
        &self,
        document: &[u8],
        mime_type: &str,
        prompt: &str,
    ) -> Result<String, ModelError> {
        self.client
            .generate_from_document(
                &self.model,
                mime_type,
                document,
                prompt,
                GenerationConfig {
                    temperature: Some(self.temperature),
                    max_output_tokens: Some(self.max_output_tokens),
                },
            )
            .await
            .map_err(map_error)
    }
}

/// Map client errors onto the pipeline's model error taxonomy.
fn map_error(error: GeminiError) -> ModelError {
    match error {
        GeminiError::Api {
            status: 429,
            message,
        } => ModelError::RateLimited(message),
        GeminiError::Api { status, message } if status == 408 || status >= 500 => {
            ModelError::Unavailable(format!("HTTP {status}: {message}"))
        }
        GeminiError::Api { status, message } => {
            ModelError::Rejected(format!("HTTP {status}: {message}"))
        }
        GeminiError::Network(message) => ModelError::Unavailable(message),
        GeminiError::Parse(message) => ModelError::InvalidResponse(message),
        GeminiError::Config(message) => ModelError::Rejected(message),
    }
}
