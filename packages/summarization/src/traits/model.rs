//! Generative model abstraction.

use async_trait::async_trait;

use crate::error::ModelError;

/// A hosted generative model that can summarize a document.
///
/// Implementations wrap one provider's API. The pipeline treats the call as
/// an opaque fallible remote operation; failures come back as [`ModelError`]
/// variants the retry policy knows how to classify.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Generate text from an inline document plus a prompt.
    async fn generate(
        &self,
        document: &[u8],
        mime_type: &str,
        prompt: &str,
    ) -> Result<String, ModelError>;
}
