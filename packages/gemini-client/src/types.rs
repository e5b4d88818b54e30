//! Gemini API request and response types.

use serde::{Deserialize, Serialize};

// =============================================================================
// Content generation request
// =============================================================================

/// Content generation request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation turns; a single user turn for one-shot prompts.
    pub contents: Vec<Content>,

    /// Sampling and length settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// Create a single-turn user request from a list of parts.
    pub fn from_parts(parts: Vec<Part>) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
            generation_config: None,
        }
    }

    /// Set the generation configuration.
    pub fn generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }
}

/// One conversation turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// "user" or "model"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Turn payload: text and/or inline binary data
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// One part of a turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// Plain text content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Inline binary content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    /// Create a plain text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    /// Create an inline binary part; bytes are base64-encoded here.
    pub fn inline_data(mime_type: impl Into<String>, data: &[u8]) -> Self {
        use base64::Engine;
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: base64::engine::general_purpose::STANDARD.encode(data),
            }),
        }
    }
}

/// Inline binary payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// IANA mime type, e.g. "application/pdf"
    pub mime_type: String,

    /// Base64-encoded bytes
    pub data: String,
}

/// Generation settings.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Sampling temperature (0.0 to 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Maximum tokens in the generated output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

// =============================================================================
// Content generation response
// =============================================================================

/// Content generation response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Generated candidates, usually exactly one
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Text of the first candidate's first text part, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .find_map(|p| p.text.as_deref())
    }
}

/// One generated candidate.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated turn content; absent when generation was blocked
    pub content: Option<Content>,

    /// Why generation stopped ("STOP", "MAX_TOKENS", "SAFETY", ...)
    pub finish_reason: Option<String>,
}

// =============================================================================
// Error envelope
// =============================================================================

/// Error body returned with non-2xx statuses (for internal parsing).
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = GenerateContentRequest::from_parts(vec![
            Part::inline_data("application/pdf", b"%PDF-1.4"),
            Part::text("Summarize this document."),
        ])
        .generation_config(GenerationConfig {
            temperature: Some(0.0),
            max_output_tokens: Some(4096),
        });

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(
            value["contents"][0]["parts"][0]["inlineData"]["mimeType"],
            "application/pdf"
        );
        assert!(value["contents"][0]["parts"][0]["inlineData"]["data"].is_string());
        assert_eq!(
            value["contents"][0]["parts"][1]["text"],
            "Summarize this document."
        );
        assert_eq!(value["generationConfig"]["temperature"], 0.0);
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 4096);

        // Unset optional fields stay out of the wire format entirely.
        assert!(value["contents"][0]["parts"][0].get("text").is_none());
        assert!(value["contents"][0]["parts"][1].get("inlineData").is_none());
    }

    #[test]
    fn test_response_first_text() {
        let json = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "A summary."}]},
                "finishReason": "STOP"
            }]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.first_text(), Some("A summary."));
    }

    #[test]
    fn test_response_without_candidates() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.first_text(), None);
    }

    #[test]
    fn test_blocked_candidate_has_no_text() {
        let json = r#"{"candidates": [{"finishReason": "SAFETY"}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.first_text(), None);
    }
}
