//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the summarization
//! library without making real model or network calls.

use std::collections::VecDeque;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::ModelError;
use crate::traits::model::GenerativeModel;

/// A mock generative model for testing.
///
/// Returns a configurable response, optionally after a scripted sequence of
/// failures, and records every call for assertions.
#[derive(Clone, Default)]
pub struct MockModel {
    /// Fixed response text; when unset, a deterministic default is generated
    response: Arc<RwLock<Option<String>>>,

    /// Errors returned in order before any success
    script: Arc<RwLock<VecDeque<ModelError>>>,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<MockModelCall>>>,
}

/// Record of a call made to the mock model.
#[derive(Debug, Clone)]
pub struct MockModelCall {
    pub document_len: usize,
    pub mime_type: String,
    pub prompt: String,
}

impl MockModel {
    /// Create a new mock model with default behavior.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the response returned once the failure script is exhausted.
    pub fn with_response(self, text: impl Into<String>) -> Self {
        *self.response.write().unwrap() = Some(text.into());
        self
    }

    /// Queue errors to return, in order, before any success.
    pub fn with_failures(self, errors: Vec<ModelError>) -> Self {
        self.script.write().unwrap().extend(errors);
        self
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<MockModelCall> {
        self.calls.read().unwrap().clone()
    }

    /// Number of calls made to this mock.
    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

#[async_trait]
impl GenerativeModel for MockModel {
    async fn generate(
        &self,
        document: &[u8],
        mime_type: &str,
        prompt: &str,
    ) -> Result<String, ModelError> {
        self.calls.write().unwrap().push(MockModelCall {
            document_len: document.len(),
            mime_type: mime_type.to_string(),
            prompt: prompt.to_string(),
        });

        if let Some(error) = self.script.write().unwrap().pop_front() {
            return Err(error);
        }

        Ok(self
            .response
            .read()
            .unwrap()
            .clone()
            .unwrap_or_else(|| format!("Summary of {} byte document.", document.len())))
    }
}
