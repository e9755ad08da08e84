//! Model-client boundary.
//!
//! The language-model client is an external collaborator: it owns prompt
//! construction, HTTP, retries, and timeouts. The engine only needs
//! "document text in, response text out", which is what this trait pins
//! down. `MockModelClient` serves tests and offline development.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Trait for model backends that turn exam documents into question JSON.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Human-readable client name (e.g. "anthropic").
    fn name(&self) -> &str;

    /// Run one extraction request, returning the raw response text.
    async fn complete(&self, request: &ExtractionRequest) -> anyhow::Result<ModelResponse>;
}

/// One exam document to extract questions from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionRequest {
    /// Full extracted text of the exam document.
    pub document_text: String,
    /// Display name for diagnostics (e.g. the upload filename).
    pub document_name: String,
    /// Maximum tokens the model may generate.
    pub max_tokens: u32,
}

/// Raw response from a model client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelResponse {
    /// The raw response text, fences and prose included.
    pub content: String,
    /// Model that actually produced the response.
    pub model: String,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

/// A mock model client for testing the pipeline without real API calls.
///
/// Returns configurable responses based on document-text substring matching.
pub struct MockModelClient {
    /// Map of document-text substring → response.
    responses: HashMap<String, String>,
    /// Default response if no substring matches.
    default_response: String,
    call_count: AtomicU32,
    last_request: Mutex<Option<ExtractionRequest>>,
}

impl MockModelClient {
    pub fn new(responses: HashMap<String, String>) -> Self {
        Self {
            responses,
            default_response: r#"{"questions": []}"#.to_string(),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Create a mock that always returns the same response.
    pub fn with_fixed_response(response: &str) -> Self {
        Self {
            responses: HashMap::new(),
            default_response: response.to_string(),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn last_request(&self) -> Option<ExtractionRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelClient for MockModelClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &ExtractionRequest) -> anyhow::Result<ModelResponse> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_request.lock().unwrap() = Some(request.clone());

        let content = self
            .responses
            .iter()
            .find(|(key, _)| request.document_text.contains(key.as_str()))
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| self.default_response.clone());

        Ok(ModelResponse {
            content,
            model: "mock-model".to_string(),
            latency_ms: 1,
        })
    }
}
