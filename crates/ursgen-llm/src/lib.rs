//! ursgen Completion Service Layer
//!
//! Pluggable chat-completion backends behind a single async trait.
//!
//! # Architecture
//!
//! Every pipeline stage that talks to a language model does so through
//! [`CompletionService`]. The trait takes a system prompt and a user prompt
//! and returns a [`Completion`] carrying the content plus telemetry (model
//! name, token counts, latency). Callers that want JSON ask for it; a
//! response that fails to parse as JSON comes back as text with a warning,
//! and the calling stage decides how to degrade.
//!
//! # Backends
//!
//! - [`MockService`]: deterministic mock for testing
//! - [`HttpCompletionService`]: any OpenAI-compatible chat completions API
//!
//! # Examples
//!
//! ```
//! use ursgen_llm::{CompletionContent, CompletionService, MockService};
//!
//! # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # rt.block_on(async {
//! let svc = MockService::new("Hello!");
//! let completion = svc.complete("system", "user prompt", false).await.unwrap();
//! assert!(matches!(completion.content, CompletionContent::Text(_)));
//! # });
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod http;

use async_trait::async_trait;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use http::HttpCompletionService;

/// Errors that can occur during completion requests
#[derive(Error, Debug)]
pub enum CompletionError {
    /// Network or API communication error
    #[error("communication error: {0}")]
    Communication(String),

    /// The backend answered but the body was unusable
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// All retry attempts exhausted
    #[error("exhausted {attempts} attempts: {last_error}")]
    RetriesExhausted {
        /// How many attempts were made
        attempts: u32,
        /// The error from the final attempt
        last_error: String,
    },

    /// The configured model is not available
    #[error("model not available: {0}")]
    ModelNotAvailable(String),
}

/// Completion payload, text or parsed JSON
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionContent {
    /// Raw text content
    Text(String),
    /// Content that parsed as JSON (only when JSON was requested)
    Json(Value),
}

impl CompletionContent {
    /// The underlying text, re-serializing JSON when needed.
    pub fn as_text(&self) -> String {
        match self {
            CompletionContent::Text(s) => s.clone(),
            CompletionContent::Json(v) => v.to_string(),
        }
    }

    /// The parsed JSON value, if this is JSON content.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            CompletionContent::Json(v) => Some(v),
            CompletionContent::Text(_) => None,
        }
    }
}

/// A completion with telemetry attached
#[derive(Debug, Clone)]
pub struct Completion {
    /// Response content
    pub content: CompletionContent,
    /// Model that produced the response
    pub model: String,
    /// Prompt tokens consumed
    pub input_tokens: u64,
    /// Completion tokens produced
    pub output_tokens: u64,
    /// Wall-clock request latency in milliseconds
    pub latency_ms: u64,
}

/// Telemetry snapshot of one completion, content reduced to hashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionStats {
    /// Model that produced the response
    pub model: String,
    /// Prompt tokens consumed
    pub input_tokens: u64,
    /// Completion tokens produced
    pub output_tokens: u64,
    /// Wall-clock request latency in milliseconds
    pub latency_ms: u64,
    /// 16-hex-char SHA-256 prefix of the user prompt
    pub request_hash: String,
    /// 16-hex-char SHA-256 prefix of the response content
    pub response_hash: String,
}

impl Completion {
    /// Telemetry for audit trails. Prompt and response text never leave
    /// this call; only their digests do.
    pub fn stats(&self, user_prompt: &str) -> CompletionStats {
        CompletionStats {
            model: self.model.clone(),
            input_tokens: self.input_tokens,
            output_tokens: self.output_tokens,
            latency_ms: self.latency_ms,
            request_hash: payload_hash(user_prompt),
            response_hash: payload_hash(&self.content.as_text()),
        }
    }
}

/// 16-hex-char SHA-256 prefix of a payload, for the audit trail.
pub fn payload_hash(payload: &str) -> String {
    let digest = Sha256::digest(payload.as_bytes());
    let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
    hex[..16].to_string()
}

/// Cumulative token usage across completions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UsageTotals {
    /// Completions recorded
    pub calls: u64,
    /// Total prompt tokens
    pub input_tokens: u64,
    /// Total completion tokens
    pub output_tokens: u64,
}

impl UsageTotals {
    /// Fold one completion into the totals.
    pub fn record(&mut self, completion: &Completion) {
        self.calls += 1;
        self.input_tokens += completion.input_tokens;
        self.output_tokens += completion.output_tokens;
    }
}

/// Async chat-completion backend.
///
/// `want_json` is a request, not a guarantee: when the body does not parse
/// as JSON the service logs a warning and returns
/// [`CompletionContent::Text`]. Stages fail closed on their own terms.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Run one chat completion.
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        want_json: bool,
    ) -> Result<Completion, CompletionError>;
}

/// Deterministic completion service for testing.
///
/// Responses are keyed by a substring of the user prompt; the first
/// matching key wins, otherwise the default response is returned. Error
/// injection and call counting work the same way.
#[derive(Debug, Clone)]
pub struct MockService {
    default_response: String,
    responses: Arc<Mutex<Vec<(String, String)>>>,
    errors: Arc<Mutex<Vec<String>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockService {
    /// Create a mock that returns `response` for every prompt.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(Vec::new())),
            errors: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Return `response` whenever the user prompt contains `needle`.
    pub fn add_response(&mut self, needle: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .push((needle.into(), response.into()));
    }

    /// Fail with a communication error whenever the user prompt contains
    /// `needle`.
    pub fn add_error(&mut self, needle: impl Into<String>) {
        self.errors.lock().unwrap().push(needle.into());
    }

    /// Number of completions requested so far.
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new("{}")
    }
}

#[async_trait]
impl CompletionService for MockService {
    async fn complete(
        &self,
        _system_prompt: &str,
        user_prompt: &str,
        want_json: bool,
    ) -> Result<Completion, CompletionError> {
        *self.call_count.lock().unwrap() += 1;

        if let Some(needle) = self
            .errors
            .lock()
            .unwrap()
            .iter()
            .find(|n| user_prompt.contains(n.as_str()))
        {
            return Err(CompletionError::Communication(format!(
                "mock error triggered by '{}'",
                needle
            )));
        }

        let body = self
            .responses
            .lock()
            .unwrap()
            .iter()
            .find(|(needle, _)| user_prompt.contains(needle.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| self.default_response.clone());

        let content = if want_json {
            match serde_json::from_str::<Value>(&body) {
                Ok(v) => CompletionContent::Json(v),
                Err(_) => CompletionContent::Text(body),
            }
        } else {
            CompletionContent::Text(body)
        };

        Ok(Completion {
            content,
            model: "mock".to_string(),
            input_tokens: 0,
            output_tokens: 0,
            latency_ms: 0,
        })
    }
}

/// Strip a markdown code fence from model output, if present.
///
/// Models asked for JSON often wrap it in ```json ... ``` fences. This
/// returns the inner text unchanged when no fence is found.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip the language tag on the opening fence line.
    let rest = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest,
    };
    rest.strip_suffix("```").map(str::trim).unwrap_or(trimmed)
}

/// Parse model output as JSON, tolerating markdown fences.
pub fn parse_json_lenient(raw: &str) -> Result<Value, CompletionError> {
    let cleaned = strip_code_fence(raw);
    serde_json::from_str(cleaned)
        .map_err(|e| CompletionError::InvalidResponse(format!("not valid JSON: {}", e)))
}
