//! OpenAI-compatible chat completions backend.
//!
//! Talks to any endpoint exposing the `/chat/completions` shape (OpenAI,
//! Azure OpenAI, vLLM, LM Studio). Retries transient failures with
//! exponential backoff and reports token usage and latency on every
//! successful completion.

use crate::{Completion, CompletionContent, CompletionError, CompletionService};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Default request timeout (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default number of attempts before giving up
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Chat completions client for OpenAI-compatible APIs.
pub struct HttpCompletionService {
    base_url: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
    max_attempts: u32,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<Usage>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize, Default)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

impl HttpCompletionService {
    /// Create a client for `base_url` (e.g. `https://api.openai.com/v1`)
    /// using `model`.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            base_url: base_url.into(),
            api_key: None,
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            client,
        }
    }

    /// Attach a bearer token.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Override the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Override the attempt limit.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    async fn send_once(
        &self,
        request: &ChatRequest,
    ) -> Result<(ChatResponse, u64), CompletionError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let started = Instant::now();

        let mut builder = self.client.post(&url).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| CompletionError::Communication(format!("request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CompletionError::ModelNotAvailable(self.model.clone()));
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(CompletionError::Communication(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let parsed = response
            .json::<ChatResponse>()
            .await
            .map_err(|e| CompletionError::InvalidResponse(format!("bad body: {}", e)))?;

        Ok((parsed, started.elapsed().as_millis() as u64))
    }
}

#[async_trait]
impl CompletionService for HttpCompletionService {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        want_json: bool,
    ) -> Result<Completion, CompletionError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt.to_string(),
                },
            ],
            temperature: self.temperature,
            response_format: want_json.then_some(ResponseFormat { kind: "json_object" }),
        };

        let mut last_error = String::new();
        for attempt in 0..self.max_attempts {
            if attempt > 0 {
                // 1s, 2s, 4s, ...
                let delay = Duration::from_secs(2u64.pow(attempt - 1));
                tokio::time::sleep(delay).await;
            }

            match self.send_once(&request).await {
                Ok((parsed, latency_ms)) => {
                    let text = parsed
                        .choices
                        .into_iter()
                        .next()
                        .and_then(|c| c.message.content)
                        .ok_or_else(|| {
                            CompletionError::InvalidResponse("no choices in response".to_string())
                        })?;

                    let usage = parsed.usage.unwrap_or_default();
                    debug!(
                        model = %self.model,
                        input_tokens = usage.prompt_tokens,
                        output_tokens = usage.completion_tokens,
                        latency_ms,
                        "completion succeeded"
                    );

                    let content = if want_json {
                        match crate::parse_json_lenient(&text) {
                            Ok(v) => CompletionContent::Json(v),
                            Err(e) => {
                                warn!(error = %e, "requested JSON but response did not parse, returning text");
                                CompletionContent::Text(text)
                            }
                        }
                    } else {
                        CompletionContent::Text(text)
                    };

                    return Ok(Completion {
                        content,
                        model: parsed.model.unwrap_or_else(|| self.model.clone()),
                        input_tokens: usage.prompt_tokens,
                        output_tokens: usage.completion_tokens,
                        latency_ms,
                    });
                }
                // Model-not-found never resolves by retrying.
                Err(e @ CompletionError::ModelNotAvailable(_)) => return Err(e),
                Err(e) => {
                    warn!(attempt = attempt + 1, error = %e, "completion attempt failed");
                    last_error = e.to_string();
                }
            }
        }

        Err(CompletionError::RetriesExhausted {
            attempts: self.max_attempts,
            last_error,
        })
    }
}
