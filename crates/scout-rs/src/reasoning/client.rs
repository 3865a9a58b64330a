//! Hosted-model client for the OpenRouter chat completions API.
//!
//! One call: [`ReasoningClient::answer`] packages the query plus gathered
//! evidence into a single prompt, sends it, and returns the model's text
//! trimmed of surrounding whitespace but otherwise unmodified. Failures
//! surface as distinct [`ReasoningError`] variants — never silently
//! swallowed, since the answer is the user-visible artifact.

use crate::reasoning::prompt::{SYSTEM_PROMPT, build_user_prompt};
use crate::reasoning::retry::RetryConfig;
use crate::reasoning::{AnswerFuture, Reasoner};
use crate::{OPENROUTER_URL, ToolResult};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

/// Why a reasoning call failed. Each variant is surfaced verbatim to the
/// caller; only transient variants are retried.
#[derive(Debug, Error)]
pub enum ReasoningError {
    /// No model credential configured.
    #[error("model API key is not configured (set OPENROUTER_KEY)")]
    MissingKey,
    /// The provider rejected the credential.
    #[error("model API rejected the credential: {0}")]
    Auth(String),
    /// Transport-level failure (connect, DNS, timeout).
    #[error("model request failed: {0}")]
    Network(String),
    /// Non-success HTTP status outside the auth family.
    #[error("model API HTTP {status}: {body}")]
    Http { status: u16, body: String },
    /// Response arrived but could not be used (undecodable, provider error
    /// payload, or no text content).
    #[error("model response unusable: {0}")]
    Malformed(String),
}

impl ReasoningError {
    /// Whether retrying could plausibly help.
    pub fn is_transient(&self) -> bool {
        match self {
            ReasoningError::Network(_) => true,
            ReasoningError::Http { status, .. } => {
                *status == 429 || (500..=599).contains(status)
            }
            _ => false,
        }
    }
}

// ── Wire types ─────────────────────────────────────────────────────

#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize, Debug)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize, Debug)]
struct RawChatResponse {
    choices: Option<Vec<RawChoice>>,
    error: Option<ApiErrorBody>,
    #[serde(default)]
    usage: Option<UsageInfo>,
}

#[derive(Deserialize, Debug)]
struct RawChoice {
    message: RawMessage,
}

#[derive(Deserialize, Debug)]
struct RawMessage {
    content: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ApiErrorBody {
    message: String,
}

#[derive(Deserialize, Debug)]
struct UsageInfo {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
}

// ── Client ─────────────────────────────────────────────────────────

/// Async client for the hosted reasoning model.
pub struct ReasoningClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    retry: RetryConfig,
}

impl ReasoningClient {
    /// Create a client with the given API key and default tuning.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: crate::DEFAULT_MODEL.to_string(),
            max_tokens: 1024,
            temperature: 0.7,
            retry: RetryConfig::default(),
        }
    }

    /// Set the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the response token budget.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Override the retry policy.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Compose an answer from the query and gathered evidence.
    ///
    /// Transient failures get up to `retry.max_retries` retries with
    /// backoff; everything else is returned on the first failure.
    pub async fn answer(
        &self,
        query: &str,
        evidence: &[ToolResult],
    ) -> Result<String, ReasoningError> {
        let user_prompt = build_user_prompt(query, evidence);

        let mut attempt = 0;
        loop {
            match self.chat_once(&user_prompt).await {
                Ok(text) => return Ok(normalize_whitespace(&text)),
                Err(e) if e.is_transient() && attempt < self.retry.max_retries => {
                    let delay = self.retry.delay_for_attempt(attempt);
                    warn!(
                        "reasoning call failed ({e}); retrying in {:.1}s",
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn chat_once(&self, user_prompt: &str) -> Result<String, ReasoningError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        debug!(
            "reasoning request: model={}, prompt={} bytes, max_tokens={}",
            self.model,
            user_prompt.len(),
            self.max_tokens,
        );
        let start = Instant::now();

        let resp = self
            .client
            .post(OPENROUTER_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("HTTP-Referer", "https://github.com/scout-rs/scout")
            .header("X-Title", "scout")
            .timeout(Duration::from_secs(120))
            .json(&body)
            .send()
            .await
            .map_err(|e| ReasoningError::Network(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ReasoningError::Network(format!("failed to read response: {e}")))?;

        debug!(
            "reasoning response: HTTP {status} in {:.1}s ({} bytes)",
            start.elapsed().as_secs_f64(),
            text.len()
        );

        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(ReasoningError::Auth(text));
        }
        if !status.is_success() {
            return Err(ReasoningError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: RawChatResponse = serde_json::from_str(&text)
            .map_err(|e| ReasoningError::Malformed(format!("undecodable payload: {e}")))?;

        if let Some(err) = parsed.error {
            return Err(ReasoningError::Malformed(format!(
                "provider error: {}",
                err.message
            )));
        }

        if let Some(usage) = &parsed.usage {
            debug!(
                "token usage: prompt={}, completion={}",
                usage.prompt_tokens.unwrap_or(0),
                usage.completion_tokens.unwrap_or(0),
            );
        }

        parsed
            .choices
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| ReasoningError::Malformed("no text content in response".to_string()))
    }
}

impl Reasoner for ReasoningClient {
    fn answer<'a>(&'a self, query: &'a str, evidence: &'a [ToolResult]) -> AnswerFuture<'a> {
        Box::pin(self.answer(query, evidence))
    }
}

/// Normalize line endings and trim surrounding whitespace; the answer is
/// otherwise passed through unmodified.
fn normalize_whitespace(text: &str) -> String {
    text.replace("\r\n", "\n").trim().to_string()
}
