//! Research-assistant pipeline: tool adapters, query planning, hosted-model
//! reasoning, and report assembly.
//!
//! `scout-rs` answers a free-text research question by orchestrating a small
//! set of external information providers (web search, Wikipedia, news,
//! weather, page scraping) and a hosted language model. The core abstraction
//! is the [`ResearchPipeline`](session::ResearchPipeline): one call to
//! [`run()`](session::ResearchPipeline::run) plans which adapters to invoke,
//! fetches evidence from each in order, asks the model to compose an answer
//! from the query plus the gathered evidence, and assembles the final
//! [`Report`](report::Report) with citations.
//!
//! # Getting started
//!
//! ```ignore
//! use scout_rs::config::Config;
//! use scout_rs::session::ResearchPipeline;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Credentials come from env vars (OPENROUTER_KEY, BRAVE_SEARCH_KEY,
//!     // NEWSAPI_KEY, OPENWEATHER_KEY). A missing provider key disables
//!     // that adapter; a missing model key is a configuration error.
//!     let config = Config::from_env();
//!     let pipeline = ResearchPipeline::from_config(&config)?;
//!
//!     let report = pipeline.run("weather in Paris").await?;
//!     println!("{}", report.render());
//!     Ok(())
//! }
//! ```
//!
//! # Where to find things
//!
//! - **Tool adapters:** the [`Adapter`](adapters::Adapter) trait,
//!   [`AdapterSet`](adapters::AdapterSet) for dispatch with timeouts, and
//!   one module per provider under [`adapters`]. Adapters never fail with
//!   an `Err` — a provider problem comes back as a [`ToolResult`] with
//!   `ok == false` and a human-readable note.
//! - **Rate limiting:** [`RateLimiter`](adapters::limiter::RateLimiter),
//!   a token bucket with a per-adapter wait-or-fail policy.
//! - **Query planning:** [`planner::plan`] maps a query onto an ordered
//!   [`Plan`](planner::Plan) of adapter invocations from a declarative
//!   intent table.
//! - **Reasoning:** [`ReasoningClient`](reasoning::ReasoningClient) talks to
//!   the OpenRouter chat-completions API with a typed error taxonomy and one
//!   bounded retry on transient failures. The [`Reasoner`](reasoning::Reasoner)
//!   trait is the seam for stubbing the model in tests.
//! - **Reports:** [`report::assemble`] is a pure function from
//!   `(query, evidence, answer)` to a [`Report`](report::Report);
//!   [`Report::append_to_log`](report::Report::append_to_log) exports a
//!   timestamped rendering to a file.
//! - **The whole loop:** [`session::ResearchPipeline`].

pub mod adapters;
pub mod config;
pub mod planner;
pub mod reasoning;
pub mod report;
pub mod session;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Constants ──────────────────────────────────────────────────────

/// Hosted-model chat completions endpoint.
pub const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default model for reasoning calls.
pub const DEFAULT_MODEL: &str = "anthropic/claude-sonnet-4";

// ── Evidence data model ────────────────────────────────────────────

/// One piece of evidence: a text excerpt and, when the provider supplies
/// one, the URL it came from.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Snippet {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Snippet {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: None,
        }
    }

    pub fn with_url(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: Some(url.into()),
        }
    }
}

/// The normalized outcome of one adapter fetch. Immutable once produced.
///
/// Provider-side problems (timeouts, quota, malformed payloads) are not
/// errors: they come back as a `ToolResult` with `ok == false` and a
/// non-empty `note` explaining what went wrong, so one failed provider
/// never aborts the rest of a session.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ToolResult {
    /// Adapter identifier (e.g. `"web_search"`, `"weather"`).
    pub source: String,
    /// Evidence snippets in provider order. Empty on failure.
    pub snippets: Vec<Snippet>,
    /// When the fetch completed.
    pub fetched_at: DateTime<Utc>,
    /// Whether the provider call succeeded.
    pub ok: bool,
    /// Human-readable failure note. Always present and non-empty when
    /// `ok == false`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ToolResult {
    /// A successful fetch with the given snippets.
    pub fn success(source: impl Into<String>, snippets: Vec<Snippet>) -> Self {
        Self {
            source: source.into(),
            snippets,
            fetched_at: Utc::now(),
            ok: true,
            note: None,
        }
    }

    /// A failed fetch with a human-readable note.
    ///
    /// An empty note is replaced with a generic one so the report can
    /// always explain why a source is missing.
    pub fn failure(source: impl Into<String>, note: impl Into<String>) -> Self {
        let note = note.into();
        let note = if note.trim().is_empty() {
            "provider call failed (no detail available)".to_string()
        } else {
            note
        };
        Self {
            source: source.into(),
            snippets: Vec::new(),
            fetched_at: Utc::now(),
            ok: false,
            note: Some(note),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_has_no_note() {
        let r = ToolResult::success("web_search", vec![Snippet::new("hit")]);
        assert!(r.ok);
        assert!(r.note.is_none());
        assert_eq!(r.snippets.len(), 1);
    }

    #[test]
    fn failure_carries_note() {
        let r = ToolResult::failure("news", "HTTP 429: rate limited");
        assert!(!r.ok);
        assert!(r.snippets.is_empty());
        assert_eq!(r.note.as_deref(), Some("HTTP 429: rate limited"));
    }

    #[test]
    fn empty_failure_note_is_replaced() {
        let r = ToolResult::failure("news", "  ");
        assert!(!r.note.unwrap().trim().is_empty());
    }

    #[test]
    fn snippet_url_skipped_in_json_when_absent() {
        let json = serde_json::to_value(Snippet::new("plain")).unwrap();
        assert!(json.get("url").is_none());

        let json = serde_json::to_value(Snippet::with_url("t", "https://x.y")).unwrap();
        assert_eq!(json["url"], "https://x.y");
    }
}
