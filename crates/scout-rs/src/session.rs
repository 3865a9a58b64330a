//! The research session pipeline: plan, gather, reason, assemble.
//!
//! One query flows through four stages. The planner decides which adapters
//! to invoke; each invocation runs sequentially and appends its
//! [`ToolResult`] to the append-only evidence list (failures included);
//! the reasoner composes an answer from the full evidence; the assembler
//! folds everything into a [`Report`]. Adapter failures are absorbed as
//! evidence, reasoning failures are fatal to the session.

use crate::adapters::{AdapterSet, FetchOptions};
use crate::config::Config;
use crate::planner;
use crate::reasoning::{Reasoner, ReasoningError};
use crate::report::{self, Report};
use crate::ToolResult;
use thiserror::Error;
use tracing::{debug, info};

/// Fatal session failures. Adapter failures never appear here; they are
/// carried in the report instead.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The pipeline cannot be assembled from the configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// The reasoning call failed after retries.
    #[error(transparent)]
    Reasoning(#[from] ReasoningError),
}

/// One query's gathered evidence, ordered by fetch time. Append-only while
/// the session runs; discarded once the report is assembled.
#[derive(Clone, Debug)]
pub struct ResearchSession {
    pub query: String,
    pub results: Vec<ToolResult>,
}

impl ResearchSession {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            results: Vec::new(),
        }
    }

    /// Record one fetch outcome, success or failure.
    pub fn record(&mut self, result: ToolResult) {
        self.results.push(result);
    }
}

/// A configured pipeline, reusable across queries.
pub struct ResearchPipeline {
    adapters: AdapterSet,
    reasoner: Box<dyn Reasoner>,
}

impl std::fmt::Debug for ResearchPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResearchPipeline").finish_non_exhaustive()
    }
}

impl ResearchPipeline {
    /// Build a pipeline from an adapter set and a reasoner.
    pub fn new(adapters: AdapterSet, reasoner: impl Reasoner + 'static) -> Self {
        Self {
            adapters,
            reasoner: Box::new(reasoner),
        }
    }

    /// Build a pipeline from runtime configuration.
    ///
    /// Fails if no model credential is configured; missing provider keys
    /// just shrink the adapter set.
    pub fn from_config(config: &Config) -> Result<Self, SessionError> {
        let reasoner = config.build_reasoner().ok_or_else(|| {
            SessionError::Configuration(
                "OPENROUTER_KEY is not set; cannot run a research session".to_string(),
            )
        })?;
        Ok(Self {
            adapters: config.build_adapter_set(),
            reasoner: Box::new(reasoner),
        })
    }

    /// Adapter ids available to the planner, sorted.
    pub fn enabled_adapters(&self) -> Vec<&'static str> {
        self.adapters.ids()
    }

    /// Run one research session end to end.
    pub async fn run(&self, query: &str) -> Result<Report, SessionError> {
        let query = query.trim();
        let enabled = self.adapters.ids();
        let plan = planner::plan(query, &enabled);

        if plan.is_reasoning_only() {
            info!("no adapters planned; answering from reasoning alone");
        } else {
            info!(
                "planned {} invocation(s): {}",
                plan.invocations.len(),
                plan.invocations
                    .iter()
                    .map(|i| i.adapter)
                    .collect::<Vec<_>>()
                    .join(", "),
            );
        }

        let mut session = ResearchSession::new(query);
        for invocation in &plan.invocations {
            let result = self
                .adapters
                .fetch(invocation.adapter, &invocation.argument, FetchOptions::default())
                .await;
            debug!(
                "evidence from {}: ok={}, {} snippet(s)",
                result.source,
                result.ok,
                result.snippets.len(),
            );
            session.record(result);
        }

        let answer = self.reasoner.answer(query, &session.results).await?;
        Ok(report::assemble(query, &session.results, &answer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{Adapter, FetchFuture};
    use crate::reasoning::AnswerFuture;
    use crate::Snippet;

    struct StubAdapter {
        id: &'static str,
        result: fn(&'static str) -> ToolResult,
    }

    impl Adapter for StubAdapter {
        fn id(&self) -> &'static str {
            self.id
        }

        fn fetch(&self, _query: &str, _opts: FetchOptions) -> FetchFuture<'_> {
            let result = (self.result)(self.id);
            Box::pin(async move { result })
        }
    }

    fn ok_weather(id: &'static str) -> ToolResult {
        ToolResult::success(
            id,
            vec![Snippet::with_url(
                "Paris: 18°C, scattered clouds",
                "https://openweathermap.org/city/2988507",
            )],
        )
    }

    fn failing(id: &'static str) -> ToolResult {
        ToolResult::failure(id, "HTTP 503")
    }

    /// Echoes the evidence back so assertions can see what the reasoner saw.
    struct StubReasoner;

    impl Reasoner for StubReasoner {
        fn answer<'a>(&'a self, _query: &'a str, evidence: &'a [ToolResult]) -> AnswerFuture<'a> {
            Box::pin(async move {
                let texts: Vec<&str> = evidence
                    .iter()
                    .filter(|r| r.ok)
                    .flat_map(|r| r.snippets.iter().map(|s| s.text.as_str()))
                    .collect();
                if texts.is_empty() {
                    Ok("No evidence was available.".to_string())
                } else {
                    Ok(texts.join(" / "))
                }
            })
        }
    }

    struct FailingReasoner;

    impl Reasoner for FailingReasoner {
        fn answer<'a>(&'a self, _query: &'a str, _evidence: &'a [ToolResult]) -> AnswerFuture<'a> {
            Box::pin(async { Err(ReasoningError::Auth("invalid key".to_string())) })
        }
    }

    #[tokio::test]
    async fn weather_query_yields_cited_report() {
        let adapters = AdapterSet::new().with(StubAdapter {
            id: "weather",
            result: ok_weather,
        });
        let pipeline = ResearchPipeline::new(adapters, StubReasoner);

        let report = pipeline.run("weather in Paris").await.unwrap();
        assert!(report.answer.contains("18°C"));
        assert_eq!(report.citations.len(), 1);
        assert_eq!(report.citations[0].source, "weather");
        assert!(report.missing_sources.is_empty());
    }

    #[tokio::test]
    async fn adapter_failures_are_absorbed_not_fatal() {
        let adapters = AdapterSet::new()
            .with(StubAdapter {
                id: "wikipedia",
                result: failing,
            })
            .with(StubAdapter {
                id: "web_search",
                result: failing,
            });
        let pipeline = ResearchPipeline::new(adapters, StubReasoner);

        let report = pipeline.run("history of the transistor").await.unwrap();
        assert!(!report.answer.is_empty());
        assert!(report.citations.is_empty());
        assert_eq!(report.missing_sources.len(), 2);
    }

    #[tokio::test]
    async fn reasoning_failure_is_fatal() {
        let pipeline = ResearchPipeline::new(AdapterSet::new(), FailingReasoner);
        let err = pipeline.run("anything interesting").await.unwrap_err();
        assert!(matches!(err, SessionError::Reasoning(_)));
    }

    #[tokio::test]
    async fn reasoning_only_query_still_reports() {
        let pipeline = ResearchPipeline::new(AdapterSet::new(), StubReasoner);
        let report = pipeline.run("hi").await.unwrap();
        assert_eq!(report.answer, "No evidence was available.");
        assert!(report.citations.is_empty());
    }

    #[test]
    fn missing_model_key_is_a_configuration_error() {
        let config = Config::default();
        let err = ResearchPipeline::from_config(&config).unwrap_err();
        assert!(matches!(err, SessionError::Configuration(_)));
    }
}
