//! Integration tests for the scout-web server.
//!
//! These tests start a real axum server on a random port with stubbed
//! adapters and a stubbed reasoner, then exercise the REST endpoints.

use std::sync::Arc;

use scout_rs::adapters::{Adapter, AdapterSet, FetchFuture, FetchOptions};
use scout_rs::reasoning::{AnswerFuture, Reasoner};
use scout_rs::{Snippet, ToolResult};
use scout_web::{build_router, start_server};

struct StubAdapter;

impl Adapter for StubAdapter {
    fn id(&self) -> &'static str {
        "wikipedia"
    }

    fn fetch(&self, _query: &str, _opts: FetchOptions) -> FetchFuture<'_> {
        Box::pin(async {
            ToolResult::success(
                "wikipedia",
                vec![Snippet::with_url(
                    "Transistor: a semiconductor device",
                    "https://en.wikipedia.org/wiki/Transistor",
                )],
            )
        })
    }
}

struct StubReasoner;

impl Reasoner for StubReasoner {
    fn answer<'a>(&'a self, query: &'a str, _evidence: &'a [ToolResult]) -> AnswerFuture<'a> {
        Box::pin(async move { Ok(format!("Answer for: {query}")) })
    }
}

/// Helper: spawn a test server on port 0 (random available port).
async fn spawn_test_server() -> String {
    let adapters = AdapterSet::new().with(StubAdapter);
    let pipeline = scout_rs::session::ResearchPipeline::new(adapters, StubReasoner);
    let router = build_router(Arc::new(pipeline), None);
    let addr = start_server(router, ([127, 0, 0, 1], 0).into())
        .await
        .unwrap();
    format!("http://{addr}")
}

#[tokio::test]
async fn health_endpoint_responds() {
    let base = spawn_test_server().await;

    let resp = reqwest::get(format!("{base}/api/health")).await.unwrap();
    assert_eq!(resp.status(), 200);

    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn adapters_endpoint_lists_ids() {
    let base = spawn_test_server().await;

    let resp = reqwest::get(format!("{base}/api/adapters")).await.unwrap();
    assert_eq!(resp.status(), 200);

    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["adapters"], serde_json::json!(["wikipedia"]));
}

#[tokio::test]
async fn research_returns_report_with_citations() {
    let base = spawn_test_server().await;

    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{base}/api/research"))
        .json(&serde_json::json!({"query": "history of the transistor"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["query"], "history of the transistor");
    assert_eq!(json["answer"], "Answer for: history of the transistor");
    assert_eq!(
        json["citations"][0]["url"],
        "https://en.wikipedia.org/wiki/Transistor"
    );
}

#[tokio::test]
async fn empty_query_is_rejected() {
    let base = spawn_test_server().await;

    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{base}/api/research"))
        .json(&serde_json::json!({"query": "   "}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 422);

    let json: serde_json::Value = resp.json().await.unwrap();
    assert!(json["error"].as_str().unwrap().contains("empty"));
}
