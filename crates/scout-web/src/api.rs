//! REST API endpoint handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use scout_rs::report::Report;
use scout_rs::session::{ResearchPipeline, SessionError};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Shared application state passed to all handlers via axum's `State`
/// extractor.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ResearchPipeline>,
}

/// Error payload returned alongside a non-2xx status.
#[derive(Serialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            error: message.into(),
        })
    }
}

/// Request body for POST /api/research.
#[derive(Deserialize)]
pub struct ResearchRequest {
    pub query: String,
}

/// POST /api/research — Run one research session.
///
/// Returns the assembled report as JSON. Adapter failures are carried
/// inside the report; only configuration and reasoning failures map to
/// error statuses (422 empty query, 503 misconfiguration, 502 reasoning
/// failure).
pub async fn post_research(
    State(app): State<AppState>,
    Json(body): Json<ResearchRequest>,
) -> Result<Json<Report>, (StatusCode, Json<ApiError>)> {
    let query = body.query.trim();
    if query.is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::new("query must not be empty"),
        ));
    }

    info!("research request: {query}");
    match app.pipeline.run(query).await {
        Ok(report) => Ok(Json(report)),
        Err(e @ SessionError::Configuration(_)) => {
            Err((StatusCode::SERVICE_UNAVAILABLE, ApiError::new(e.to_string())))
        }
        Err(e @ SessionError::Reasoning(_)) => {
            Err((StatusCode::BAD_GATEWAY, ApiError::new(e.to_string())))
        }
    }
}

/// Adapter inventory returned by GET /api/adapters.
#[derive(Serialize)]
pub struct AdaptersResponse {
    pub adapters: Vec<&'static str>,
}

/// GET /api/adapters — List the enabled adapter ids.
pub async fn get_adapters(State(app): State<AppState>) -> Json<AdaptersResponse> {
    Json(AdaptersResponse {
        adapters: app.pipeline.enabled_adapters(),
    })
}

/// GET /api/health — Liveness probe.
pub async fn get_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn research_request_deserializes() {
        let req: ResearchRequest =
            serde_json::from_str(r#"{"query":"weather in Paris"}"#).unwrap();
        assert_eq!(req.query, "weather in Paris");
    }

    #[test]
    fn api_error_serializes() {
        let json = serde_json::to_value(ApiError {
            error: "nope".into(),
        })
        .unwrap();
        assert_eq!(json["error"], "nope");
    }
}
