//! HTTP front end for `scout-rs` research sessions.
//!
//! Wraps a [`ResearchPipeline`](scout_rs::session::ResearchPipeline) in a
//! small axum server:
//!
//! - `POST /api/research` with `{"query": "..."}` runs a session and
//!   returns the report as JSON
//! - `GET /api/adapters` lists the enabled adapter ids
//! - `GET /api/health` is a liveness probe
//!
//! An optional static directory is served as a fallback for a browser
//! front end.

pub mod api;
pub mod server;

pub use api::AppState;
pub use server::{build_router, start_server};
