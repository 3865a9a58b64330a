//! Reasoning layer: turn a query plus gathered evidence into a final answer.
//!
//! [`ReasoningClient`] talks to the hosted model; the [`Reasoner`] trait is
//! the seam the pipeline depends on, so tests can substitute a stub that
//! never touches the network.

pub mod client;
pub mod prompt;
pub mod retry;

pub use client::{ReasoningClient, ReasoningError};
pub use retry::RetryConfig;

use crate::ToolResult;
use std::future::Future;
use std::pin::Pin;

/// Future type returned by [`Reasoner::answer`], boxed so the trait stays
/// dyn-compatible.
pub type AnswerFuture<'a> = Pin<Box<dyn Future<Output = Result<String, ReasoningError>> + Send + 'a>>;

/// Anything that can compose an answer from a query and evidence.
pub trait Reasoner: Send + Sync {
    fn answer<'a>(&'a self, query: &'a str, evidence: &'a [ToolResult]) -> AnswerFuture<'a>;
}
