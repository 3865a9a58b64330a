//! Tool adapters: one module per external information provider.
//!
//! The [`Adapter`] trait defines the uniform fetch contract every provider
//! is wrapped behind: an identifier and an async `fetch` that always
//! produces a [`ToolResult`] — never an `Err`, never a panic. Adapters are
//! collected into an [`AdapterSet`] which handles dispatch by name and
//! per-call timeouts.
//!
//! | Adapter | id | Provider |
//! |---------|----|----------|
//! | [`search::WebSearch`] | `web_search` | Brave Search API |
//! | [`wikipedia::Wikipedia`] | `wikipedia` | MediaWiki search API |
//! | [`news::News`] | `news` | NewsAPI |
//! | [`weather::Weather`] | `weather` | OpenWeatherMap |
//! | [`read_page::ReadPage`] | `read_page` | Direct page fetch |
//!
//! Each adapter owns a [`RateLimiter`](limiter::RateLimiter) for its
//! provider; limiter counters are the only state an adapter keeps between
//! calls and live for the life of the process.

pub mod cache;
pub mod limiter;
pub mod news;
pub mod read_page;
pub mod search;
pub mod weather;
pub mod wikipedia;

pub use limiter::{ExhaustedPolicy, RateLimiter, RateLimiterConfig};

use crate::ToolResult;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default timeout applied to each adapter fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Boxed future returned by [`Adapter::fetch`].
pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = ToolResult> + Send + 'a>>;

/// Per-fetch options passed through the adapter contract.
#[derive(Clone, Copy, Debug)]
pub struct FetchOptions {
    /// Upper bound on snippets an adapter should return.
    pub max_results: u32,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self { max_results: 5 }
    }
}

/// A component wrapping one external information provider.
///
/// Implementations must not return errors for provider-side problems —
/// timeouts, quota, malformed payloads all come back as a failed
/// [`ToolResult`] with a human-readable note. The only side effect allowed
/// is network I/O; the only state retained between calls is the rate
/// limiter's counters (and, for search, a per-process result cache).
pub trait Adapter: Send + Sync {
    /// Stable adapter identifier, used by the planner and as the
    /// `ToolResult::source`.
    fn id(&self) -> &'static str;

    /// Fetch evidence for `query`. Infallible by contract.
    ///
    /// Uses a boxed future so that the trait is dyn-compatible.
    fn fetch(&self, query: &str, opts: FetchOptions) -> FetchFuture<'_>;
}

// ── AdapterSet ─────────────────────────────────────────────────────

/// A collection of adapters dispatched by id.
///
/// Applies a per-call timeout: a fetch that exceeds it yields a failed
/// `ToolResult` for that adapter only, so a slow provider never aborts the
/// other invocations in a plan.
pub struct AdapterSet {
    adapters: HashMap<&'static str, Box<dyn Adapter>>,
    fetch_timeout: Option<Duration>,
}

impl std::fmt::Debug for AdapterSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterSet")
            .field("adapters", &self.ids())
            .field("fetch_timeout", &self.fetch_timeout)
            .finish()
    }
}

impl AdapterSet {
    /// Create an empty set with the default fetch timeout.
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
            fetch_timeout: Some(DEFAULT_FETCH_TIMEOUT),
        }
    }

    /// Override the per-fetch timeout. `None` disables it.
    pub fn with_fetch_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Register an adapter. Replaces any existing adapter with the same id.
    pub fn register(&mut self, adapter: impl Adapter + 'static) {
        self.adapters.insert(adapter.id(), Box::new(adapter));
    }

    /// Register an adapter (builder pattern).
    pub fn with(mut self, adapter: impl Adapter + 'static) -> Self {
        self.register(adapter);
        self
    }

    /// Conditionally register an adapter. Keeps the builder chain intact
    /// when registration depends on a credential being configured.
    pub fn with_if(self, condition: bool, adapter: impl Adapter + 'static) -> Self {
        if condition { self.with(adapter) } else { self }
    }

    /// Registered adapter ids, sorted for deterministic output.
    pub fn ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<&'static str> = self.adapters.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Number of registered adapters.
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// Dispatch a fetch to the adapter with the given id.
    ///
    /// An unknown id or a timeout produces a failed `ToolResult`; this
    /// method never errors, matching the adapter contract.
    pub async fn fetch(&self, id: &str, query: &str, opts: FetchOptions) -> ToolResult {
        let Some(adapter) = self.adapters.get(id) else {
            return ToolResult::failure(id, format!("unknown adapter '{id}'"));
        };

        info!("[adapter] {id}({query})");
        let start = std::time::Instant::now();

        let result = if let Some(timeout) = self.fetch_timeout {
            match tokio::time::timeout(timeout, adapter.fetch(query, opts)).await {
                Ok(r) => r,
                Err(_) => {
                    warn!(
                        "[adapter] {id} timed out after {:.0}s",
                        timeout.as_secs_f64()
                    );
                    ToolResult::failure(
                        id,
                        format!("timed out after {:.0} seconds", timeout.as_secs_f64()),
                    )
                }
            }
        } else {
            adapter.fetch(query, opts).await
        };

        debug!(
            "[adapter] {id} finished in {:.0}ms: ok={}, snippets={}",
            start.elapsed().as_secs_f64() * 1000.0,
            result.ok,
            result.snippets.len()
        );
        result
    }
}

impl Default for AdapterSet {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Snippet;

    struct StaticAdapter;

    impl Adapter for StaticAdapter {
        fn id(&self) -> &'static str {
            "static"
        }

        fn fetch(&self, query: &str, _opts: FetchOptions) -> FetchFuture<'_> {
            let text = format!("evidence for {query}");
            Box::pin(async move { ToolResult::success("static", vec![Snippet::new(text)]) })
        }
    }

    struct BrokenAdapter;

    impl Adapter for BrokenAdapter {
        fn id(&self) -> &'static str {
            "broken"
        }

        fn fetch(&self, _query: &str, _opts: FetchOptions) -> FetchFuture<'_> {
            Box::pin(async { ToolResult::failure("broken", "simulated network outage") })
        }
    }

    struct SlowAdapter;

    impl Adapter for SlowAdapter {
        fn id(&self) -> &'static str {
            "slow"
        }

        fn fetch(&self, _query: &str, _opts: FetchOptions) -> FetchFuture<'_> {
            Box::pin(async {
                tokio::time::sleep(Duration::from_millis(200)).await;
                ToolResult::success("slow", vec![])
            })
        }
    }

    #[test]
    fn register_and_ids_sorted() {
        let set = AdapterSet::new().with(StaticAdapter).with(BrokenAdapter);
        assert_eq!(set.len(), 2);
        assert_eq!(set.ids(), vec!["broken", "static"]);
    }

    #[test]
    fn with_if_false_skips() {
        let set = AdapterSet::new().with_if(false, StaticAdapter);
        assert!(set.is_empty());
    }

    #[tokio::test]
    async fn fetch_known_adapter() {
        let set = AdapterSet::new().with(StaticAdapter);
        let result = set.fetch("static", "rust", FetchOptions::default()).await;
        assert!(result.ok);
        assert_eq!(result.snippets[0].text, "evidence for rust");
    }

    #[tokio::test]
    async fn fetch_unknown_adapter_is_failure_not_error() {
        let set = AdapterSet::new();
        let result = set.fetch("nope", "q", FetchOptions::default()).await;
        assert!(!result.ok);
        assert!(result.note.unwrap().contains("unknown adapter"));
    }

    #[tokio::test]
    async fn provider_failure_surfaces_as_note() {
        let set = AdapterSet::new().with(BrokenAdapter);
        let result = set.fetch("broken", "q", FetchOptions::default()).await;
        assert!(!result.ok);
        assert_eq!(result.note.as_deref(), Some("simulated network outage"));
    }

    #[tokio::test]
    async fn timeout_yields_failed_result() {
        let set = AdapterSet::new()
            .with(SlowAdapter)
            .with_fetch_timeout(Some(Duration::from_millis(20)));
        let result = set.fetch("slow", "q", FetchOptions::default()).await;
        assert!(!result.ok);
        assert!(result.note.unwrap().contains("timed out"));
    }
}
