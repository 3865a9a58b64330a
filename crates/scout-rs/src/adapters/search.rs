//! Web search adapter backed by the Brave Search API.
//!
//! Search is the most rate-limited provider in the set, so this adapter
//! layers two mitigations on top of the shared limiter: a per-process
//! [`QueryCache`] for repeated queries, and query optimization that drops
//! filler words from long queries before they hit the provider.

use crate::adapters::cache::QueryCache;
use crate::adapters::read_page::strip_tags;
use crate::adapters::{Adapter, FetchFuture, FetchOptions, RateLimiter, RateLimiterConfig};
use crate::{Snippet, ToolResult};
use std::time::Duration;
use tracing::debug;

const SEARCH_URL: &str = "https://api.search.brave.com/res/v1/web/search";

/// Words that add little search value and are dropped from long queries.
const FILLER_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "with", "about", "is",
    "are", "was", "were", "what", "which", "how",
];

/// Brave Search adapter (`web_search`).
pub struct WebSearch {
    api_key: String,
    client: reqwest::Client,
    limiter: RateLimiter,
    cache: QueryCache,
}

impl WebSearch {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            client: reqwest::Client::new(),
            limiter: RateLimiter::new(RateLimiterConfig::default()),
            cache: QueryCache::default(),
        }
    }

    /// Override the rate limiter configuration.
    pub fn with_limiter(mut self, config: RateLimiterConfig) -> Self {
        self.limiter = RateLimiter::new(config);
        self
    }

    async fn search(&self, query: &str, count: u32) -> Result<Vec<Snippet>, String> {
        let url = format!("{SEARCH_URL}?q={}&count={count}", query_encode(query));
        let resp = self
            .client
            .get(&url)
            .header("X-Subscription-Token", &self.api_key)
            .header("Accept", "application/json")
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(format!("HTTP {status}: {body}"));
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| format!("malformed response: {e}"))?;
        Ok(parse_search_results(&body, count))
    }
}

impl Adapter for WebSearch {
    fn id(&self) -> &'static str {
        "web_search"
    }

    fn fetch(&self, query: &str, opts: FetchOptions) -> FetchFuture<'_> {
        let query = optimize_query(query);
        Box::pin(async move {
            if let Some(snippets) = self.cache.get(&query) {
                debug!("web_search: cache hit for '{query}'");
                return ToolResult::success(self.id(), snippets);
            }

            if let Err(wait) = self.limiter.acquire().await {
                return ToolResult::failure(
                    self.id(),
                    format!("rate limited; next slot in ~{:.0}s", wait.as_secs_f64()),
                );
            }

            let count = opts.max_results.clamp(1, 20);
            match self.search(&query, count).await {
                Ok(snippets) if snippets.is_empty() => {
                    ToolResult::failure(self.id(), format!("no results for '{query}'"))
                }
                Ok(snippets) => {
                    self.cache.put(&query, snippets.clone());
                    ToolResult::success(self.id(), snippets)
                }
                Err(e) => ToolResult::failure(self.id(), format!("search failed: {e}")),
            }
        })
    }
}

/// Extract `title: description` snippets from a Brave Search response body.
pub fn parse_search_results(body: &serde_json::Value, count: u32) -> Vec<Snippet> {
    let Some(results) = body["web"]["results"].as_array() else {
        return Vec::new();
    };

    results
        .iter()
        .take(count as usize)
        .filter_map(|r| {
            let title = r["title"].as_str()?;
            let url = r["url"].as_str()?;
            let description = strip_tags(r["description"].as_str().unwrap_or_default());
            let text = if description.is_empty() {
                title.to_string()
            } else {
                format!("{title}: {description}")
            };
            Some(Snippet::with_url(text, url))
        })
        .collect()
}

/// Shorten a long query by dropping filler and very short words.
///
/// Queries of eight words or fewer pass through unchanged; longer queries
/// keep only their content words, provided enough of them remain to still
/// be a meaningful search.
pub fn optimize_query(query: &str) -> String {
    let words: Vec<&str> = query.split_whitespace().collect();
    if words.len() <= 8 {
        return query.trim().to_string();
    }

    let important: Vec<&str> = words
        .iter()
        .copied()
        .filter(|w| w.len() > 2 && !FILLER_WORDS.contains(&w.to_ascii_lowercase().as_str()))
        .collect();

    if important.len() > 3 {
        important.join(" ")
    } else {
        query.trim().to_string()
    }
}

/// Minimal percent-encoding for URL query parameters.
pub(crate) fn query_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len() * 3);
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char);
            }
            b' ' => out.push_str("%20"),
            _ => {
                out.push('%');
                out.push_str(&format!("{b:02X}"));
            }
        }
    }
    out
}
