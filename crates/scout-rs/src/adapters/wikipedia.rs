//! Encyclopedia lookup adapter backed by the MediaWiki search API.
//!
//! Requires no credential, so it is always registered. Article URLs are
//! reconstructed from titles the same way the wiki itself links them.

use crate::adapters::read_page::strip_tags;
use crate::adapters::{Adapter, FetchFuture, FetchOptions, RateLimiter, RateLimiterConfig};
use crate::{Snippet, ToolResult};
use std::time::Duration;

const API_URL: &str = "https://en.wikipedia.org/w/api.php";

/// Wikipedia search adapter (`wikipedia`).
pub struct Wikipedia {
    client: reqwest::Client,
    limiter: RateLimiter,
}

impl Wikipedia {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            // Wikimedia is generous; a small steady budget is plenty.
            limiter: RateLimiter::new(RateLimiterConfig {
                burst: 5,
                refill_interval: Duration::from_secs(1),
                ..RateLimiterConfig::default()
            }),
        }
    }

    /// Override the rate limiter configuration.
    pub fn with_limiter(mut self, config: RateLimiterConfig) -> Self {
        self.limiter = RateLimiter::new(config);
        self
    }

    async fn search(&self, query: &str, limit: u32) -> Result<Vec<Snippet>, String> {
        let url = format!(
            "{API_URL}?action=query&list=search&srsearch={}&srlimit={limit}&format=json",
            super::search::query_encode(query),
        );
        let resp = self
            .client
            .get(&url)
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(format!("HTTP {status}"));
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| format!("malformed response: {e}"))?;
        Ok(parse_wikipedia_results(&body))
    }
}

impl Default for Wikipedia {
    fn default() -> Self {
        Self::new()
    }
}

impl Adapter for Wikipedia {
    fn id(&self) -> &'static str {
        "wikipedia"
    }

    fn fetch(&self, query: &str, opts: FetchOptions) -> FetchFuture<'_> {
        let query = query.trim().to_string();
        Box::pin(async move {
            if let Err(wait) = self.limiter.acquire().await {
                return ToolResult::failure(
                    self.id(),
                    format!("rate limited; next slot in ~{:.0}s", wait.as_secs_f64()),
                );
            }

            match self.search(&query, opts.max_results.clamp(1, 10)).await {
                Ok(snippets) if snippets.is_empty() => {
                    ToolResult::failure(self.id(), format!("no articles match '{query}'"))
                }
                Ok(snippets) => ToolResult::success(self.id(), snippets),
                Err(e) => ToolResult::failure(self.id(), format!("lookup failed: {e}")),
            }
        })
    }
}

/// Extract `title: excerpt` snippets from a MediaWiki search response.
pub fn parse_wikipedia_results(body: &serde_json::Value) -> Vec<Snippet> {
    let Some(results) = body["query"]["search"].as_array() else {
        return Vec::new();
    };

    results
        .iter()
        .filter_map(|r| {
            let title = r["title"].as_str()?;
            let excerpt = strip_tags(r["snippet"].as_str().unwrap_or_default());
            let url = article_url(title);
            let text = if excerpt.is_empty() {
                title.to_string()
            } else {
                format!("{title}: {excerpt}")
            };
            Some(Snippet::with_url(text, url))
        })
        .collect()
}

/// Canonical article URL for a page title.
fn article_url(title: &str) -> String {
    format!(
        "https://en.wikipedia.org/wiki/{}",
        super::search::query_encode(&title.replace(' ', "_"))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_results_builds_urls_from_titles() {
        let body = serde_json::json!({
            "query": {
                "search": [
                    {
                        "title": "Rust (programming language)",
                        "snippet": "is a <span class=\"searchmatch\">systems</span> language"
                    }
                ]
            }
        });

        let snippets = parse_wikipedia_results(&body);
        assert_eq!(snippets.len(), 1);
        assert_eq!(
            snippets[0].text,
            "Rust (programming language): is a systems language"
        );
        let url = snippets[0].url.as_deref().unwrap();
        assert!(url.starts_with("https://en.wikipedia.org/wiki/Rust_"));
        assert!(!url.contains(' '));
    }

    #[test]
    fn parse_results_tolerates_empty_body() {
        assert!(parse_wikipedia_results(&serde_json::json!({})).is_empty());
    }
}
