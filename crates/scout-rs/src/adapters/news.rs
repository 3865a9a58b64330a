//! News feed adapter backed by NewsAPI.
//!
//! Fetches the most recently published articles matching the query and
//! normalizes them into `headline (source, date)` snippets.

use crate::adapters::{Adapter, FetchFuture, FetchOptions, RateLimiter, RateLimiterConfig};
use crate::{Snippet, ToolResult};
use std::time::Duration;

const NEWS_URL: &str = "https://newsapi.org/v2/everything";

/// NewsAPI adapter (`news`).
pub struct News {
    api_key: String,
    client: reqwest::Client,
    limiter: RateLimiter,
}

impl News {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            client: reqwest::Client::new(),
            limiter: RateLimiter::new(RateLimiterConfig::default()),
        }
    }

    /// Override the rate limiter configuration.
    pub fn with_limiter(mut self, config: RateLimiterConfig) -> Self {
        self.limiter = RateLimiter::new(config);
        self
    }

    async fn headlines(&self, query: &str, limit: u32) -> Result<Vec<Snippet>, String> {
        let url = format!(
            "{NEWS_URL}?q={}&pageSize={limit}&sortBy=publishedAt",
            super::search::query_encode(query),
        );
        let resp = self
            .client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
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
        Ok(parse_news_results(&body, limit))
    }
}

impl Adapter for News {
    fn id(&self) -> &'static str {
        "news"
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

            match self.headlines(&query, opts.max_results.clamp(1, 20)).await {
                Ok(snippets) if snippets.is_empty() => {
                    ToolResult::failure(self.id(), format!("no news found for '{query}'"))
                }
                Ok(snippets) => ToolResult::success(self.id(), snippets),
                Err(e) => ToolResult::failure(self.id(), format!("news lookup failed: {e}")),
            }
        })
    }
}

/// Extract `headline (source, date)` snippets from a NewsAPI response.
pub fn parse_news_results(body: &serde_json::Value, limit: u32) -> Vec<Snippet> {
    let Some(articles) = body["articles"].as_array() else {
        return Vec::new();
    };

    articles
        .iter()
        .take(limit as usize)
        .filter_map(|a| {
            let title = a["title"].as_str()?;
            let url = a["url"].as_str()?;
            let source = a["source"]["name"].as_str().unwrap_or("unknown source");
            // Keep just the date part of the RFC 3339 timestamp.
            let published: String = a["publishedAt"]
                .as_str()
                .unwrap_or_default()
                .chars()
                .take(10)
                .collect();
            let text = if published.is_empty() {
                format!("{title} ({source})")
            } else {
                format!("{title} ({source}, {published})")
            };
            Some(Snippet::with_url(text, url))
        })
        .collect()
}
