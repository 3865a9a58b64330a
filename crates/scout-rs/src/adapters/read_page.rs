//! Page-reading adapter: fetch a URL named in the query and reduce its
//! HTML to plain text.
//!
//! The HTML handling is deliberately minimal. We only need readable text
//! for the reasoning prompt, so script/style blocks are dropped, tags are
//! stripped, a handful of common entities are decoded, and the result is
//! truncated to a fixed budget.

use crate::adapters::{Adapter, FetchFuture, FetchOptions, RateLimiter, RateLimiterConfig};
use crate::{Snippet, ToolResult};
use std::time::Duration;

/// Maximum characters of page text kept in a snippet.
pub const MAX_PAGE_CHARS: usize = 8_000;

/// Some sites reject requests without a browser-looking user agent.
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Direct page fetch adapter (`read_page`). The query argument is the URL.
pub struct ReadPage {
    client: reqwest::Client,
    limiter: RateLimiter,
}

impl ReadPage {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            limiter: RateLimiter::new(RateLimiterConfig {
                burst: 4,
                refill_interval: Duration::from_secs(2),
                ..RateLimiterConfig::default()
            }),
        }
    }

    /// Override the rate limiter configuration.
    pub fn with_limiter(mut self, config: RateLimiterConfig) -> Self {
        self.limiter = RateLimiter::new(config);
        self
    }

    async fn read(&self, url: &str) -> Result<String, String> {
        let resp = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(format!("HTTP {status}"));
        }

        let html = resp
            .text()
            .await
            .map_err(|e| format!("failed to read body: {e}"))?;
        Ok(truncate_chars(&html_to_text(&html), MAX_PAGE_CHARS))
    }
}

impl Default for ReadPage {
    fn default() -> Self {
        Self::new()
    }
}

impl Adapter for ReadPage {
    fn id(&self) -> &'static str {
        "read_page"
    }

    fn fetch(&self, query: &str, _opts: FetchOptions) -> FetchFuture<'_> {
        let url = query.trim().to_string();
        Box::pin(async move {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return ToolResult::failure(self.id(), format!("not a fetchable URL: '{url}'"));
            }

            if let Err(wait) = self.limiter.acquire().await {
                return ToolResult::failure(
                    self.id(),
                    format!("rate limited; next slot in ~{:.0}s", wait.as_secs_f64()),
                );
            }

            match self.read(&url).await {
                Ok(text) if text.is_empty() => {
                    ToolResult::failure(self.id(), format!("no readable text at {url}"))
                }
                Ok(text) => {
                    ToolResult::success(self.id(), vec![Snippet::with_url(text, url)])
                }
                Err(e) => ToolResult::failure(self.id(), format!("could not read {url}: {e}")),
            }
        })
    }
}

// ── HTML helpers ───────────────────────────────────────────────────

/// Reduce an HTML document to readable plain text: drop script/style
/// blocks, strip tags, decode common entities, collapse whitespace.
pub fn html_to_text(html: &str) -> String {
    let without_blocks = remove_element(&remove_element(html, "script"), "style");
    let stripped = strip_tags(&without_blocks);

    // Collapse runs of blank lines and intra-line whitespace.
    let mut out = String::with_capacity(stripped.len());
    for line in stripped.lines() {
        let line = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if !line.is_empty() {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&line);
        }
    }
    out
}

/// Remove `<tag ...>...</tag>` blocks (case-insensitive), including content.
fn remove_element(html: &str, tag: &str) -> String {
    let open = format!("<{tag}");
    let close = format!("</{tag}>");
    let lower = html.to_ascii_lowercase();

    let mut out = String::with_capacity(html.len());
    let mut pos = 0;
    while let Some(start) = lower
        .get(pos..)
        .and_then(|rest| rest.find(&open))
        .map(|i| pos + i)
    {
        out.push_str(html.get(pos..start).unwrap_or_default());
        match lower
            .get(start..)
            .and_then(|rest| rest.find(&close))
            .map(|i| start + i)
        {
            Some(end) => pos = end + close.len(),
            None => {
                // Unclosed block: drop the rest of the document.
                return out;
            }
        }
    }
    out.push_str(html.get(pos..).unwrap_or_default());
    out
}

/// Strip markup tags from an HTML fragment and decode common entities,
/// inserting line breaks for block-level separators.
pub fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    let mut tag = String::new();

    for c in html.chars() {
        match c {
            '<' => {
                in_tag = true;
                tag.clear();
            }
            '>' if in_tag => {
                in_tag = false;
                let name = tag
                    .trim_start_matches('/')
                    .split(|c: char| c.is_whitespace() || c == '/')
                    .next()
                    .unwrap_or_default()
                    .to_ascii_lowercase();
                if matches!(
                    name.as_str(),
                    "p" | "br" | "div" | "li" | "tr" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
                ) {
                    out.push('\n');
                }
            }
            _ if in_tag => tag.push(c),
            _ => out.push(c),
        }
    }

    out.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .trim()
        .to_string()
}

/// Truncate to at most `max` characters on a char boundary, appending a
/// notice when trimmed.
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let cut: String = s.chars().take(max).collect();
    format!("{cut}... [content truncated]")
}
