//! Weather adapter backed by OpenWeatherMap current conditions.
//!
//! The query argument is a location name (the planner extracts it from
//! phrases like "weather in Paris"). Conditions are normalized into a
//! single metric-units snippet.

use crate::adapters::{Adapter, FetchFuture, FetchOptions, RateLimiter, RateLimiterConfig};
use crate::{Snippet, ToolResult};
use std::time::Duration;

const WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// OpenWeatherMap adapter (`weather`).
pub struct Weather {
    api_key: String,
    client: reqwest::Client,
    limiter: RateLimiter,
}

impl Weather {
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

    async fn current(&self, location: &str) -> Result<Snippet, String> {
        let url = format!(
            "{WEATHER_URL}?q={}&units=metric&appid={}",
            super::search::query_encode(location),
            self.api_key,
        );
        let resp = self
            .client
            .get(&url)
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        let status = resp.status();
        if status.as_u16() == 404 {
            return Err(format!("unknown location '{location}'"));
        }
        if !status.is_success() {
            return Err(format!("HTTP {status}"));
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| format!("malformed response: {e}"))?;
        parse_weather(&body).ok_or_else(|| "response missing expected fields".to_string())
    }
}

impl Adapter for Weather {
    fn id(&self) -> &'static str {
        "weather"
    }

    fn fetch(&self, query: &str, _opts: FetchOptions) -> FetchFuture<'_> {
        let location = query.trim().to_string();
        Box::pin(async move {
            if location.is_empty() {
                return ToolResult::failure(self.id(), "no location to look up");
            }

            if let Err(wait) = self.limiter.acquire().await {
                return ToolResult::failure(
                    self.id(),
                    format!("rate limited; next slot in ~{:.0}s", wait.as_secs_f64()),
                );
            }

            match self.current(&location).await {
                Ok(snippet) => ToolResult::success(self.id(), vec![snippet]),
                Err(e) => {
                    ToolResult::failure(self.id(), format!("weather lookup failed: {e}"))
                }
            }
        })
    }
}

/// Normalize an OpenWeatherMap response into one conditions snippet.
pub fn parse_weather(body: &serde_json::Value) -> Option<Snippet> {
    let temp = body["main"]["temp"].as_f64()?;
    let description = body["weather"][0]["description"].as_str().unwrap_or("n/a");
    let humidity = body["main"]["humidity"].as_f64();
    let wind = body["wind"]["speed"].as_f64();
    let name = body["name"].as_str().unwrap_or_default();

    let mut text = format!("{temp:.0}°C, {description}");
    if let Some(h) = humidity {
        text.push_str(&format!(", humidity {h:.0}%"));
    }
    if let Some(w) = wind {
        text.push_str(&format!(", wind {w:.1} m/s"));
    }
    if !name.is_empty() {
        text = format!("{name}: {text}");
    }

    let url = body["id"]
        .as_i64()
        .map(|id| format!("https://openweathermap.org/city/{id}"));

    Some(match url {
        Some(url) => Snippet::with_url(text, url),
        None => Snippet::new(text),
    })
}
