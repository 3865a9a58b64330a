//! Runtime configuration from environment variables.
//!
//! Credentials:
//! - `OPENROUTER_KEY` (required to run a session)
//! - `BRAVE_SEARCH_KEY`, `NEWSAPI_KEY`, `OPENWEATHER_KEY` (each optional;
//!   a missing key disables that provider's adapter rather than failing)
//!
//! `SCOUT_MODEL` overrides the default model identifier. Empty variables
//! are treated as unset.

use crate::adapters::{AdapterSet, news::News, read_page::ReadPage, search::WebSearch, weather::Weather, wikipedia::Wikipedia};
use crate::reasoning::ReasoningClient;

/// Resolved runtime configuration.
#[derive(Clone, Debug, Default)]
pub struct Config {
    pub openrouter_key: Option<String>,
    pub brave_search_key: Option<String>,
    pub newsapi_key: Option<String>,
    pub openweather_key: Option<String>,
    pub model: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Read configuration from the environment.
    pub fn from_env() -> Self {
        Self {
            openrouter_key: env_var("OPENROUTER_KEY"),
            brave_search_key: env_var("BRAVE_SEARCH_KEY"),
            newsapi_key: env_var("NEWSAPI_KEY"),
            openweather_key: env_var("OPENWEATHER_KEY"),
            model: env_var("SCOUT_MODEL"),
            max_tokens: 1024,
            temperature: 0.7,
        }
    }

    /// Adapter ids that will be available under this configuration.
    /// Wikipedia and page reading need no credential and are always on.
    pub fn enabled_adapters(&self) -> Vec<&'static str> {
        let mut ids = vec!["read_page", "wikipedia"];
        if self.brave_search_key.is_some() {
            ids.push("web_search");
        }
        if self.newsapi_key.is_some() {
            ids.push("news");
        }
        if self.openweather_key.is_some() {
            ids.push("weather");
        }
        ids.sort_unstable();
        ids
    }

    /// Build the adapter set this configuration enables.
    pub fn build_adapter_set(&self) -> AdapterSet {
        AdapterSet::new()
            .with(Wikipedia::new())
            .with(ReadPage::new())
            .with_if(
                self.brave_search_key.is_some(),
                WebSearch::new(self.brave_search_key.clone().unwrap_or_default()),
            )
            .with_if(
                self.newsapi_key.is_some(),
                News::new(self.newsapi_key.clone().unwrap_or_default()),
            )
            .with_if(
                self.openweather_key.is_some(),
                Weather::new(self.openweather_key.clone().unwrap_or_default()),
            )
    }

    /// Build the reasoning client, if a model key is configured.
    pub fn build_reasoner(&self) -> Option<ReasoningClient> {
        let key = self.openrouter_key.clone()?;
        let mut client = ReasoningClient::new(key)
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature);
        if let Some(model) = &self.model {
            client = client.with_model(model.clone());
        }
        Some(client)
    }
}
