//! Query planning: decide which adapters to invoke for a query, in what
//! order, with what arguments.
//!
//! Routing is a declarative table ([`INTENT_RULES`]) mapping intent tags to
//! keyword sets, kept separate from the matching control flow: adding an
//! adapter means adding a rule row and an [`adapters_for`] entry, not
//! touching [`plan`]. The table is ordered by fixed precedence so a query
//! matching several intents always plans them in the same order:
//! weather, then news, then page reading, then the generic research pair
//! (wikipedia + web search).
//!
//! The research fallback only applies when no specific intent matched, and
//! only when the query carries at least one content word. A query with no
//! matching intent, or whose matched adapters are all disabled, produces an
//! empty reasoning-only plan — never an error.

/// Intent tags the planner can recognize.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    Weather,
    News,
    ReadPage,
    Research,
}

/// One row of the routing table: an intent and the keywords that signal it.
#[derive(Debug)]
pub struct IntentRule {
    pub intent: Intent,
    pub keywords: &'static [&'static str],
}

/// The routing table, in precedence order. Specific intents come first;
/// the generic research fallback is handled separately in [`plan`].
pub const INTENT_RULES: &[IntentRule] = &[
    IntentRule {
        intent: Intent::Weather,
        keywords: &["weather", "temperature", "forecast", "humidity", "windy"],
    },
    IntentRule {
        intent: Intent::News,
        keywords: &["news", "headline", "headlines", "breaking"],
    },
];

/// Adapters serving each intent, in invocation order.
pub fn adapters_for(intent: Intent) -> &'static [&'static str] {
    match intent {
        Intent::Weather => &["weather"],
        Intent::News => &["news"],
        Intent::ReadPage => &["read_page"],
        Intent::Research => &["wikipedia", "web_search"],
    }
}

/// Words too generic to justify a research lookup on their own.
const FILLER_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "with", "about", "is",
    "are", "was", "were", "what", "who", "when", "why", "how", "hi", "hello", "hey", "thanks",
    "please", "you", "your", "me", "my",
];

/// One planned adapter invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    /// Adapter id to dispatch to.
    pub adapter: &'static str,
    /// Adapter-specific argument: a location for `weather`, a URL for
    /// `read_page`, the query text otherwise.
    pub argument: String,
}

/// An ordered list of adapter invocations for one query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Plan {
    pub invocations: Vec<Invocation>,
}

impl Plan {
    /// Whether the plan skips evidence gathering entirely.
    pub fn is_reasoning_only(&self) -> bool {
        self.invocations.is_empty()
    }
}

/// Plan adapter invocations for a query against the enabled adapter set.
///
/// Deterministic: the same query and enabled set always produce the same
/// plan.
pub fn plan(query: &str, enabled: &[&str]) -> Plan {
    let query = query.trim();
    let lower = query.to_ascii_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    let mut invocations = Vec::new();
    let mut push = |adapter: &'static str, argument: String| {
        if enabled.contains(&adapter)
            && !invocations
                .iter()
                .any(|i: &Invocation| i.adapter == adapter)
        {
            invocations.push(Invocation { adapter, argument });
        }
    };

    let mut specific_matched = false;
    for rule in INTENT_RULES {
        if rule.keywords.iter().any(|k| words.contains(k)) {
            specific_matched = true;
            let argument = match rule.intent {
                Intent::Weather => extract_location(query).unwrap_or_else(|| query.to_string()),
                _ => query.to_string(),
            };
            for adapter in adapters_for(rule.intent) {
                push(adapter, argument.clone());
            }
        }
    }

    if let Some(url) = extract_url(query) {
        specific_matched = true;
        for adapter in adapters_for(Intent::ReadPage) {
            push(adapter, url.clone());
        }
    }

    if !specific_matched && has_content_word(&words) {
        for adapter in adapters_for(Intent::Research) {
            push(adapter, query.to_string());
        }
    }

    Plan { invocations }
}

/// Whether the query has at least one word worth researching.
fn has_content_word(words: &[&str]) -> bool {
    words.iter().any(|w| w.len() > 2 && !FILLER_WORDS.contains(w))
}

/// Extract a location from phrases like "weather in Paris" or
/// "forecast for New York today".
pub fn extract_location(query: &str) -> Option<String> {
    let lower = query.to_ascii_lowercase();
    for marker in [" in ", " for ", " at "] {
        if let Some(pos) = lower.find(marker) {
            let rest = query.get(pos + marker.len()..)?;
            let location = rest
                .trim()
                .trim_end_matches(['?', '.', '!', ','])
                .trim_end();
            let location = location
                .strip_suffix(" today")
                .or_else(|| location.strip_suffix(" tomorrow"))
                .or_else(|| location.strip_suffix(" right now"))
                .or_else(|| location.strip_suffix(" now"))
                .unwrap_or(location)
                .trim();
            if !location.is_empty() {
                return Some(location.to_string());
            }
        }
    }
    None
}

/// Extract the first http(s) URL in the query, if any.
pub fn extract_url(query: &str) -> Option<String> {
    let start = query
        .find("https://")
        .or_else(|| query.find("http://"))?;
    let rest = query.get(start..)?;
    let url = rest
        .split(|c: char| c.is_whitespace() || matches!(c, '<' | '>' | '"' | ')'))
        .next()?
        .trim_end_matches(['.', ',', '!', '?', ';']);
    if url.len() > "https://".len() {
        Some(url.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: &[&str] = &["news", "read_page", "weather", "web_search", "wikipedia"];

    fn adapter_ids(plan: &Plan) -> Vec<&'static str> {
        plan.invocations.iter().map(|i| i.adapter).collect()
    }

    #[test]
    fn weather_query_extracts_location() {
        let plan = plan("weather in Paris", ALL);
        assert_eq!(adapter_ids(&plan), vec!["weather"]);
        assert_eq!(plan.invocations[0].argument, "Paris");
    }

    #[test]
    fn weather_trailing_words_are_stripped() {
        assert_eq!(
            extract_location("what is the forecast for New York today?"),
            Some("New York".to_string())
        );
    }

    #[test]
    fn general_query_plans_research_pair_in_order() {
        let plan = plan("history of the transistor", ALL);
        assert_eq!(adapter_ids(&plan), vec!["wikipedia", "web_search"]);
        assert_eq!(plan.invocations[0].argument, "history of the transistor");
    }

    #[test]
    fn multi_intent_uses_fixed_precedence() {
        let plan = plan("weather and news headlines in Berlin", ALL);
        // Weather outranks news; the research fallback stays out once a
        // specific intent matched.
        assert_eq!(adapter_ids(&plan), vec!["weather", "news"]);
        assert_eq!(plan.invocations[0].argument, "Berlin");
    }

    #[test]
    fn url_query_plans_read_page() {
        let plan = plan("summarize https://example.com/post?id=3 please", ALL);
        assert_eq!(adapter_ids(&plan), vec!["read_page"]);
        assert_eq!(plan.invocations[0].argument, "https://example.com/post?id=3");
    }

    #[test]
    fn no_content_words_is_reasoning_only() {
        let plan = plan("hi", ALL);
        assert!(plan.is_reasoning_only());
        let plan = super::plan("", ALL);
        assert!(plan.is_reasoning_only());
    }

    #[test]
    fn disabled_adapters_are_skipped() {
        let plan = plan("weather in Paris", &["wikipedia", "web_search"]);
        assert!(plan.is_reasoning_only());

        let plan = super::plan("history of the transistor", &["wikipedia"]);
        assert_eq!(adapter_ids(&plan), vec!["wikipedia"]);
    }

    #[test]
    fn empty_enabled_set_is_reasoning_only_never_error() {
        let plan = plan("anything at all", &[]);
        assert!(plan.is_reasoning_only());
    }

    #[test]
    fn plan_is_deterministic() {
        let a = plan("latest news about rust", ALL);
        let b = plan("latest news about rust", ALL);
        assert_eq!(a, b);
    }

    #[test]
    fn url_trailing_punctuation_is_trimmed() {
        assert_eq!(
            extract_url("see https://example.com/a."),
            Some("https://example.com/a".to_string())
        );
        assert_eq!(extract_url("no links here"), None);
    }
}
