//! Prompt assembly for the reasoning call.
//!
//! The whole session is packed into a single request: a fixed system
//! prompt and one user message embedding the query plus every gathered
//! [`ToolResult`], successes and failures alike. The model is told which
//! sources were unavailable so it can qualify its answer.

use crate::ToolResult;

/// System prompt for the research persona.
pub const SYSTEM_PROMPT: &str = "\
You are a research assistant. You receive a user's question together with \
evidence gathered from external sources (web search, Wikipedia, news, \
weather, fetched pages).\n\
\n\
Compose a direct, well-organized answer to the question:\n\
- Ground your answer in the provided evidence and synthesize across \
sources rather than quoting them one by one.\n\
- Mention source URLs inline when a specific claim rests on one.\n\
- If a needed source failed or no evidence is available, answer from \
general knowledge and say so briefly.\n\
- Do not invent citations.";

/// Build the user message embedding the query and serialized evidence.
pub fn build_user_prompt(query: &str, evidence: &[ToolResult]) -> String {
    let mut out = String::new();
    out.push_str("Question:\n");
    out.push_str(query.trim());
    out.push('\n');

    if evidence.is_empty() {
        out.push_str("\nNo external evidence was gathered for this question. \
                      Answer from general knowledge.\n");
        return out;
    }

    out.push_str("\nEvidence:\n");
    for result in evidence {
        out.push_str(&format!(
            "\n[{}] fetched {}\n",
            result.source,
            result.fetched_at.format("%Y-%m-%d %H:%M:%S UTC"),
        ));
        if result.ok {
            for snippet in &result.snippets {
                match &snippet.url {
                    Some(url) => out.push_str(&format!("- {} ({url})\n", snippet.text)),
                    None => out.push_str(&format!("- {}\n", snippet.text)),
                }
            }
        } else {
            let note = result.note.as_deref().unwrap_or("unavailable");
            out.push_str(&format!("- source unavailable: {note}\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Snippet;

    #[test]
    fn prompt_embeds_query_and_evidence() {
        let evidence = vec![ToolResult::success(
            "weather",
            vec![Snippet::with_url("18°C, cloudy", "https://openweathermap.org/city/1")],
        )];
        let prompt = build_user_prompt("weather in Paris", &evidence);

        assert!(prompt.contains("weather in Paris"));
        assert!(prompt.contains("[weather]"));
        assert!(prompt.contains("18°C, cloudy (https://openweathermap.org/city/1)"));
    }

    #[test]
    fn failed_sources_are_flagged() {
        let evidence = vec![ToolResult::failure("news", "HTTP 429: rate limited")];
        let prompt = build_user_prompt("rust news", &evidence);
        assert!(prompt.contains("source unavailable: HTTP 429: rate limited"));
    }

    #[test]
    fn empty_evidence_requests_general_knowledge() {
        let prompt = build_user_prompt("hello", &[]);
        assert!(prompt.contains("No external evidence"));
    }
}
