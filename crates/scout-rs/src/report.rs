//! Report assembly: fold a session's query, evidence, and answer into a
//! structured research report.
//!
//! Assembly is pure. The same (query, evidence, answer) triple always
//! produces the same report, byte for byte; nothing here reads the clock
//! or any other ambient state. Timestamps only enter when a report is
//! appended to a log file, at write time.

use crate::ToolResult;
use chrono::Utc;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// One cited source: the adapter it came from and the URL it points at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Citation {
    pub source: String,
    pub url: String,
}

/// A completed research report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Report {
    /// The original query, verbatim.
    pub query: String,
    /// The model's answer.
    pub answer: String,
    /// Deduplicated citations in evidence order.
    pub citations: Vec<Citation>,
    /// Sources that failed, as "source: note" lines.
    pub missing_sources: Vec<String>,
}

/// Assemble a report from the session's query, gathered evidence, and the
/// reasoned answer.
///
/// Citations come only from successful results, in the order the evidence
/// was gathered, with duplicate URLs dropped (first occurrence wins).
/// Every failed result contributes one `missing_sources` line.
pub fn assemble(query: &str, evidence: &[ToolResult], answer: &str) -> Report {
    let mut citations: Vec<Citation> = Vec::new();
    let mut missing_sources = Vec::new();

    for result in evidence {
        if result.ok {
            for snippet in &result.snippets {
                if let Some(url) = &snippet.url {
                    if !citations.iter().any(|c| &c.url == url) {
                        citations.push(Citation {
                            source: result.source.clone(),
                            url: url.clone(),
                        });
                    }
                }
            }
        } else {
            let note = result.note.as_deref().unwrap_or("unavailable");
            missing_sources.push(format!("{}: {note}", result.source));
        }
    }

    Report {
        query: query.to_string(),
        answer: answer.to_string(),
        citations,
        missing_sources,
    }
}

impl Report {
    /// Render the report as sectioned plain text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("== Research report ==\n\n");
        out.push_str(&format!("Query: {}\n\n", self.query));
        out.push_str(&self.answer);
        out.push('\n');

        if !self.citations.is_empty() {
            out.push_str("\nSources:\n");
            for citation in &self.citations {
                out.push_str(&format!("- [{}] {}\n", citation.source, citation.url));
            }
        }
        if !self.missing_sources.is_empty() {
            out.push_str("\nUnavailable sources:\n");
            for missing in &self.missing_sources {
                out.push_str(&format!("- {missing}\n"));
            }
        }
        out
    }

    /// Append the rendered report to a log file, stamped with the write
    /// time. Creates the file if it does not exist.
    pub fn append_to_log(&self, path: &Path) -> std::io::Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        let stamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        writeln!(file, "---- {stamp} ----")?;
        writeln!(file, "{}", self.render())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Snippet;

    fn sample_evidence() -> Vec<ToolResult> {
        vec![
            ToolResult::success(
                "wikipedia",
                vec![
                    Snippet::with_url("Transistor basics", "https://en.wikipedia.org/wiki/Transistor"),
                    Snippet::new("Uncited background"),
                ],
            ),
            ToolResult::success(
                "web_search",
                vec![
                    Snippet::with_url("Duplicate link", "https://en.wikipedia.org/wiki/Transistor"),
                    Snippet::with_url("History article", "https://example.com/history"),
                ],
            ),
            ToolResult::failure("news", "HTTP 429: rate limited"),
        ]
    }

    #[test]
    fn assemble_is_idempotent() {
        let evidence = sample_evidence();
        let a = assemble("transistor history", &evidence, "An answer.");
        let b = assemble("transistor history", &evidence, "An answer.");
        assert_eq!(a, b);
        assert_eq!(a.render(), b.render());
    }

    #[test]
    fn citations_dedup_in_evidence_order() {
        let report = assemble("transistor history", &sample_evidence(), "An answer.");
        let urls: Vec<&str> = report.citations.iter().map(|c| c.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://en.wikipedia.org/wiki/Transistor",
                "https://example.com/history",
            ]
        );
        // First occurrence wins, so the duplicate keeps its original source.
        assert_eq!(report.citations[0].source, "wikipedia");
    }

    #[test]
    fn failed_sources_become_missing_lines() {
        let report = assemble("transistor history", &sample_evidence(), "An answer.");
        assert_eq!(report.missing_sources, vec!["news: HTTP 429: rate limited"]);
    }

    #[test]
    fn render_has_all_sections() {
        let report = assemble("transistor history", &sample_evidence(), "An answer.");
        let text = report.render();
        assert!(text.contains("== Research report =="));
        assert!(text.contains("Query: transistor history"));
        assert!(text.contains("An answer."));
        assert!(text.contains("- [wikipedia] https://en.wikipedia.org/wiki/Transistor"));
        assert!(text.contains("- news: HTTP 429: rate limited"));
    }

    #[test]
    fn render_omits_empty_sections() {
        let report = assemble("hello", &[], "Just an answer.");
        let text = report.render();
        assert!(!text.contains("Sources:"));
        assert!(!text.contains("Unavailable sources:"));
    }

    #[test]
    fn append_to_log_accumulates_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("research.log");
        let report = assemble("q", &[], "First answer.");

        report.append_to_log(&path).unwrap();
        report.append_to_log(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.matches("== Research report ==").count(), 2);
        assert_eq!(contents.matches("---- ").count(), 2);
    }
}
