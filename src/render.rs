use anyhow::{Context, Result};
use clap::ValueEnum;
use std::fmt::Write;

use crate::search::{SearchHit, SearchOutcome};

/// Shown in place of results when a query matches nothing
pub const NO_RESULTS: &str = "No results";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Html,
}

/// Render an outcome. A cleared outcome renders as an empty string in every
/// format except JSON.
pub fn render(outcome: &SearchOutcome, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(outcome)),
        OutputFormat::Json => {
            serde_json::to_string_pretty(outcome).context("Failed to serialize search results")
        }
        OutputFormat::Html => Ok(render_html(outcome)),
    }
}

pub fn render_text(outcome: &SearchOutcome) -> String {
    match outcome {
        SearchOutcome::Cleared => String::new(),
        SearchOutcome::NoResults => NO_RESULTS.to_string(),
        SearchOutcome::Results(hits) => hits
            .iter()
            .enumerate()
            .map(|(i, hit)| text_entry(i + 1, hit))
            .collect::<Vec<_>>()
            .join("\n\n"),
    }
}

fn text_entry(rank: usize, hit: &SearchHit) -> String {
    let mut entry = format!("{rank}. {} [{}]\n   {}", hit.title, hit.score, hit.path);
    if !hit.snippet.is_empty() {
        entry.push_str("\n   ");
        entry.push_str(&hit.snippet);
    }
    entry
}

/// Result cards linking to each page
pub fn render_html(outcome: &SearchOutcome) -> String {
    match outcome {
        SearchOutcome::Cleared => String::new(),
        SearchOutcome::NoResults => format!(r#"<div class="card">{NO_RESULTS}</div>"#),
        SearchOutcome::Results(hits) => {
            let mut html = String::new();
            for hit in hits {
                // Writing into a String cannot fail
                let _ = write!(
                    html,
                    concat!(
                        r#"<a class="card" href="{path}">"#,
                        "<strong>{title}</strong>",
                        "<small>{path}</small>",
                        "<div>{snippet}</div>",
                        "</a>\n"
                    ),
                    path = escape_html(&hit.path),
                    title = escape_html(&hit.title),
                    snippet = escape_html(&hit.snippet),
                );
            }
            html
        }
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(title: &str, snippet: &str) -> SearchHit {
        SearchHit {
            path: "about.html".to_string(),
            title: title.to_string(),
            snippet: snippet.to_string(),
            score: 21,
        }
    }

    #[test]
    fn test_cleared_renders_nothing() {
        assert_eq!(render_text(&SearchOutcome::Cleared), "");
        assert_eq!(render_html(&SearchOutcome::Cleared), "");
    }

    #[test]
    fn test_no_results_placeholder() {
        assert_eq!(render_text(&SearchOutcome::NoResults), "No results");
        assert_eq!(
            render_html(&SearchOutcome::NoResults),
            r#"<div class="card">No results</div>"#
        );
    }

    #[test]
    fn test_text_entry() {
        let outcome = SearchOutcome::Results(vec![hit("About Us", "we build sparkly things...")]);
        assert_eq!(
            render_text(&outcome),
            "1. About Us [21]\n   about.html\n   we build sparkly things..."
        );
    }

    #[test]
    fn test_html_is_escaped() {
        let outcome = SearchOutcome::Results(vec![hit("<b>Tom & Jerry</b>", "")]);
        let html = render_html(&outcome);
        assert!(html.contains("<strong>&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;</strong>"));
        assert!(html.starts_with(r#"<a class="card" href="about.html">"#));
    }

    #[test]
    fn test_json_results() {
        let outcome = SearchOutcome::Results(vec![hit("About Us", "x...")]);
        let json: serde_json::Value =
            serde_json::from_str(&render(&outcome, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["status"], "results");
        assert_eq!(json["results"][0]["score"], 21);
    }
}
