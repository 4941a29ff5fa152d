use serde::{Deserialize, Serialize};

use super::document::{Document, SiteIndex};
use super::snippet::{FoldedText, fold, snippet_at};
use crate::config::DEFAULT_MAX_RESULTS;

/// Added when the title contains the query
pub const TITLE_MATCH_SCORE: u32 = 40;

/// Added when the body contains the query at least once
pub const BODY_MATCH_SCORE: u32 = 20;

/// One ranked match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub path: String,
    pub title: String,
    pub snippet: String,
    pub score: u32,
}

/// What a query produced, as the results area should show it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "results", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// Blank query: nothing shown
    Cleared,
    /// Non-blank query without matches: show the placeholder
    NoResults,
    Results(Vec<SearchHit>),
}

impl SearchOutcome {
    pub fn hits(&self) -> &[SearchHit] {
        match self {
            SearchOutcome::Results(hits) => hits,
            _ => &[],
        }
    }

    pub fn is_cleared(&self) -> bool {
        matches!(self, SearchOutcome::Cleared)
    }
}

/// Score one document against an already folded query.
///
/// Returns `None` when nothing matched.
pub fn score_document(doc: &Document, needle: &str) -> Option<SearchHit> {
    let body = FoldedText::new(&doc.text);
    let first_match = body.find(needle);

    let mut score: u32 = 0;
    if fold(&doc.title).contains(needle) {
        score += TITLE_MATCH_SCORE;
    }
    if first_match.is_some() {
        score += BODY_MATCH_SCORE;
    }
    score = score.saturating_add(occurrence_score(body.count(needle)));

    if score == 0 {
        return None;
    }

    Some(SearchHit {
        path: doc.path.clone(),
        title: doc.title.clone(),
        snippet: first_match
            .map(|pos| snippet_at(&doc.text, pos))
            .unwrap_or_default(),
        score,
    })
}

/// Occurrence count as a score term, pinned at `u32::MAX`
fn occurrence_score(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Substring search over a [`SiteIndex`]
#[derive(Debug, Clone)]
pub struct Searcher {
    max_results: usize,
}

impl Searcher {
    pub fn new(max_results: usize) -> Self {
        Self { max_results }
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Rank every document against `query`.
    ///
    /// The query is trimmed first; a blank query clears the results. Ties keep
    /// index order.
    pub fn search(&self, index: &SiteIndex, query: &str) -> SearchOutcome {
        let query = query.trim();
        if query.is_empty() {
            return SearchOutcome::Cleared;
        }

        let needle = fold(query);
        let mut hits: Vec<SearchHit> = index
            .iter()
            .filter_map(|doc| score_document(doc, &needle))
            .collect();

        // sort_by is stable
        hits.sort_by(|a, b| b.score.cmp(&a.score));
        hits.truncate(self.max_results);

        tracing::debug!("Query {:?} matched {} documents", query, hits.len());

        if hits.is_empty() {
            SearchOutcome::NoResults
        } else {
            SearchOutcome::Results(hits)
        }
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RESULTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(path: &str, title: &str, text: &str) -> Document {
        Document::new(path, title, text)
    }

    #[test]
    fn test_title_only_match() {
        let hit = score_document(&doc("contact.html", "Contact", "write to us"), "contact").unwrap();
        assert_eq!(hit.score, 40);
        assert_eq!(hit.snippet, "");
    }

    #[test]
    fn test_title_body_and_occurrences() {
        let hit = score_document(
            &doc("gallery.html", "Gallery", "gallery one, Gallery two, GALLERY three"),
            "gallery",
        )
        .unwrap();
        assert_eq!(hit.score, 40 + 20 + 3);
    }

    #[test]
    fn test_occurrence_score_saturates() {
        assert_eq!(occurrence_score(3), 3);
        assert_eq!(occurrence_score(usize::MAX), u32::MAX);
        assert_eq!(TITLE_MATCH_SCORE.saturating_add(occurrence_score(usize::MAX)), u32::MAX);
    }

    #[test]
    fn test_no_match_is_dropped() {
        assert!(score_document(&doc("a.html", "A", "nothing here"), "zebra").is_none());
    }

    #[test]
    fn test_blank_queries_clear() {
        let index = SiteIndex::new(vec![doc("a.html", "A", "text")]);
        let searcher = Searcher::default();
        assert_eq!(searcher.search(&index, ""), SearchOutcome::Cleared);
        assert_eq!(searcher.search(&index, "   \t"), SearchOutcome::Cleared);
    }

    #[test]
    fn test_query_is_trimmed_before_matching() {
        let index = SiteIndex::new(vec![doc("a.html", "A", "we build sparkly things")]);
        let outcome = Searcher::default().search(&index, "  Sparkly ");
        assert_eq!(outcome.hits().len(), 1);
        assert_eq!(outcome.hits()[0].score, 21);
    }

    #[test]
    fn test_outcome_json_shape() {
        let json = serde_json::to_value(SearchOutcome::NoResults).unwrap();
        assert_eq!(json, serde_json::json!({"status": "no_results"}));
    }
}
