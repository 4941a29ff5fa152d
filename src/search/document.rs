use serde::{Deserialize, Serialize};

use crate::content::extract_content;

/// One indexed page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Page identifier as given in the page list
    pub path: String,
    pub title: String,
    /// Body text with whitespace collapsed
    pub text: String,
}

impl Document {
    pub fn new(
        path: impl Into<String>,
        title: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
            text: text.into(),
        }
    }

    /// Extract a document from retrieved markup, titling it by path when the
    /// page has no title of its own
    pub fn from_html(path: &str, html: &str) -> Self {
        let content = extract_content(html);
        Self {
            path: path.to_string(),
            title: content.title.unwrap_or_else(|| path.to_string()),
            text: content.text,
        }
    }
}

/// Documents in page-list order. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteIndex {
    documents: Vec<Document>,
}

impl SiteIndex {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl FromIterator<Document> for SiteIndex {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a SiteIndex {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
