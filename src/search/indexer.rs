use anyhow::{Result, anyhow};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::common::IndexingStatus;
use super::document::{Document, SiteIndex};
use crate::content::PageSource;

/// Builds the site index by retrieving every page concurrently
#[derive(Debug, Clone)]
pub struct IndexBuilder {
    source: Arc<dyn PageSource>,
    fetch_timeout: Duration,
}

impl IndexBuilder {
    pub fn new(source: Arc<dyn PageSource>, fetch_timeout: Duration) -> Self {
        Self {
            source,
            fetch_timeout,
        }
    }

    /// Retrieve and extract every page, then assemble the index.
    ///
    /// Resolves only after all retrievals have settled. Pages that fail, time
    /// out or come back empty are left out. Documents keep page-list order.
    /// Marking `status` complete is left to whoever publishes the index.
    pub async fn build(&self, pages: &[String], status: Arc<IndexingStatus>) -> SiteIndex {
        info!("Indexing {} pages", pages.len());
        status.begin(pages.len());

        let handles: Vec<_> = pages
            .iter()
            .map(|page| {
                let source = Arc::clone(&self.source);
                let status = Arc::clone(&status);
                let page = page.clone();
                let timeout = self.fetch_timeout;
                tokio::spawn(async move {
                    let document = index_page(source.as_ref(), &page, timeout).await;
                    match &document {
                        Some(_) => status.record_success(),
                        None => status.record_failure(),
                    }
                    document
                })
            })
            .collect();

        let mut documents = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(Some(document)) => documents.push(document),
                Ok(None) => {}
                Err(e) => {
                    status.record_failure();
                    warn!("Indexing task failed: {}", e);
                }
            }
        }

        info!(
            "All {} retrievals settled, {} documents extracted",
            pages.len(),
            documents.len()
        );
        SiteIndex::new(documents)
    }
}

/// Retrieve one page and turn it into a document, or `None` if it is dropped
async fn index_page(source: &dyn PageSource, page: &str, timeout: Duration) -> Option<Document> {
    let html = match fetch_with_timeout(source, page, timeout).await {
        Ok(html) => html,
        Err(e) => {
            warn!("Skipping {}: {:#}", page, e);
            return None;
        }
    };

    if html.is_empty() {
        warn!("Skipping {}: empty content", page);
        return None;
    }

    let document = Document::from_html(page, &html);
    debug!(
        "Indexed {} ({:?}, {} chars)",
        page,
        document.title,
        document.text.chars().count()
    );
    Some(document)
}

async fn fetch_with_timeout(source: &dyn PageSource, page: &str, timeout: Duration) -> Result<String> {
    tokio::time::timeout(timeout, source.fetch(page))
        .await
        .map_err(|_| anyhow!("retrieval timed out after {:?}", timeout))?
}
