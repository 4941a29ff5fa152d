use anyhow::Result;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tokio::task::JoinHandle;
use tracing::info;

use super::common::IndexingStatus;
use super::document::SiteIndex;
use super::indexer::IndexBuilder;
use super::searcher::{SearchOutcome, Searcher};
use crate::config::Config;
use crate::content::{PageSource, source_for};

/// Owns the site index for the lifetime of the process.
///
/// The index is built at most once. Searches issued before the build finishes
/// see an empty index.
#[derive(Debug)]
pub struct SearchManager {
    index: OnceCell<SiteIndex>,
    builder: IndexBuilder,
    pages: Vec<String>,
    searcher: Searcher,
    indexing_status: Arc<IndexingStatus>,
}

impl SearchManager {
    pub fn new(config: &Config, source: Arc<dyn PageSource>) -> Self {
        Self {
            index: OnceCell::new(),
            builder: IndexBuilder::new(source, config.fetch_timeout()),
            pages: config.pages.clone(),
            searcher: Searcher::new(config.max_results),
            indexing_status: Arc::new(IndexingStatus::new()),
        }
    }

    /// Create a manager with the page source the config's base calls for
    pub fn from_config(config: &Config) -> Result<Self> {
        info!("Site base: {}", config.base);
        Ok(Self::new(config, source_for(config)?))
    }

    /// Build the index, or wait for the build already in progress.
    ///
    /// Later calls return the existing index without retrieving anything.
    pub async fn build_index(&self) -> &SiteIndex {
        let index = self
            .index
            .get_or_init(|| {
                self.builder
                    .build(&self.pages, Arc::clone(&self.indexing_status))
            })
            .await;

        // Only report ready once searches can see the index
        if !self.indexing_status.is_complete() {
            self.indexing_status.mark_complete();
            info!("{}", self.indexing_status.summary());
        }
        index
    }

    /// Start the build on the runtime and return immediately
    pub fn spawn_indexing(self: &Arc<Self>) -> JoinHandle<()> {
        let manager = Arc::clone(self);
        tokio::spawn(async move {
            manager.build_index().await;
        })
    }

    pub fn search(&self, query: &str) -> SearchOutcome {
        match self.index.get() {
            Some(index) => self.searcher.search(index, query),
            None => self.searcher.search(&SiteIndex::default(), query),
        }
    }

    pub fn document_count(&self) -> usize {
        self.index.get().map_or(0, SiteIndex::len)
    }

    pub fn is_indexing_complete(&self) -> bool {
        self.index.initialized()
    }

    pub fn indexing_status(&self) -> String {
        self.indexing_status.summary()
    }
}
