// Module declarations
pub mod common;
pub mod document;
pub mod indexer;
pub mod search_manager;
pub mod searcher;
pub mod snippet;

// Re-export public APIs
pub use document::{Document, SiteIndex};
pub use indexer::IndexBuilder;
pub use search_manager::SearchManager;
pub use searcher::{SearchHit, SearchOutcome, Searcher};
