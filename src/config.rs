use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Pages indexed when no list is configured
pub const DEFAULT_PAGES: [&str; 4] = ["index.html", "about.html", "gallery.html", "contact.html"];

/// Default cap on rendered results
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Default per-page retrieval timeout in seconds
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Base URL (http/https) or site root directory the pages are resolved against
    pub base: String,

    /// Page identifiers to index, in index order
    pub pages: Vec<String>,

    /// Maximum number of results per query
    pub max_results: usize,

    /// Timeout applied to every single page retrieval
    pub fetch_timeout_secs: u64,

    /// User agent sent with HTTP retrievals
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base: ".".to_string(),
            pages: DEFAULT_PAGES.iter().map(|p| p.to_string()).collect(),
            max_results: DEFAULT_MAX_RESULTS,
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            user_agent: format!("site-search/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    /// Read a config file. Missing fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Resolve the config for a run.
    ///
    /// An explicit path must be readable. Without one, the per-user config file
    /// is used when it exists and defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => {
                tracing::debug!("Using config file {}", path.display());
                Self::from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// `<config_dir>/site-search/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("site-search").join("config.json"))
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Whether `base` addresses a remote site rather than a local directory
    pub fn is_remote(&self) -> bool {
        url::Url::parse(&self.base).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pages() {
        let config = Config::default();
        assert_eq!(
            config.pages,
            vec!["index.html", "about.html", "gallery.html", "contact.html"]
        );
        assert_eq!(config.max_results, 10);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(10));
        assert!(!config.is_remote());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"base": "https://example.com/site/"}"#).unwrap();
        assert!(config.is_remote());
        assert_eq!(config.pages.len(), 4);
        assert_eq!(config.max_results, DEFAULT_MAX_RESULTS);
    }

    #[test]
    fn test_remote_scheme_is_case_insensitive() {
        let remote = |base: &str| Config {
            base: base.to_string(),
            ..Config::default()
        };
        assert!(remote("HTTPS://example.com/").is_remote());
        assert!(remote("Http://example.com").is_remote());
        assert!(!remote("./site").is_remote());
        assert!(!remote("/srv/http/site").is_remote());
        assert!(!remote("ftp://example.com/").is_remote());
    }
}
