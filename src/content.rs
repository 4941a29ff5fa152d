use anyhow::{Context, Result};
use async_trait::async_trait;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;

/// Elements whose text never shows up on the rendered page
const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Title and flattened text of one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    pub title: Option<String>,
    pub text: String,
}

/// Something that can hand out the raw markup of a page by identifier
#[async_trait]
pub trait PageSource: Send + Sync + Debug {
    /// Fetch the raw content of `page`. Any failure is reported as `Err`.
    async fn fetch(&self, page: &str) -> Result<String>;
}

/// Pick the source matching the configured base
pub fn source_for(config: &Config) -> Result<Arc<dyn PageSource>> {
    if config.is_remote() {
        Ok(Arc::new(HttpSource::new(
            &config.base,
            &config.user_agent,
            config.fetch_timeout(),
        )?))
    } else {
        Ok(Arc::new(FileSource::new(&config.base)))
    }
}

/// Retrieves pages over HTTP(S) relative to a base URL
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base: url::Url,
}

impl HttpSource {
    pub fn new(base: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        // Treat the base as a directory so "about.html" lands next to it
        let base = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{base}/")
        };
        let base = url::Url::parse(&base).with_context(|| format!("Invalid base URL: {base}"))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, base })
    }

    pub fn resolve(&self, page: &str) -> Result<url::Url> {
        self.base
            .join(page)
            .with_context(|| format!("Cannot resolve {page} against {}", self.base))
    }
}

#[async_trait]
impl PageSource for HttpSource {
    async fn fetch(&self, page: &str) -> Result<String> {
        let url = self.resolve(page)?;
        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            tracing::debug!("Fetch error for {}: {:?}", url, e);
            anyhow::anyhow!("Failed to fetch URL: {} - Error: {}", url, e)
        })?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP error for {}: status {}", url, status);
        }

        response
            .text()
            .await
            .context("Failed to read response body")
    }
}

/// Reads pages from a site root on disk
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn resolve(&self, page: &str) -> PathBuf {
        self.root.join(page.trim_start_matches('/'))
    }
}

#[async_trait]
impl PageSource for FileSource {
    async fn fetch(&self, page: &str) -> Result<String> {
        let path = self.resolve(page);
        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        // Decode like an HTTP body would: invalid bytes become U+FFFD
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Parse markup into its title and normalized text
pub fn extract_content(html: &str) -> PageContent {
    let document = Html::parse_document(html);
    PageContent {
        title: extract_title(&document),
        text: extract_text(&document),
    }
}

/// Text of the first `<title>`, trimmed. Blank titles count as missing.
fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    let element = document.select(&selector).next()?;
    let title = element.text().collect::<String>();
    let title = title.trim();
    (!title.is_empty()).then(|| title.to_string())
}

fn extract_text(document: &Html) -> String {
    let mut text = String::new();
    for node in document.tree.root().descendants() {
        let Some(fragment) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| HIDDEN_ELEMENTS.contains(&element.name()))
        });
        if !hidden {
            text.push_str(fragment);
        }
    }
    normalize_whitespace(&text)
}

/// Collapse every whitespace run to a single space and trim the ends
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
