use anyhow::{Context, Result};
use clap::Parser;
use site_search::config::Config;
use site_search::render::{OutputFormat, render};
use site_search::search::SearchManager;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{self, EnvFilter};

/// Index the pages of a small static site and search them
#[derive(Debug, Parser)]
#[command(name = "site-search", version)]
struct Cli {
    /// Run this query once and exit. Without it, queries are read from stdin.
    query: Option<String>,

    /// Base URL or site root directory the pages are resolved against
    #[arg(long)]
    base: Option<String>,

    /// Page to index (repeatable, replaces the configured list)
    #[arg(long = "page", value_name = "ID")]
    pages: Vec<String>,

    /// Config file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum number of results per query
    #[arg(long)]
    max_results: Option<usize>,

    /// Per-page retrieval timeout
    #[arg(long = "timeout", value_name = "SECS")]
    timeout: Option<u64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(base) = &self.base {
            config.base = base.clone();
        }
        if !self.pages.is_empty() {
            config.pages = self.pages.clone();
        }
        if let Some(max) = self.max_results {
            config.max_results = max;
        }
        if let Some(secs) = self.timeout {
            config.fetch_timeout_secs = secs;
        }
    }
}

fn init_logging(log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .init();
        return Ok(None);
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("Log file path has no file name: {}", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(Some(guard))
}

fn print_outcome(manager: &SearchManager, query: &str, format: OutputFormat) -> Result<()> {
    let output = render(&manager.search(query), format)?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

/// Each stdin line is one search against whatever has been indexed so far
async fn run_interactive(manager: Arc<SearchManager>, format: OutputFormat) -> Result<()> {
    let indexing = manager.spawn_indexing();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read query")? {
        if line.trim() == ":status" {
            println!("{}", manager.indexing_status());
            continue;
        }
        print_outcome(&manager, &line, format)?;
    }

    indexing.abort();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.log_file.as_deref())?;

    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply(&mut config);

    tracing::info!("Starting site search");
    tracing::info!("Pages: {:?}", config.pages);

    let manager = Arc::new(SearchManager::from_config(&config)?);

    match &cli.query {
        Some(query) => {
            manager.build_index().await;
            print_outcome(&manager, query, cli.format)
        }
        None => run_interactive(manager, cli.format).await,
    }
}
