// Command-line host for the web search pipeline.
//
// Prints the aggregated results to stdout as JSON or Markdown. Logs go to
// stderr and, unless disabled, to debug.log in the cache directory.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use kodegen_tools_websearch::logging::{self, LoggingOptions};
use kodegen_tools_websearch::{ResponseFormat, WebSearchConfig, WebSearchRequest, run_web_search_rendered};

#[derive(Debug, Parser)]
#[command(name = "kodegen-websearch", version, about = "Search several engines in a real browser and extract page content")]
struct Cli {
    /// Search query
    #[arg(short, long)]
    query: String,

    /// Results to take from each engine
    #[arg(long)]
    top_k: Option<usize>,

    /// Pages crawled at the same time
    #[arg(long)]
    crawl_concurrency: Option<usize>,

    /// Character cap per extracted page
    #[arg(long)]
    max_chars: Option<usize>,

    /// Output format: json or md
    #[arg(long, default_value = "json")]
    format: ResponseFormat,

    /// Comma-separated engine names (bing, duckduckgo, baidu)
    #[arg(long, value_delimiter = ',')]
    engines: Vec<String>,

    /// Run Chromium without a window
    #[arg(long)]
    headless: bool,

    /// Move the headed window off screen
    #[arg(long)]
    offscreen: bool,

    /// Skip loading and saving cached browser state
    #[arg(long)]
    no_cache: bool,

    /// Directory for state files, the managed browser and debug.log
    #[arg(long, env = "KODEGEN_WEBSEARCH_CACHE_DIR")]
    cache_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Flags win over the environment.
    let mut builder = WebSearchConfig::builder()
        .env_overrides()
        .use_state_cache(!cli.no_cache)
        .offscreen_window(cli.offscreen);
    if cli.headless {
        builder = builder.headless(true);
    }
    if let Some(dir) = cli.cache_dir {
        builder = builder.cache_dir(dir);
    }
    let config = builder.build().context("invalid configuration")?;

    logging::init(&LoggingOptions {
        debug_log: config.debug_log().then(|| config.debug_log_path()),
    });

    let request = WebSearchRequest {
        query: cli.query,
        top_k: cli.top_k,
        crawl_concurrency: cli.crawl_concurrency,
        max_chars: cli.max_chars,
        engines: (!cli.engines.is_empty()).then_some(cli.engines),
        format: cli.format,
    };

    let output = run_web_search_rendered(&config, &request).await?;
    println!("{output}");
    Ok(())
}
