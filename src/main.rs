//! # Game News RSS
//!
//! Regenerates RSS 2.0 feeds for gaming news sites that publish no feed of
//! their own, by scraping their listing pages.
//!
//! ## Features
//!
//! - Scrapes League of Legends and VALORANT dev updates and Gamersky reviews
//! - Writes one RSS 2.0 file per source, capped at ten items
//! - When a source cannot be scraped, keeps its previous items and only
//!   refreshes `lastBuildDate`
//! - Source table replaceable through a YAML file
//!
//! ## Usage
//!
//! ```sh
//! game_news_rss -o ./feeds
//! ```
//!
//! ## Architecture
//!
//! The application runs one sequential pass:
//! 1. **Fetching**: one GET per source listing page
//! 2. **Extraction**: heuristic anchor matching into feed items
//! 3. **Output**: rebuild the feed file, or refresh its timestamp on failure
//!
//! The process always exits successfully; problems are reported in the log.

use clap::Parser;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod fetcher;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod utils;

use cli::Cli;
use config::FeedsConfig;
use fetcher::HttpFetcher;
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("game_news_rss starting up");

    let args = Cli::parse();
    debug!(?args.output_dir, ?args.sources, args.timestamp_only, "Parsed CLI arguments");

    let config = match &args.sources {
        Some(path) => match config::load_config(path).await {
            Ok(config) => config,
            Err(e) => {
                error!(path = %path.display(), error = %e, "Could not load sources; using built-in table");
                FeedsConfig::default()
            }
        },
        None => FeedsConfig::default(),
    };

    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir.display(),
            error = %e,
            "Output directory is not writable; feed writes will fail"
        );
    }

    let reports = if args.timestamp_only {
        info!("Timestamp-only mode; skipping scrape");
        pipeline::run_timestamp_only(&config.all_files(), &args.output_dir).await
    } else {
        match HttpFetcher::new() {
            Ok(fetcher) => pipeline::run_sources(&fetcher, &config.sources, &args.output_dir).await,
            Err(e) => {
                warn!(error = %e, "HTTP client unavailable; refreshing timestamps only");
                let files = config.sources.iter().map(|s| s.file.clone()).collect::<Vec<_>>();
                pipeline::run_timestamp_only(&files, &args.output_dir).await
            }
        }
    };

    pipeline::log_summary(&reports, start_time.elapsed());
}
