//! Command-line interface definitions.
//!
//! Every option has a default, so running the binary with no arguments does a
//! full pass over the built-in sources in the current directory. All options
//! can also be set through environment variables, which suits cron-style
//! schedulers.

use std::path::PathBuf;

use clap::Parser;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Rebuild every built-in feed in the current directory
/// game_news_rss
///
/// # Write feeds elsewhere, using a custom source table
/// game_news_rss -o ./public -s sources.yaml
///
/// # Only bump lastBuildDate on existing feeds
/// game_news_rss --timestamp-only
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory holding the feed XML files
    #[arg(short, long, env = "FEEDS_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// YAML file replacing the built-in source table
    #[arg(short, long, env = "FEEDS_SOURCES")]
    pub sources: Option<PathBuf>,

    /// Skip scraping and only refresh lastBuildDate of existing feeds
    #[arg(long, env = "FEEDS_TIMESTAMP_ONLY")]
    pub timestamp_only: bool,
}
