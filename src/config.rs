//! Source table consumed by the orchestrator.
//!
//! The built-in table covers the three sources in [`crate::scrapers`]. A YAML
//! file can replace it entirely:
//!
//! ```yaml
//! sources:
//!   - name: league
//!     file: league_dev_feed.xml
//!     url: https://www.leagueoflegends.com/en-gb/news/dev/
//!     extractor: league
//!     channel:
//!       title: League of Legends Dev News
//!       link: https://www.leagueoflegends.com/en-gb/news/dev/
//!       description: Latest developer updates.
//!       language: en
//! fallback_files:
//!   - some_other_feed.xml
//! ```

use std::path::Path;

use serde::Deserialize;
use tokio::fs;
use tracing::{info, instrument};

use crate::error::Result;
use crate::models::ChannelMetadata;
use crate::scrapers::anchors::LinkRule;
use crate::scrapers::{ExtractorKind, gamersky, league, valorant};

/// One feed to maintain: where to scrape, how, and where to write.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceConfig {
    /// Short tag used in log lines.
    pub name: String,
    /// Feed filename, relative to the output directory.
    pub file: String,
    /// Listing page to scrape.
    pub url: String,
    pub channel: ChannelMetadata,
    pub extractor: ExtractorKind,
    /// Overrides the extractor's built-in link predicate.
    #[serde(default, deserialize_with = "serde_yaml::with::singleton_map_recursive::deserialize")]
    pub links: Option<LinkRule>,
}

/// The whole configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedsConfig {
    pub sources: Vec<SourceConfig>,
    /// Additional feed files touched only in timestamp-only mode.
    #[serde(default)]
    pub fallback_files: Vec<String>,
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            fallback_files: Vec::new(),
        }
    }
}

impl FeedsConfig {
    /// Every feed file this configuration knows about, sources first, without
    /// duplicates.
    pub fn all_files(&self) -> Vec<String> {
        let mut files: Vec<String> = Vec::new();
        for file in self
            .sources
            .iter()
            .map(|s| &s.file)
            .chain(self.fallback_files.iter())
        {
            if !files.contains(file) {
                files.push(file.clone());
            }
        }
        files
    }
}

fn source(name: &str, file: &str, url: &str, channel: ChannelMetadata, extractor: ExtractorKind) -> SourceConfig {
    SourceConfig {
        name: name.to_string(),
        file: file.to_string(),
        url: url.to_string(),
        channel,
        extractor,
        links: None,
    }
}

/// The built-in source table.
pub fn default_sources() -> Vec<SourceConfig> {
    vec![
        source("league", league::FEED_FILE, league::PAGE_URL, league::channel(), ExtractorKind::League),
        source(
            "valorant",
            valorant::FEED_FILE,
            valorant::PAGE_URL,
            valorant::channel(),
            ExtractorKind::Valorant,
        ),
        source(
            "gamersky",
            gamersky::FEED_FILE,
            gamersky::PAGE_URL,
            gamersky::channel(),
            ExtractorKind::Gamersky,
        ),
    ]
}

/// Parse a YAML source table.
pub fn parse_config(yaml: &str) -> Result<FeedsConfig> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Load a YAML source table from disk.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn load_config(path: &Path) -> Result<FeedsConfig> {
    let yaml = fs::read_to_string(path).await?;
    let config = parse_config(&yaml)?;
    info!(
        sources = config.sources.len(),
        fallback_files = config.fallback_files.len(),
        "Loaded sources config"
    );
    Ok(config)
}
