//! Orchestration of one full pass over the configured sources.
//!
//! Sources are handled strictly one after another. For each one:
//!
//! 1. Scrape the listing page ([`scrapers::scrape`])
//! 2. With items, rebuild the feed and overwrite its file
//! 3. Without items, refresh only `lastBuildDate` of the existing file, or
//!    skip the source when there is no file yet
//!
//! Nothing here returns an error; every failure ends up as a
//! [`SourceOutcome`] and a log line.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::fs;
use tracing::{debug, error, info, instrument, warn};

use crate::config::SourceConfig;
use crate::fetcher::PageFetcher;
use crate::models::FeedDocument;
use crate::outputs::{fallback, rss};
use crate::scrapers::{self, ExtractOutcome};

/// Why a source was left without an updated feed this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Nothing scraped and no earlier feed file to refresh.
    NoFeedFile,
    /// The earlier feed file could not be read, parsed or rewritten.
    FallbackFailed,
    /// A freshly built feed could not be written.
    WriteFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceOutcome {
    Rebuilt { items: usize },
    TimestampRefreshed { retained: usize },
    Skipped(SkipReason),
}

/// What happened to one feed file during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    pub name: String,
    pub path: PathBuf,
    pub outcome: SourceOutcome,
}

/// Scrape every source and rebuild or refresh its feed.
pub async fn run_sources<F: PageFetcher>(
    fetcher: &F,
    sources: &[SourceConfig],
    output_dir: &Path,
) -> Vec<SourceReport> {
    let mut reports = Vec::with_capacity(sources.len());
    for source in sources {
        let path = output_dir.join(&source.file);
        info!(source = %source.name, file = %source.file, "Updating feed");
        let outcome = update_source(fetcher, source, &path).await;
        reports.push(SourceReport {
            name: source.name.clone(),
            path,
            outcome,
        });
    }
    reports
}

#[instrument(level = "info", skip_all, fields(source = %source.name))]
async fn update_source<F: PageFetcher>(fetcher: &F, source: &SourceConfig, path: &Path) -> SourceOutcome {
    let extractor = source.extractor.build(&source.url, source.links.clone());
    match scrapers::scrape(fetcher, &extractor, &source.name, &source.url).await {
        ExtractOutcome::Items(items) => {
            let doc = FeedDocument::build(source.channel.clone(), items);
            match rss::write_feed(&doc, path).await {
                Ok(()) => {
                    info!(count = doc.items.len(), file = %source.file, "Wrote items");
                    SourceOutcome::Rebuilt {
                        items: doc.items.len(),
                    }
                }
                Err(e) => {
                    error!(error = %e, path = %path.display(), "Failed to write feed");
                    SourceOutcome::Skipped(SkipReason::WriteFailed)
                }
            }
        }
        ExtractOutcome::Empty => {
            info!(file = %source.file, "No items fetched; updating timestamp only");
            refresh_existing(path).await
        }
    }
}

/// Fallback path for a source that produced nothing.
async fn refresh_existing(path: &Path) -> SourceOutcome {
    if !fs::try_exists(path).await.unwrap_or(false) {
        warn!(path = %path.display(), "No existing feed to refresh; skipping");
        return SourceOutcome::Skipped(SkipReason::NoFeedFile);
    }
    match fallback::update_timestamp_only(path).await {
        Some(retained) => SourceOutcome::TimestampRefreshed { retained },
        None => SourceOutcome::Skipped(SkipReason::FallbackFailed),
    }
}

/// Timestamp-only variant: no scraping, just refresh every listed file that
/// exists. Absent files are skipped without a warning.
pub async fn run_timestamp_only(files: &[String], output_dir: &Path) -> Vec<SourceReport> {
    let mut reports = Vec::with_capacity(files.len());
    for file in files {
        let path = output_dir.join(file);
        let outcome = if fs::try_exists(&path).await.unwrap_or(false) {
            match fallback::update_timestamp_only(&path).await {
                Some(retained) => SourceOutcome::TimestampRefreshed { retained },
                None => SourceOutcome::Skipped(SkipReason::FallbackFailed),
            }
        } else {
            debug!(path = %path.display(), "Feed file absent");
            SourceOutcome::Skipped(SkipReason::NoFeedFile)
        };
        reports.push(SourceReport {
            name: file.clone(),
            path,
            outcome,
        });
    }
    reports
}

/// Log one line per source and a closing tally.
pub fn log_summary(reports: &[SourceReport], elapsed: Duration) {
    let mut rebuilt = 0;
    let mut refreshed = 0;
    let mut skipped = 0;
    for report in reports {
        match report.outcome {
            SourceOutcome::Rebuilt { .. } => rebuilt += 1,
            SourceOutcome::TimestampRefreshed { .. } => refreshed += 1,
            SourceOutcome::Skipped(_) => skipped += 1,
        }
        debug!(source = %report.name, path = %report.path.display(), outcome = ?report.outcome, "Source result");
    }
    info!(
        rebuilt,
        refreshed,
        skipped,
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
}
