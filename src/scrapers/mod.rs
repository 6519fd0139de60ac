//! News source scrapers that turn listing pages into feed items.
//!
//! Every source follows the same two steps:
//!
//! 1. **Fetching**: one GET of the source's listing page via a [`PageFetcher`]
//! 2. **Extraction**: an [`Extractor`] reduces the HTML to at most
//!    [`MAX_ITEMS`](crate::models::MAX_ITEMS) ordered items
//!
//! # Supported Sources
//!
//! | Source | Module | Links kept | Dates |
//! |--------|--------|------------|-------|
//! | League of Legends dev | [`league`] | `/news/dev` or YouTube | `DD/MM/YYYY` in title, else now |
//! | VALORANT dev | [`valorant`] | `/news/dev` or YouTube | now |
//! | Gamersky reviews | [`gamersky`] | `/news/` and `.shtml` | now |
//!
//! [`scrape`] is the failure boundary: transport and parse errors are logged
//! with the source tag and reported as [`ExtractOutcome::Empty`].

pub mod anchors;
pub mod gamersky;
pub mod league;
pub mod valorant;

use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::fetcher::PageFetcher;
use crate::models::FeedItem;
use anchors::{AnchorExtractor, LinkRule};

/// Heuristic extraction of feed items from one source's listing HTML.
pub trait Extractor {
    /// Return up to ten items in document order. Never fails; a page with
    /// nothing recognisable yields an empty list.
    fn extract(&self, html: &str) -> Vec<FeedItem>;
}

/// Which built-in extraction heuristics a configured source uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractorKind {
    League,
    Valorant,
    Gamersky,
}

impl ExtractorKind {
    /// Build the extractor for a page, optionally swapping in a different
    /// link predicate.
    pub fn build(self, page_url: &str, links: Option<LinkRule>) -> AnchorExtractor {
        let extractor = match self {
            ExtractorKind::League => league::extractor(page_url),
            ExtractorKind::Valorant => valorant::extractor(page_url),
            ExtractorKind::Gamersky => gamersky::extractor(page_url),
        };
        match links {
            Some(rule) => extractor.with_rule(rule),
            None => extractor,
        }
    }
}

/// Result of one scrape attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractOutcome {
    Items(Vec<FeedItem>),
    /// Nothing usable: fetch failed, or the page had no matching links.
    Empty,
}

impl ExtractOutcome {
    fn from_items(items: Vec<FeedItem>) -> Self {
        if items.is_empty() {
            ExtractOutcome::Empty
        } else {
            ExtractOutcome::Items(items)
        }
    }
}

/// Fetch `url` and run `extractor` over it, degrading every failure to
/// [`ExtractOutcome::Empty`].
#[instrument(level = "info", skip(fetcher, extractor))]
pub async fn scrape<F, E>(fetcher: &F, extractor: &E, source: &str, url: &str) -> ExtractOutcome
where
    F: PageFetcher,
    E: Extractor + ?Sized,
{
    let html = match fetcher.fetch(url).await {
        Ok(html) => html,
        Err(e) => {
            warn!(source, error = %e, "Failed to fetch listing page");
            return ExtractOutcome::Empty;
        }
    };

    let outcome = ExtractOutcome::from_items(extractor.extract(&html));
    match &outcome {
        ExtractOutcome::Items(items) => info!(source, count = items.len(), "Extracted items"),
        ExtractOutcome::Empty => warn!(source, bytes = html.len(), "Listing page had no matching links"),
    }
    outcome
}
