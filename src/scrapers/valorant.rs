//! VALORANT developer updates.
//!
//! Same link layout as the League listing, but the page renders much of its
//! content client-side and headlines carry no dates, so every item is stamped
//! with the scrape time.

use super::anchors::{AnchorExtractor, Dating, UntitledLinks};
use crate::models::ChannelMetadata;

pub const PAGE_URL: &str = "https://playvalorant.com/en-us/news/dev/";
pub const FEED_FILE: &str = "valorant_dev_feed.xml";

/// Build the VALORANT extractor for a listing page.
///
/// # Returns
///
/// An [`AnchorExtractor`] using the League link predicate, the
/// `VALORANT dev update` fallback title and scrape-time dating.
pub fn extractor(page_url: &str) -> AnchorExtractor {
    AnchorExtractor::new(
        page_url,
        super::league::links(),
        UntitledLinks::Fallback("VALORANT dev update".to_string()),
        Dating::ScrapeTime,
    )
}

/// Channel metadata for `valorant_dev_feed.xml`.
pub fn channel() -> ChannelMetadata {
    ChannelMetadata {
        title: "Valorant Dev News".to_string(),
        link: PAGE_URL.to_string(),
        description: "Latest development updates and diaries from the VALORANT dev team."
            .to_string(),
        language: Some("en".to_string()),
    }
}
