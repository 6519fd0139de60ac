//! Gamersky (游民星空) game reviews.
//!
//! Review articles live under `/news/` with a `.shtml` suffix. The listing
//! also wraps cover images in article links; those anchors have no text and
//! are dropped rather than given a placeholder title.

use super::anchors::{AnchorExtractor, Dating, LinkRule, UntitledLinks};
use crate::models::ChannelMetadata;

pub const PAGE_URL: &str = "https://www.gamersky.com/review/";
pub const FEED_FILE: &str = "gamersky_review_feed.xml";

/// Review articles: a `/news/` path ending in `.shtml`.
pub fn links() -> LinkRule {
    LinkRule::All(vec![
        LinkRule::Contains("/news/".to_string()),
        LinkRule::EndsWith(".shtml".to_string()),
    ])
}

/// Build the review extractor for a listing page.
///
/// # Returns
///
/// An [`AnchorExtractor`] that skips untitled anchors and stamps every item
/// with the scrape time.
pub fn extractor(page_url: &str) -> AnchorExtractor {
    AnchorExtractor::new(page_url, links(), UntitledLinks::Skip, Dating::ScrapeTime)
}

/// Channel metadata for `gamersky_review_feed.xml`.
pub fn channel() -> ChannelMetadata {
    ChannelMetadata {
        title: "游民星空游戏评测：最新文章".to_string(),
        link: PAGE_URL.to_string(),
        description: "游民星空游戏评分评测专题最新文章，包含标题、摘要和图片。".to_string(),
        language: Some("zh-cn".to_string()),
    }
}
