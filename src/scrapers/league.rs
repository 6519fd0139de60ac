//! League of Legends developer updates.
//!
//! The dev listing links both to articles on the site (`/news/dev/...`) and to
//! YouTube dev videos. Titles such as `Dev 13/07/2025` carry their own
//! publication date.

use super::anchors::{AnchorExtractor, Dating, LinkRule, UntitledLinks};
use crate::models::ChannelMetadata;

pub const PAGE_URL: &str = "https://www.leagueoflegends.com/en-gb/news/dev/";
pub const FEED_FILE: &str = "league_dev_feed.xml";

/// Dev articles on the site plus YouTube dev videos.
///
/// # Returns
///
/// The default link predicate, shared with the VALORANT listing.
pub fn links() -> LinkRule {
    LinkRule::Any(vec![
        LinkRule::Contains("/news/dev".to_string()),
        LinkRule::StartsWith("https://www.youtube.com".to_string()),
    ])
}

/// Build the League extractor for a listing page.
///
/// Untitled anchors fall back to their `title` attribute, then to
/// `League dev update`. Items are dated from `DD/MM/YYYY` in the headline.
///
/// # Returns
///
/// An [`AnchorExtractor`] resolving relative links against `page_url`.
pub fn extractor(page_url: &str) -> AnchorExtractor {
    AnchorExtractor::new(
        page_url,
        links(),
        UntitledLinks::Fallback("League dev update".to_string()),
        Dating::InlineDate,
    )
}

/// Channel metadata for `league_dev_feed.xml`.
pub fn channel() -> ChannelMetadata {
    ChannelMetadata {
        title: "League of Legends Dev News".to_string(),
        link: PAGE_URL.to_string(),
        description: "Latest developer updates and diaries from the League of Legends team."
            .to_string(),
        language: Some("en".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::Extractor;

    #[test]
    fn test_dated_title() {
        let html = r#"<a href="/en-gb/news/dev/dev-update/">Dev 13/07/2025</a>"#;
        let items = extractor(PAGE_URL).extract(html);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].pub_date, "Sun, 13 Jul 2025 00:00:00 +0000");
        assert_eq!(
            items[0].link,
            "https://www.leagueoflegends.com/en-gb/news/dev/dev-update/"
        );
    }

    #[test]
    fn test_untitled_video_gets_default() {
        let html = r#"<a href="https://www.youtube.com/watch?v=abc"><img src="thumb.jpg"></a>"#;
        let items = extractor(PAGE_URL).extract(html);
        assert_eq!(items[0].title, "League dev update");
        assert_eq!(items[0].link, "https://www.youtube.com/watch?v=abc");
    }
}
