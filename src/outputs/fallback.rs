//! Timestamp-only refresh of an existing feed file.
//!
//! Used when a source produced nothing this run. The document is streamed
//! through quick-xml event by event and written back untouched except for the
//! text of `rss > channel > lastBuildDate`, so items, foreign elements and
//! namespaces survive exactly as they were.

use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use tokio::fs;
use tracing::{info, instrument, warn};

use super::rss::from_xml;
use crate::error::{FeedError, Result};
use crate::utils::now_rfc2822;

/// Rewrite the first channel's `lastBuildDate` to `stamp`.
///
/// Adds an XML declaration when the input has none. An empty
/// `<lastBuildDate/>` is expanded and filled.
///
/// # Errors
///
/// [`FeedError::MissingElement`] when there is no channel or no
/// `lastBuildDate` directly under it; XML errors for malformed input.
pub fn rewrite_last_build_date(xml: &str, stamp: &str) -> Result<Vec<u8>> {
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Vec::new());

    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut seen_channel = false;
    let mut replaced = false;
    let mut replacing = false;
    let mut first = true;

    loop {
        let event = reader.read_event()?;
        if first {
            first = false;
            if !matches!(event, Event::Decl(_)) {
                writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
                writer.write_event(Event::Text(BytesText::new("\n")))?;
            }
        }

        match event {
            Event::Start(e) => {
                let name = e.name().as_ref().to_vec();
                if stack.len() == 1 && name == b"channel" && !seen_channel {
                    seen_channel = true;
                    stack.push(name);
                    writer.write_event(Event::Start(e))?;
                    continue;
                }
                let target = is_target(&stack, &name, replaced);
                stack.push(name);
                writer.write_event(Event::Start(e))?;
                if target {
                    writer.write_event(Event::Text(BytesText::new(stamp)))?;
                    replacing = true;
                    replaced = true;
                }
            }
            Event::Empty(e) => {
                let name = e.name().as_ref().to_vec();
                if is_target(&stack, &name, replaced) {
                    let tag = String::from_utf8_lossy(&name).into_owned();
                    writer.write_event(Event::Start(BytesStart::new(tag.as_str())))?;
                    writer.write_event(Event::Text(BytesText::new(stamp)))?;
                    writer.write_event(Event::End(BytesEnd::new(tag.as_str())))?;
                    replaced = true;
                } else {
                    writer.write_event(Event::Empty(e))?;
                }
            }
            Event::End(e) => {
                stack.pop();
                replacing = false;
                writer.write_event(Event::End(e))?;
            }
            Event::Text(_) | Event::CData(_) | Event::GeneralRef(_) if replacing => {}
            Event::Eof => break,
            other => writer.write_event(other)?,
        }
    }

    if !seen_channel {
        return Err(FeedError::MissingElement("channel"));
    }
    if !replaced {
        return Err(FeedError::MissingElement("lastBuildDate"));
    }
    Ok(writer.into_inner())
}

/// `name` is a `lastBuildDate` directly inside the first channel, and no
/// earlier one was rewritten.
fn is_target(stack: &[Vec<u8>], name: &[u8], replaced: bool) -> bool {
    !replaced && stack.len() == 2 && stack[1] == b"channel" && name == b"lastBuildDate"
}

/// Refresh only the build date of the feed at `path`, returning how many
/// items it retains.
///
/// The rewritten document is parsed back before it replaces the file, so a
/// feed this cannot understand is never overwritten.
pub async fn try_update_timestamp(path: &Path) -> Result<usize> {
    let xml = fs::read_to_string(path).await?;
    let rewritten = rewrite_last_build_date(&xml, &now_rfc2822())?;
    let text = String::from_utf8(rewritten).map_err(|e| FeedError::Parse(e.to_string()))?;
    let retained = from_xml(&text)?.items.len();
    fs::write(path, text).await?;
    Ok(retained)
}

/// Fallback updater: refresh `lastBuildDate` and keep prior items.
///
/// Never fails past this point. Unreadable, malformed or incomplete feeds are
/// logged and left alone, and `None` is returned.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn update_timestamp_only(path: &Path) -> Option<usize> {
    match try_update_timestamp(path).await {
        Ok(retained) => {
            info!(retained, "Refreshed lastBuildDate only");
            Some(retained)
        }
        Err(e) => {
            warn!(error = %e, "Fallback update failed; leaving feed as is");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChannelMetadata, FeedDocument, FeedItem};
    use crate::outputs::rss::to_xml;
    use chrono::DateTime;

    const STAMP: &str = "Mon, 28 Jul 2025 08:00:00 +0000";

    fn existing_feed() -> String {
        let channel = ChannelMetadata {
            title: "League of Legends Dev News".to_string(),
            link: "https://www.leagueoflegends.com/en-gb/news/dev/".to_string(),
            description: "Latest developer updates.".to_string(),
            language: Some("en".to_string()),
        };
        let items = (0..3)
            .map(|n| {
                FeedItem::scraped(
                    format!("Dev {n:02}/07/2025 & more"),
                    format!("https://www.leagueoflegends.com/en-gb/news/dev/{n}/"),
                    "Wed, 23 Jul 2025 17:22:05 +0000".to_string(),
                )
            })
            .collect();
        let mut doc = FeedDocument::build(channel, items);
        doc.last_build_date = "Thu, 24 Jul 2025 06:00:00 +0000".to_string();
        String::from_utf8(to_xml(&doc).unwrap()).unwrap()
    }

    #[test]
    fn test_only_last_build_date_changes() {
        let before = existing_feed();
        let after = String::from_utf8(rewrite_last_build_date(&before, STAMP).unwrap()).unwrap();
        assert_eq!(
            after,
            before.replace("Thu, 24 Jul 2025 06:00:00 +0000", STAMP)
        );
    }

    #[test]
    fn test_items_survive_rewrite() {
        let before = existing_feed();
        let after = String::from_utf8(rewrite_last_build_date(&before, STAMP).unwrap()).unwrap();
        let old = from_xml(&before).unwrap();
        let new = from_xml(&after).unwrap();
        assert_eq!(new.items, old.items);
        assert_eq!(new.channel, old.channel);
        assert_eq!(new.last_build_date, STAMP);
    }

    #[test]
    fn test_item_level_dates_untouched() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<rss version="2.0"><channel><title>T</title><lastBuildDate>old</lastBuildDate><item><title>I</title><lastBuildDate>keep</lastBuildDate></item><lastBuildDate>second</lastBuildDate></channel></rss>"#;
        let out = String::from_utf8(rewrite_last_build_date(xml, STAMP).unwrap()).unwrap();
        assert!(out.contains(&format!("<lastBuildDate>{STAMP}</lastBuildDate>")));
        assert!(out.contains("<lastBuildDate>keep</lastBuildDate>"));
        assert!(out.contains("<lastBuildDate>second</lastBuildDate>"));
    }

    #[test]
    fn test_empty_last_build_date_is_filled() {
        let xml = r#"<rss version="2.0"><channel><title>T</title><lastBuildDate/></channel></rss>"#;
        let out = String::from_utf8(rewrite_last_build_date(xml, STAMP).unwrap()).unwrap();
        assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(out.contains(&format!("<lastBuildDate>{STAMP}</lastBuildDate>")));
    }

    #[test]
    fn test_missing_last_build_date() {
        let xml = r#"<rss version="2.0"><channel><title>T</title></channel></rss>"#;
        let err = rewrite_last_build_date(xml, STAMP).unwrap_err();
        assert!(matches!(err, FeedError::MissingElement("lastBuildDate")));
    }

    #[test]
    fn test_missing_channel() {
        let xml = r#"<rss version="2.0"><lastBuildDate>x</lastBuildDate></rss>"#;
        let err = rewrite_last_build_date(xml, STAMP).unwrap_err();
        assert!(matches!(err, FeedError::MissingElement("channel")));
    }

    #[test]
    fn test_malformed_xml() {
        assert!(rewrite_last_build_date("<rss><channel></rss>", STAMP).is_err());
    }

    #[tokio::test]
    async fn test_update_twice_keeps_items() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("league_dev_feed.xml");
        let original = existing_feed();
        std::fs::write(&path, &original).unwrap();

        assert_eq!(update_timestamp_only(&path).await, Some(3));
        let once = std::fs::read_to_string(&path).unwrap();
        assert_eq!(update_timestamp_only(&path).await, Some(3));
        let twice = std::fs::read_to_string(&path).unwrap();

        let (before, first, second) = (
            from_xml(&original).unwrap(),
            from_xml(&once).unwrap(),
            from_xml(&twice).unwrap(),
        );
        assert_eq!(first.items, before.items);
        assert_eq!(second.items, before.items);
        assert_eq!(second.channel, before.channel);

        let prev = DateTime::parse_from_rfc2822(&before.last_build_date).unwrap();
        let next = DateTime::parse_from_rfc2822(&first.last_build_date).unwrap();
        let last = DateTime::parse_from_rfc2822(&second.last_build_date).unwrap();
        assert!(next >= prev);
        assert!(last >= next);
    }

    #[tokio::test]
    async fn test_missing_file_is_noop() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("absent.xml");
        assert_eq!(update_timestamp_only(&path).await, None);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_malformed_file_left_alone() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("broken.xml");
        std::fs::write(&path, "<rss><channel><lastBuildDate>x</rss>").unwrap();
        assert_eq!(update_timestamp_only(&path).await, None);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "<rss><channel><lastBuildDate>x</rss>"
        );
    }
}
