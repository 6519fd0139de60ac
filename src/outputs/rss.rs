//! RSS 2.0 serialization and parsing for [`FeedDocument`].
//!
//! # Output Structure
//!
//! ```text
//! <?xml version="1.0" encoding="utf-8"?>
//! <rss version="2.0">
//!   <channel>
//!     <title/> <link/> <description/> [<language/>]
//!     <lastBuildDate/>
//!     <item>
//!       <title/> <description/> <pubDate/> <link/> <guid/> [<enclosure/>]
//!     </item>
//!     ...
//!   </channel>
//! </rss>
//! ```
//!
//! Empty fields are left out entirely rather than written as empty elements.

use std::io::Write;
use std::path::Path;

use quick_xml::escape::unescape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use tokio::fs;
use tracing::{info, instrument};

use crate::error::{FeedError, Result};
use crate::models::{ChannelMetadata, FeedDocument, FeedItem};

/// Media type advertised on every enclosure.
const ENCLOSURE_TYPE: &str = "image/*";

fn write_text_element<W: Write>(w: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    w.write_event(Event::Start(BytesStart::new(name)))?;
    w.write_event(Event::Text(BytesText::new(text)))?;
    w.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn write_item<W: Write>(w: &mut Writer<W>, item: &FeedItem) -> Result<()> {
    w.write_event(Event::Start(BytesStart::new("item")))?;
    write_text_element(w, "title", &item.title)?;
    write_text_element(w, "description", &item.description)?;
    write_text_element(w, "pubDate", &item.pub_date)?;
    write_text_element(w, "link", &item.link)?;
    write_text_element(w, "guid", &item.guid)?;
    if let Some(url) = item.enclosure_url.as_deref().filter(|u| !u.is_empty()) {
        let mut enc = BytesStart::new("enclosure");
        enc.push_attribute(("url", url));
        enc.push_attribute(("length", "0"));
        enc.push_attribute(("type", ENCLOSURE_TYPE));
        w.write_event(Event::Empty(enc))?;
    }
    w.write_event(Event::End(BytesEnd::new("item")))?;
    Ok(())
}

/// Serialize a document to UTF-8 XML with a declaration.
pub fn to_xml(doc: &FeedDocument) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut rss_start = BytesStart::new("rss");
    rss_start.push_attribute(("version", "2.0"));
    writer.write_event(Event::Start(rss_start))?;
    writer.write_event(Event::Start(BytesStart::new("channel")))?;

    let channel = &doc.channel;
    write_text_element(&mut writer, "title", &channel.title)?;
    write_text_element(&mut writer, "link", &channel.link)?;
    write_text_element(&mut writer, "description", &channel.description)?;
    if let Some(language) = &channel.language {
        write_text_element(&mut writer, "language", language)?;
    }
    write_text_element(&mut writer, "lastBuildDate", &doc.last_build_date)?;

    for item in &doc.items {
        write_item(&mut writer, item)?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel")))?;
    writer.write_event(Event::End(BytesEnd::new("rss")))?;

    let mut out = writer.into_inner();
    out.push(b'\n');
    Ok(out)
}

/// Overwrite `path` with the serialized document.
#[instrument(level = "info", skip_all, fields(path = %path.display(), items = doc.items.len()))]
pub async fn write_feed(doc: &FeedDocument, path: &Path) -> Result<()> {
    let xml = to_xml(doc)?;
    fs::write(path, xml).await?;
    info!("Wrote feed");
    Ok(())
}

#[derive(Default)]
struct ItemBuilder {
    title: String,
    description: String,
    pub_date: String,
    link: String,
    guid: String,
    enclosure_url: Option<String>,
}

impl ItemBuilder {
    fn set(&mut self, field: &str, value: String) {
        match field {
            "title" => self.title = value,
            "description" => self.description = value,
            "pubDate" => self.pub_date = value,
            "link" => self.link = value,
            "guid" => self.guid = value,
            _ => {}
        }
    }

    fn build(self) -> FeedItem {
        FeedItem {
            title: self.title,
            description: self.description,
            pub_date: self.pub_date,
            link: self.link,
            guid: self.guid,
            enclosure_url: self.enclosure_url,
        }
    }
}

#[derive(Default)]
struct ChannelBuilder {
    title: String,
    link: String,
    description: String,
    language: Option<String>,
    last_build_date: String,
}

fn element_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}

fn unescape_text(raw: &[u8]) -> Result<String> {
    let raw = String::from_utf8_lossy(raw);
    unescape(&raw)
        .map(|s| s.into_owned())
        .map_err(|e| FeedError::Parse(e.to_string()))
}

fn enclosure_url(start: &BytesStart<'_>) -> Result<Option<String>> {
    let attr = start
        .try_get_attribute("url")
        .map_err(|e| FeedError::Parse(e.to_string()))?;
    attr.map(|a| unescape_text(&a.value)).transpose()
}

/// Parse an RSS 2.0 document back into the model.
///
/// Only the first `<channel>` under the root is read. Unknown elements are
/// ignored.
///
/// # Errors
///
/// Returns [`FeedError::MissingElement`] when there is no channel, and
/// [`FeedError::Parse`]/[`FeedError::Xml`] for malformed XML.
pub fn from_xml(xml: &str) -> Result<FeedDocument> {
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<String> = Vec::new();
    let mut text = String::new();
    let mut channel: Option<ChannelBuilder> = None;
    let mut channel_done = false;
    let mut current_item: Option<ItemBuilder> = None;
    let mut items = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = element_name(&e);
                let in_channel = stack.len() == 2 && stack[1] == "channel";
                if stack.len() == 1 && name == "channel" && channel.is_none() {
                    channel = Some(ChannelBuilder::default());
                } else if in_channel && !channel_done && name == "item" {
                    current_item = Some(ItemBuilder::default());
                } else if name == "enclosure" {
                    if let Some(item) = current_item.as_mut() {
                        item.enclosure_url = enclosure_url(&e)?;
                    }
                }
                stack.push(name);
                text.clear();
            }
            Event::Empty(e) => {
                if element_name(&e) == "enclosure" {
                    if let Some(item) = current_item.as_mut() {
                        item.enclosure_url = enclosure_url(&e)?;
                    }
                }
            }
            Event::Text(e) => text.push_str(&unescape_text(&e)?),
            Event::CData(e) => text.push_str(&String::from_utf8_lossy(&e)),
            Event::GeneralRef(e) => {
                let name = String::from_utf8_lossy(&e);
                text.push_str(&unescape_text(format!("&{name};").as_bytes())?);
            }
            Event::End(_) => {
                let Some(name) = stack.pop() else {
                    return Err(FeedError::Parse("unbalanced end tag".to_string()));
                };
                let value = text.trim().to_string();
                text.clear();

                let parent = stack.last().map(String::as_str);
                if parent == Some("item") && stack.len() == 3 {
                    if let Some(item) = current_item.as_mut() {
                        item.set(&name, value);
                    }
                } else if stack.len() == 2 && parent == Some("channel") && !channel_done {
                    if let Some(ch) = channel.as_mut() {
                        match name.as_str() {
                            "title" => ch.title = value,
                            "link" => ch.link = value,
                            "description" => ch.description = value,
                            "language" => ch.language = Some(value),
                            "lastBuildDate" => ch.last_build_date = value,
                            "item" => {
                                if let Some(item) = current_item.take() {
                                    items.push(item.build());
                                }
                            }
                            _ => {}
                        }
                    }
                } else if stack.len() == 1 && name == "channel" {
                    channel_done = true;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let ch = channel.ok_or(FeedError::MissingElement("channel"))?;
    Ok(FeedDocument {
        channel: ChannelMetadata {
            title: ch.title,
            link: ch.link,
            description: ch.description,
            language: ch.language,
        },
        last_build_date: ch.last_build_date,
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MAX_ITEMS;

    fn channel(language: Option<&str>) -> ChannelMetadata {
        ChannelMetadata {
            title: "Valorant Dev News".to_string(),
            link: "https://playvalorant.com/en-us/news/dev/".to_string(),
            description: "Latest development updates & diaries.".to_string(),
            language: language.map(str::to_string),
        }
    }

    fn item(n: usize) -> FeedItem {
        FeedItem::scraped(
            format!("Dev diary <{n}> & \"notes\""),
            format!("https://playvalorant.com/en-us/news/dev/{n}/?a=1&b=2"),
            "Wed, 23 Jul 2025 17:22:05 +0000".to_string(),
        )
    }

    fn render(doc: &FeedDocument) -> String {
        String::from_utf8(to_xml(doc).unwrap()).unwrap()
    }

    #[test]
    fn test_declaration_and_root() {
        let xml = render(&FeedDocument::build(channel(Some("en")), vec![item(1)]));
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="utf-8"?>"#));
        assert!(xml.contains(r#"<rss version="2.0">"#));
        assert_eq!(xml.matches("<channel>").count(), 1);
    }

    #[test]
    fn test_channel_element_order() {
        let xml = render(&FeedDocument::build(channel(Some("en")), vec![item(1)]));
        let order = ["<title>", "<link>", "<description>", "<language>", "<lastBuildDate>", "<item>"]
            .iter()
            .map(|tag| xml.find(tag).unwrap())
            .collect::<Vec<_>>();
        assert!(order.windows(2).all(|w| w[0] < w[1]), "{xml}");
    }

    #[test]
    fn test_item_element_order() {
        let mut it = item(1);
        it.enclosure_url = Some("https://img.example.com/cover.jpg".to_string());
        let xml = render(&FeedDocument::build(channel(None), vec![it]));
        let body = &xml[xml.find("<item>").unwrap()..];
        let order = ["<title>", "<description>", "<pubDate>", "<link>", "<guid>", "<enclosure "]
            .iter()
            .map(|tag| body.find(tag).unwrap())
            .collect::<Vec<_>>();
        assert!(order.windows(2).all(|w| w[0] < w[1]), "{xml}");
        assert!(body.contains(r#"length="0""#));
        assert!(body.contains(r#"type="image/*""#));
    }

    #[test]
    fn test_optional_fields_omitted() {
        let mut it = item(1);
        it.description.clear();
        it.pub_date.clear();
        let xml = render(&FeedDocument::build(channel(None), vec![it]));
        assert!(!xml.contains("<language>"));
        assert!(!xml.contains("<enclosure"));
        let body = &xml[xml.find("<item>").unwrap()..];
        assert!(!body.contains("<description>"));
        assert!(!body.contains("<pubDate>"));
        assert!(body.contains("<guid>"));
    }

    #[test]
    fn test_empty_enclosure_url_omitted() {
        let mut it = item(1);
        it.enclosure_url = Some(String::new());
        let xml = render(&FeedDocument::build(channel(None), vec![it]));
        assert!(!xml.contains("<enclosure"));
    }

    #[test]
    fn test_at_most_ten_items_written() {
        let items = (0..13).map(item).collect();
        let xml = render(&FeedDocument::build(channel(None), items));
        assert_eq!(xml.matches("<item>").count(), MAX_ITEMS);
    }

    #[test]
    fn test_round_trip() {
        let mut items = (0..3).map(item).collect::<Vec<_>>();
        items[1].enclosure_url = Some("https://img.example.com/a.jpg?w=1&h=2".to_string());
        let doc = FeedDocument::build(channel(Some("en")), items);
        let parsed = from_xml(&render(&doc)).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn test_round_trip_non_ascii() {
        let ch = ChannelMetadata {
            title: "游民星空游戏评测：最新文章".to_string(),
            link: "https://www.gamersky.com/review/".to_string(),
            description: "游民星空游戏评分评测专题最新文章".to_string(),
            language: Some("zh-cn".to_string()),
        };
        let it = FeedItem::scraped(
            "《死亡搁浅2》评测".to_string(),
            "https://www.gamersky.com/news/202507/1960001.shtml".to_string(),
            "Wed, 23 Jul 2025 17:22:05 +0000".to_string(),
        );
        let doc = FeedDocument::build(ch, vec![it]);
        assert_eq!(from_xml(&render(&doc)).unwrap(), doc);
    }

    #[test]
    fn test_parse_foreign_feed() {
        let xml = r#"<?xml version="1.0"?>
<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom">
<channel>
  <title>Other</title>
  <link>https://example.com/</link>
  <description><![CDATA[Some <b>bold</b> text]]></description>
  <atom:link href="https://example.com/feed.xml" rel="self"/>
  <lastBuildDate>Tue, 22 Jul 2025 10:00:00 +0000</lastBuildDate>
  <item>
    <title>First &amp; only</title>
    <link>https://example.com/1</link>
    <guid isPermaLink="true">https://example.com/1</guid>
    <enclosure url="https://example.com/1.jpg" length="0" type="image/*"></enclosure>
  </item>
</channel>
</rss>"#;
        let doc = from_xml(xml).unwrap();
        assert_eq!(doc.channel.title, "Other");
        assert_eq!(doc.channel.description, "Some <b>bold</b> text");
        assert_eq!(doc.channel.language, None);
        assert_eq!(doc.last_build_date, "Tue, 22 Jul 2025 10:00:00 +0000");
        assert_eq!(doc.items.len(), 1);
        assert_eq!(doc.items[0].title, "First & only");
        assert_eq!(doc.items[0].description, "");
        assert_eq!(doc.items[0].enclosure_url.as_deref(), Some("https://example.com/1.jpg"));
    }

    #[test]
    fn test_parse_without_channel() {
        let err = from_xml("<rss version=\"2.0\"></rss>").unwrap_err();
        assert!(matches!(err, FeedError::MissingElement("channel")));
    }

    #[test]
    fn test_parse_malformed() {
        assert!(from_xml("<rss><channel><title>x</channel></rss>").is_err());
    }

    #[tokio::test]
    async fn test_write_feed_creates_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("valorant_dev_feed.xml");
        let doc = FeedDocument::build(channel(Some("en")), vec![item(1)]);
        write_feed(&doc, &path).await.unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(from_xml(&written).unwrap(), doc);
    }
}
