//! Data models for feed channels, items and whole documents.
//!
//! This module defines the core data structures used throughout the application:
//! - [`FeedItem`]: One article scraped from a listing page
//! - [`ChannelMetadata`]: Static, per-source channel description
//! - [`FeedDocument`]: A channel plus its items and build timestamp
//!
//! Timestamps are stored in their rendered RFC-2822 form (see
//! [`crate::utils::rfc2822`]) so a document written and read back compares
//! field-for-field.

use serde::Deserialize;

use crate::utils::now_rfc2822;

/// Maximum number of items a single feed document carries.
pub const MAX_ITEMS: usize = 10;

/// A single entry in a feed.
///
/// `title`, `link` and `guid` are never empty for items produced by the
/// extractors. `description` and `pub_date` may be empty for items read back
/// from a feed that omitted them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    /// Headline text, entity-decoded.
    pub title: String,
    /// Item summary. The extractors reuse the title.
    pub description: String,
    /// Publication date in RFC-2822 form, e.g. `Wed, 23 Jul 2025 17:22:05 +0000`.
    pub pub_date: String,
    /// Absolute article URL.
    pub link: String,
    /// Stable identifier, the article URL for scraped items.
    pub guid: String,
    /// Optional image attached as an `<enclosure>`.
    pub enclosure_url: Option<String>,
}

impl FeedItem {
    /// Build a scraped item where description mirrors the title and guid
    /// mirrors the link.
    pub fn scraped(title: String, link: String, pub_date: String) -> Self {
        Self {
            description: title.clone(),
            guid: link.clone(),
            title,
            pub_date,
            link,
            enclosure_url: None,
        }
    }
}

/// Feed-level metadata, configured per source and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChannelMetadata {
    pub title: String,
    pub link: String,
    pub description: String,
    #[serde(default)]
    pub language: Option<String>,
}

/// A complete RSS document: channel, build date and ordered items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedDocument {
    pub channel: ChannelMetadata,
    /// RFC-2822 build timestamp. Empty only for documents read from a feed
    /// that never had one.
    pub last_build_date: String,
    /// Items in extraction order.
    pub items: Vec<FeedItem>,
}

impl FeedDocument {
    /// Assemble a document stamped with the current UTC time.
    ///
    /// Items past [`MAX_ITEMS`] are dropped, keeping the leading ones.
    pub fn build(channel: ChannelMetadata, mut items: Vec<FeedItem>) -> Self {
        items.truncate(MAX_ITEMS);
        Self {
            channel,
            last_build_date: now_rfc2822(),
            items,
        }
    }
}
