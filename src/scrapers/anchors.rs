//! Generic anchor-scanning extractor shared by every listing-page source.
//!
//! A listing page is reduced to the `<a href>` elements whose target satisfies
//! a [`LinkRule`]. Each match becomes a [`FeedItem`] titled from the anchor
//! text, in document order, until [`MAX_ITEMS`] are collected.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use serde::Deserialize;
use tracing::{debug, trace};
use url::Url;

use super::Extractor;
use crate::models::{FeedItem, MAX_ITEMS};
use crate::utils::{collapse_text, decode_entities, now_rfc2822, rfc2822, truncate_for_log};

static ANCHOR_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// `DD/MM/YYYY` anywhere in a headline, e.g. `Dev 13/07/2025`.
static INLINE_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([0-9]{2}/[0-9]{2}/[0-9]{4})").unwrap());

/// Predicate over an anchor's raw `href`.
///
/// Rules compose, and deserialize from YAML (as single-key maps, see
/// [`crate::config::SourceConfig::links`]) so a source's matching can be
/// replaced without touching the pipeline:
///
/// ```yaml
/// links:
///   all:
///     - contains: /news/
///     - ends_with: .shtml
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkRule {
    Contains(String),
    StartsWith(String),
    EndsWith(String),
    /// Matches when at least one inner rule matches.
    Any(Vec<LinkRule>),
    /// Matches when every inner rule matches.
    All(Vec<LinkRule>),
}

impl LinkRule {
    pub fn matches(&self, href: &str) -> bool {
        match self {
            LinkRule::Contains(s) => href.contains(s.as_str()),
            LinkRule::StartsWith(s) => href.starts_with(s.as_str()),
            LinkRule::EndsWith(s) => href.ends_with(s.as_str()),
            LinkRule::Any(rules) => rules.iter().any(|r| r.matches(href)),
            LinkRule::All(rules) => rules.iter().all(|r| r.matches(href)),
        }
    }
}

/// How an anchor without visible text is titled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UntitledLinks {
    /// Drop the anchor.
    Skip,
    /// Use the `title` attribute, else the given fixed string.
    Fallback(String),
}

/// How an item's `pubDate` is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dating {
    /// Always the time of the scrape.
    ScrapeTime,
    /// A `DD/MM/YYYY` date found in the title at midnight UTC, else scrape time.
    InlineDate,
}

/// Extractor that keeps every anchor matching `rule`.
#[derive(Debug, Clone)]
pub struct AnchorExtractor {
    base: Option<Url>,
    rule: LinkRule,
    untitled: UntitledLinks,
    dating: Dating,
}

impl AnchorExtractor {
    /// `page_url` is the listing page the HTML came from; relative hrefs are
    /// resolved against it.
    pub fn new(page_url: &str, rule: LinkRule, untitled: UntitledLinks, dating: Dating) -> Self {
        Self {
            base: Url::parse(page_url).ok(),
            rule,
            untitled,
            dating,
        }
    }

    /// Replace the link predicate, keeping titling and dating.
    pub fn with_rule(mut self, rule: LinkRule) -> Self {
        self.rule = rule;
        self
    }

    fn resolve(&self, href: &str) -> String {
        self.base
            .as_ref()
            .and_then(|base| base.join(href).ok())
            .map(|u| u.to_string())
            .unwrap_or_else(|| href.to_string())
    }

    fn pub_date(&self, title: &str) -> String {
        match self.dating {
            Dating::ScrapeTime => now_rfc2822(),
            Dating::InlineDate => inline_date(title).unwrap_or_else(now_rfc2822),
        }
    }
}

impl Extractor for AnchorExtractor {
    fn extract(&self, html: &str) -> Vec<FeedItem> {
        let document = Html::parse_document(html);
        let mut items = Vec::new();

        for element in document.select(&ANCHOR_SELECTOR) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            if !self.rule.matches(href) {
                continue;
            }

            let text = collapse_text(element.text());
            let title = if !text.is_empty() {
                text
            } else {
                match &self.untitled {
                    UntitledLinks::Skip => {
                        trace!(href, "Skipping anchor without text");
                        continue;
                    }
                    UntitledLinks::Fallback(default) => element
                        .value()
                        .attr("title")
                        .map(str::trim)
                        .filter(|t| !t.is_empty())
                        .unwrap_or(default.as_str())
                        .to_string(),
                }
            };

            // Decoding can surface edge whitespace such as `&amp;nbsp;`.
            let title = decode_entities(&title).trim().to_string();
            if title.is_empty() {
                continue;
            }
            let pub_date = self.pub_date(&title);
            debug!(title = %truncate_for_log(&title, 80), href, "Matched anchor");
            items.push(FeedItem::scraped(title, self.resolve(href), pub_date));

            if items.len() >= MAX_ITEMS {
                break;
            }
        }
        items
    }
}

/// Pull a `DD/MM/YYYY` date out of a headline as midnight UTC.
///
/// Only the first candidate is considered; an impossible calendar date such
/// as `31/02/2025` yields `None`.
pub fn inline_date(title: &str) -> Option<String> {
    let found = INLINE_DATE.captures(title)?.get(1)?.as_str();
    let date = NaiveDate::parse_from_str(found, "%d/%m/%Y").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?.and_utc();
    Some(rfc2822(midnight))
}
