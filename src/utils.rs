//! Utility functions for timestamps, text cleanup and file system checks.
//!
//! This module provides helper functions used throughout the application:
//! - RFC-2822 rendering of UTC timestamps for `pubDate` and `lastBuildDate`
//! - HTML entity decoding and whitespace normalisation for scraped text
//! - String truncation for logging
//! - Output directory validation

use chrono::{DateTime, Utc};
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

use crate::error::Result;

/// Render a UTC timestamp the way RSS readers expect it.
///
/// The offset is always the literal `+0000`.
///
/// # Examples
///
/// ```ignore
/// // Wed, 23 Jul 2025 17:22:05 +0000
/// rfc2822(Utc.with_ymd_and_hms(2025, 7, 23, 17, 22, 5).unwrap());
/// ```
pub fn rfc2822(dt: DateTime<Utc>) -> String {
    dt.format("%a, %d %b %Y %H:%M:%S +0000").to_string()
}

/// Current UTC time in RFC-2822 form.
pub fn now_rfc2822() -> String {
    rfc2822(Utc::now())
}

/// Decode HTML character entities left in scraped text.
///
/// The HTML parser already resolves entities once, so this handles pages that
/// double-escape their markup (`&amp;amp;`).
pub fn decode_entities(s: &str) -> String {
    html_escape::decode_html_entities(s).into_owned()
}

/// Join text fragments with single spaces, dropping blank ones.
pub fn collapse_text<'a>(fragments: impl Iterator<Item = &'a str>) -> String {
    fragments
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and a byte
/// count indicator appended. Cuts on character boundaries, so non-ASCII
/// titles are safe.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((idx, _)) => format!("{}…(+{} bytes)", &s[..idx], s.len() - idx),
    }
}

/// Ensure the feed directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then writes and removes a probe
/// file.
///
/// # Errors
///
/// Returns [`crate::error::FeedError::Io`] when the directory cannot be
/// created or written to.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).await?;
    let probe_path = path.join("..__probe_write__");
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Output directory is writable");
    Ok(())
}
