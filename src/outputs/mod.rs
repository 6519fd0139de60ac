//! Feed file generation and maintenance.
//!
//! # Submodules
//!
//! - [`rss`]: Serializes a [`FeedDocument`](crate::models::FeedDocument) to RSS 2.0 and parses it back
//! - [`fallback`]: Refreshes only `lastBuildDate` of an existing feed file
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── league_dev_feed.xml
//! ├── valorant_dev_feed.xml
//! └── gamersky_review_feed.xml
//! ```

pub mod fallback;
pub mod rss;
