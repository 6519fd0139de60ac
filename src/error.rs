//! Error type shared by the fetch, feed and configuration layers.
//!
//! Errors only travel as far as the policy boundaries (extractor, fallback
//! updater, orchestrator), where they are logged and turned into outcomes.
//! Nothing in a normal run turns a `FeedError` into a failing exit status.

use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can go wrong while producing or refreshing a feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Network failure or timeout while talking to a source.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The source answered with a non-2xx status.
    #[error("unexpected HTTP status {status} from {url}")]
    Status { url: String, status: StatusCode },

    /// The XML reader or writer rejected the document.
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Structurally broken XML that the reader accepted event by event.
    #[error("malformed feed: {0}")]
    Parse(String),

    /// A required element is absent from an existing feed.
    #[error("feed has no <{0}> element")]
    MissingElement(&'static str),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The sources file could not be deserialized.
    #[error("invalid sources config: {0}")]
    Config(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, FeedError>;
