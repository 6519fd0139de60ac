//! HTTP access to source listing pages.
//!
//! The [`PageFetcher`] trait is the seam between the orchestrator and the
//! network. [`HttpFetcher`] is the production implementation; tests drive the
//! pipeline with in-memory fetchers instead.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, instrument};

use crate::error::{FeedError, Result};

/// Browser identification sent with every request. Several sources answer
/// 403 to generic client user agents.
pub const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36";

/// Upper bound for a single request, connect through body.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Something that can turn a URL into page HTML.
pub trait PageFetcher {
    /// Fetch `url` and return the response body.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, timeouts and non-2xx statuses.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Single-attempt HTTP fetcher with a fixed user agent and timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build the shared client with [`USER_AGENT`] and [`REQUEST_TIMEOUT`].
    ///
    /// # Returns
    ///
    /// A fetcher ready for use, or [`FeedError::Transport`] when the TLS
    /// backend cannot be initialised.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                url: url.to_string(),
                status,
            });
        }
        let body = response.text().await?;
        debug!(bytes = body.len(), %status, "Fetched page");
        Ok(body)
    }
}
