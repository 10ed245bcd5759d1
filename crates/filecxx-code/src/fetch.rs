//! HTTP client for the activation code page.
//!
//! One GET, no retries. Any transport error or non-2xx status is a failure.

use std::time::Duration;

use tracing::debug;

use crate::types::CodeResult;

/// User-agent the code page expects from the File Centipede client.
pub const USER_AGENT: &str = "filecxx/2.82";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Fetches the raw code page.
#[derive(Clone)]
pub struct CodePageClient {
    client: reqwest::Client,
    url: String,
}

impl CodePageClient {
    /// Create a client for `url` with the given request timeout.
    pub fn new(url: &str, timeout: Duration) -> CodeResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// The page URL this client fetches.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// GET the page and return its body.
    pub async fn fetch(&self) -> CodeResult<String> {
        debug!("Fetching {}", self.url);
        let resp = self.client.get(&self.url).send().await?;
        debug!("Response status code: {}", resp.status().as_u16());

        let body = resp.error_for_status()?.text().await?;
        debug!("Received {} bytes", body.len());
        Ok(body)
    }
}
