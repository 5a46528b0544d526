use crate::config::ScraperConfig;
use anyhow::{Context, Result};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            // forebet rejects requests that don't look like a browser
            .user_agent(config.user_agent.as_str())
            .gzip(true);

        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let inner = builder.build().context("Failed to build HTTP client")?;
        Ok(Self { inner })
    }

    /// Fetch a page as text.
    ///
    /// Returns `Ok(None)` for any status other than 200; the caller treats
    /// that as a page without rows. Transport errors are returned as-is.
    pub async fn get_page(&self, url: &Url) -> Result<Option<String>> {
        debug!("GET {}", url);

        let resp = self
            .inner
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;

        let status = resp.status();
        if status != StatusCode::OK {
            warn!("{} answered HTTP {}, skipping", url, status);
            return Ok(None);
        }

        let text = resp
            .text()
            .await
            .context("Failed to read response body")?;
        Ok(Some(text))
    }
}
