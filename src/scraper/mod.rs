pub mod http_client;
pub mod parsers;

use crate::config::ScraperConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use url::Url;

use self::http_client::HttpClient;

// ── Source trait ──────────────────────────────────────────────────────────────

/// Where prediction pages come from, one page per day.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// `Ok(None)` means the site had nothing to serve for that date.
    async fn fetch_page(&self, date: NaiveDate) -> Result<Option<String>>;
}

// ── forebet scraper ───────────────────────────────────────────────────────────

pub struct ForebetScraper {
    client: HttpClient,
    base_url: Url,
}

impl ForebetScraper {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url =
            Url::parse(&base).with_context(|| format!("Invalid base URL {:?}", config.base_url))?;

        Ok(Self {
            client: HttpClient::new(config)?,
            base_url,
        })
    }

    /// URL for one day.  e.g. 2024-02-01 → …/under-over-25-goals/2024-02-01
    pub fn page_url(&self, date: NaiveDate) -> Result<Url> {
        let day = date.format("%Y-%m-%d").to_string();
        self.base_url
            .join(&day)
            .with_context(|| format!("Cannot build page URL for {}", day))
    }
}

#[async_trait]
impl PageSource for ForebetScraper {
    async fn fetch_page(&self, date: NaiveDate) -> Result<Option<String>> {
        let url = self.page_url(date)?;
        self.client
            .get_page(&url)
            .await
            .with_context(|| format!("Failed to fetch predictions for {}", date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scraper(base_url: &str) -> ForebetScraper {
        let config = ScraperConfig {
            base_url: base_url.to_string(),
            ..ScraperConfig::default()
        };
        ForebetScraper::new(&config).unwrap()
    }

    #[test]
    fn test_page_url_default_base() {
        let s = scraper(&ScraperConfig::default().base_url);
        let url = s.page_url(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.forebet.com/en/football-predictions/under-over-25-goals/2024-02-01"
        );
    }

    #[test]
    fn test_page_url_without_trailing_slash() {
        let s = scraper("https://example.test/en/football-predictions/under-over-25-goals");
        let url = s.page_url(NaiveDate::from_ymd_opt(2024, 12, 9).unwrap()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.test/en/football-predictions/under-over-25-goals/2024-12-09"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let config = ScraperConfig {
            base_url: "not a url".to_string(),
            ..ScraperConfig::default()
        };
        assert!(ForebetScraper::new(&config).is_err());
    }
}
