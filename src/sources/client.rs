// src/sources/client.rs
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::StatusCode;
use url::Url;

use crate::sources::PageFetcher;
use crate::utils::error::FetchError;

// The data site serves reduced markup to unknown clients, so look like a browser.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const DEFAULT_DELAY_MS: u64 = 1000;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP settings shared by the page fetcher and the quote provider.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    /// Per-request timeout; a timeout surfaces as `FetchError::Network`.
    pub timeout: Duration,
    /// Pause before every request.
    pub delay: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
        }
    }
}

/// Creates a reqwest client with browser-like default headers.
pub(crate) fn build_client(config: &FetchConfig) -> Result<reqwest::Client, FetchError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

    Ok(reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(config.timeout)
        .build()?)
}

/// Maps a response status to the fetch error it stands for, if any.
pub(crate) fn check_status(status: StatusCode, url: &Url) -> Result<(), FetchError> {
    if status.is_success() {
        return Ok(());
    }
    tracing::error!("HTTP error status: {} for URL: {}", status, url);
    match status {
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
            tracing::warn!("Received {} - the site is likely throttling us.", status);
            Err(FetchError::RateLimited(status))
        }
        StatusCode::NOT_FOUND => Err(FetchError::NotFound(url.to_string())),
        _ => Err(FetchError::Http(status)),
    }
}

/// Page fetcher backed by a single reqwest client, owned by the caller.
pub struct HttpPageFetcher {
    client: reqwest::Client,
    delay: Duration,
}

impl HttpPageFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        Ok(Self {
            client: build_client(config)?,
            delay: config.delay,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_page(&self, url: &Url) -> Result<String, FetchError> {
        // --- Basic Rate Limiting ---
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        tracing::debug!("GET {}", url);
        let response = self.client.get(url.clone()).send().await?;
        check_status(response.status(), url)?;

        let body = response.text().await?;
        tracing::debug!("Downloaded {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> Url {
        Url::parse("https://stockanalysis.com/stocks/aapl/").unwrap()
    }

    #[test]
    fn test_status_mapping() {
        assert!(check_status(StatusCode::OK, &url()).is_ok());
        assert!(matches!(
            check_status(StatusCode::NOT_FOUND, &url()),
            Err(FetchError::NotFound(u)) if u == url().as_str()
        ));
        assert!(matches!(
            check_status(StatusCode::TOO_MANY_REQUESTS, &url()),
            Err(FetchError::RateLimited(StatusCode::TOO_MANY_REQUESTS))
        ));
        assert!(matches!(
            check_status(StatusCode::FORBIDDEN, &url()),
            Err(FetchError::RateLimited(_))
        ));
        assert!(matches!(
            check_status(StatusCode::BAD_GATEWAY, &url()),
            Err(FetchError::Http(StatusCode::BAD_GATEWAY))
        ));
    }

    #[test]
    fn test_client_builds_from_default_config() {
        let config = FetchConfig::default();
        assert_eq!(config.delay, Duration::from_millis(1000));
        assert!(HttpPageFetcher::new(&config).is_ok());
    }
}
