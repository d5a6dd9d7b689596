//! Page fetching: the transport seam of the pipeline.
//!
//! The pipeline only needs "URL in, rendered page text out", expressed by
//! [`PageFetcher`]. [`HttpFetcher`] is the plain HTTP implementation over
//! `reqwest`. Sites that require JavaScript execution (infinite-scroll
//! listings) are driven through a headless-browser collaborator that
//! implements the same trait; its internals live outside this crate.

use std::time::Duration;

use reqwest::Client;

use crate::error::ScraperError;
use crate::rate_limit::retry_with_backoff;

/// Abstract page fetch capability: returns the rendered text of a page.
pub trait PageFetcher {
    /// Fetches `url` and returns the page body.
    ///
    /// # Errors
    ///
    /// Returns a fetch-class [`ScraperError`] on network failure,
    /// non-success status, or timeout.
    fn fetch(
        &self,
        url: &str,
    ) -> impl std::future::Future<Output = Result<String, ScraperError>> + Send;
}

/// Plain HTTP implementation of [`PageFetcher`].
///
/// Handles rate limiting (429), not-found (404), and other non-2xx
/// responses as typed errors. Transient failures (429, network errors)
/// are retried with exponential backoff up to `max_retries` attempts.
pub struct HttpFetcher {
    client: Client,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl HttpFetcher {
    /// Creates an `HttpFetcher` with configured timeout, `User-Agent`, and
    /// retry policy. `max_retries` is the number of additional attempts
    /// after the first failure; `0` disables retries.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_secs,
        })
    }

    async fn fetch_once(&self, url: &str) -> Result<String, ScraperError> {
        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-GB,en-US;q=0.9,en;q=0.8")
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(ScraperError::RateLimited {
                domain: extract_domain(url),
                retry_after_secs,
            });
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ScraperError::NotFound {
                url: url.to_owned(),
            });
        }

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(response.text().await?)
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ScraperError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            self.fetch_once(url)
        })
        .await
    }
}

/// Bare host of a URL, for rate-limit reporting.
fn extract_domain(url: &str) -> String {
    let without_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    without_scheme
        .split('/')
        .next()
        .unwrap_or(without_scheme)
        .to_owned()
}
