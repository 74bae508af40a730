//! HTTP client wrapper for fetching page HTML.
//!
//! Listing and detail pages are small HTML documents, so the fetcher reads
//! the whole body into memory and uses a single bounded timeout. The
//! reference scrapers drifted between 3 and 30 seconds here; the timeout is
//! unified at 30 seconds.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, instrument};

use super::error::FetchError;
use crate::user_agent;

/// Timeout for listing and detail page fetches (30 seconds).
const FETCH_TIMEOUT_SECS: u64 = 30;

/// HTTP client for fetching page HTML.
///
/// Designed to be created once and reused across all page fetches, taking
/// advantage of connection pooling.
#[derive(Debug, Clone)]
pub struct HtmlFetcher {
    client: Client,
}

impl Default for HtmlFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlFetcher {
    /// Creates a new fetcher with the default 30 second timeout.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self::with_timeout(FETCH_TIMEOUT_SECS)
    }

    /// Creates a new fetcher with an explicit timeout value.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// timeout configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_timeout(timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .gzip(true)
            .user_agent(user_agent::default_user_agent())
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Fetches the raw HTML body of `url`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if:
    /// - The request fails (network error, timeout)
    /// - The server returns a status >= 400, in which case the error
    ///   carries the response body as diagnostic text
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::timeout(url)
            } else {
                FetchError::network(url, e)
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::network(url, e))?;

        if status.as_u16() >= 400 {
            return Err(FetchError::http_status(url, status.as_u16(), body));
        }

        debug!(bytes = body.len(), "fetched page");
        Ok(body)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_html_returns_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/dict/detail/index/4"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>entry</html>"))
            .mount(&mock_server)
            .await;

        let fetcher = HtmlFetcher::new();
        let url = format!("{}/dict/detail/index/4", mock_server.uri());

        let body = fetcher.fetch_html(&url).await.unwrap();
        assert_eq!(body, "<html>entry</html>");
    }

    #[tokio::test]
    async fn test_fetch_html_error_status_carries_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/dict/cate/index/1/default/1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error page"))
            .mount(&mock_server)
            .await;

        let fetcher = HtmlFetcher::new();
        let url = format!("{}/dict/cate/index/1/default/1", mock_server.uri());

        let result = fetcher.fetch_html(&url).await;
        match result {
            Err(FetchError::HttpStatus { status, body, .. }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "internal error page");
            }
            other => panic!("Expected HttpStatus error, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_html_timeout_maps_to_timeout_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("late")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&mock_server)
            .await;

        let fetcher = HtmlFetcher::with_timeout(1);
        let url = format!("{}/slow", mock_server.uri());

        let result = fetcher.fetch_html(&url).await;
        assert!(
            matches!(result, Err(FetchError::Timeout { .. }) | Err(FetchError::Network { .. })),
            "expected timeout or network error, got: {result:?}"
        );
    }
}
