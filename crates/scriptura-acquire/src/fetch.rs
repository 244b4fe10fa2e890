//! Chapter page fetcher over a shared connection pool.

use crate::error::FetchError;
use crate::retry::{with_retry, RetryPolicy};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.biblegateway.com";

#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Origin to fetch from. Overridable so tests can point at a mock server.
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: "scriptura/0.1 (bible text acquisition tool)".to_string(),
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
        }
    }
}

/// Issues one request per chapter, retrying transient failures.
///
/// The underlying reqwest client pools connections internally, so a single
/// `Fetcher` is shared across all concurrent work units.
pub struct Fetcher {
    client: reqwest::Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    /// Passage URL for one chapter, built the same way every time:
    /// `<base>/passage/?search=<Name>%20<chapter>&version=<VERSION>`.
    pub fn passage_url(&self, book_name: &str, chapter: u32, version: &str) -> String {
        format!(
            "{}/passage/?search={}%20{}&version={}",
            self.config.base_url,
            urlencoding::encode(book_name),
            chapter,
            version
        )
    }

    /// Fetch the raw markup for one chapter, retrying per the configured
    /// policy. Timeouts, connect failures, 5xx, and 429 are retried; any
    /// other non-success status fails immediately.
    pub async fn fetch(
        &self,
        version: &str,
        book_name: &str,
        chapter: u32,
    ) -> Result<String, FetchError> {
        let url = self.passage_url(book_name, chapter, version);
        with_retry(&self.config.retry, || self.fetch_once(&url)).await
    }

    async fn fetch_once(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }

        response.text().await.map_err(|e| classify(url, e))
    }
}

fn classify(url: &str, source: reqwest::Error) -> FetchError {
    if source.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: String) -> FetchConfig {
        FetchConfig {
            base_url,
            retry: RetryPolicy {
                max_attempts: 3,
                initial_delay: Duration::from_millis(5),
                max_delay: Duration::from_millis(50),
                multiplier: 2.0,
                jitter: false,
            },
            ..FetchConfig::default()
        }
    }

    #[test]
    fn test_passage_url_shape() {
        let fetcher = Fetcher::new(FetchConfig::default()).unwrap();
        assert_eq!(
            fetcher.passage_url("Jude", 1, "RVR60"),
            "https://www.biblegateway.com/passage/?search=Jude%201&version=RVR60"
        );
        // Multi-word book names are percent-encoded.
        assert_eq!(
            fetcher.passage_url("1 Kings", 3, "PDT"),
            "https://www.biblegateway.com/passage/?search=1%20Kings%203&version=PDT"
        );
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/passage/"))
            .and(query_param("search", "Jude 1"))
            .and(query_param("version", "RVR60"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>chapter</html>"))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(test_config(server.uri())).unwrap();
        let body = fetcher.fetch("RVR60", "Jude", 1).await.unwrap();
        assert_eq!(body, "<html>chapter</html>");
    }

    #[tokio::test]
    async fn test_transient_twice_then_success_makes_three_requests() {
        let server = MockServer::start().await;
        // First two requests hit the 503 mock, the third falls through to 200.
        Mock::given(method("GET"))
            .and(path("/passage/"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/passage/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(test_config(server.uri())).unwrap();
        let body = fetcher.fetch("PDT", "Ruth", 2).await.unwrap();
        assert_eq!(body, "<html>ok</html>");
        assert_eq!(server.received_requests().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_not_found_fails_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/passage/"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(test_config(server.uri())).unwrap();
        let err = fetcher.fetch("PDT", "Ruth", 2).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status, .. } if status.as_u16() == 404));
        assert_eq!(
            server.received_requests().await.unwrap().len(),
            1,
            "4xx must not be retried"
        );
    }

    #[tokio::test]
    async fn test_exhausted_retries_return_terminal_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/passage/"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(test_config(server.uri())).unwrap();
        let err = fetcher.fetch("PDT", "Ruth", 2).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status, .. } if status.as_u16() == 500));
        assert_eq!(server.received_requests().await.unwrap().len(), 3);
    }
}
