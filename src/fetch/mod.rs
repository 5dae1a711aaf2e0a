//! Transport used to retrieve robots policy documents
//!
//! The cache talks to the network through the [`RobotsFetcher`] trait so the
//! host pipeline can inject its own client and tests can substitute stubs.
//! [`HttpFetcher`] is the default reqwest-backed implementation.

use crate::config::GateConfig;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Injected transport for policy document retrieval
///
/// One GET per distinct host per process run. Implementations should honor
/// their own timeouts; cancellation is propagated by dropping the returned
/// future. Any error is treated by the cache as "no document".
#[async_trait]
pub trait RobotsFetcher: Send + Sync {
    /// Retrieves the document at `url` as text
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Default HTTP transport built on reqwest
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds the transport with the gate's timeout configuration
    ///
    /// # Arguments
    ///
    /// * `config` - Gate configuration supplying the timeouts
    /// * `user_agent` - User agent string to present when fetching documents
    ///
    /// # Returns
    ///
    /// * `Ok(HttpFetcher)` - Ready-to-use transport
    /// * `Err(reqwest::Error)` - Failed to build the underlying client
    pub fn new(config: &GateConfig, user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client })
    }

    /// Wraps an already configured reqwest client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RobotsFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_fetcher() {
        let config = GateConfig::default();
        let fetcher = HttpFetcher::new(&config, "TestBot/1.0 (+https://example.com/bot)");
        assert!(fetcher.is_ok());
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&GateConfig::default(), "TestBot/1.0").unwrap();
        let result = fetcher.fetch(&format!("{}/robots.txt", server.uri())).await;
        assert!(matches!(result, Err(FetchError::Status(404))));
    }

    #[tokio::test]
    async fn test_success_returns_body() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nAllow: /"))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&GateConfig::default(), "TestBot/1.0").unwrap();
        let body = fetcher
            .fetch(&format!("{}/robots.txt", server.uri()))
            .await
            .unwrap();
        assert_eq!(body, "User-agent: *\nAllow: /");
    }

    #[tokio::test]
    async fn test_connection_error_is_transport_error() {
        // Nothing listens on this port
        let fetcher = HttpFetcher::new(&GateConfig::default(), "TestBot/1.0").unwrap();
        let result = fetcher.fetch("http://127.0.0.1:9/robots.txt").await;
        assert!(matches!(result, Err(FetchError::Transport(_))));
    }
}
