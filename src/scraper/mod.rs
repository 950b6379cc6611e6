//! Scraper module for fetching HTML content from filmow.com
//!
//! This module provides the network retrieval capability (`Transport`), its
//! reqwest implementation with browser-like headers, and the `Scraper` that
//! layers the retry/backoff policy on top of any transport.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use thiserror::Error;
use tokio::time::sleep;

#[cfg(test)]
pub(crate) mod testing;

/// Errors that can occur during scraping operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScraperError {
    /// Network-related errors (connection timeout, DNS failure, etc.)
    #[error("Failed to connect to server: {0}")]
    NetworkError(String),

    /// HTTP non-success status code errors
    #[error("Server returned status {0}")]
    HttpError(u16),

    /// Error reading response body
    #[error("Failed to read response body: {0}")]
    ResponseError(String),

    /// The HTTP client could not be built
    #[error("Failed to build HTTP client: {0}")]
    ClientError(String),
}

impl ScraperError {
    /// Whether another attempt may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            ScraperError::NetworkError(_) | ScraperError::ResponseError(_) => true,
            ScraperError::HttpError(status) => is_retryable_status(*status),
            ScraperError::ClientError(_) => false,
        }
    }
}

/// Status codes worth another attempt
pub const RETRYABLE_STATUS: [u16; 5] = [429, 500, 502, 503, 504];

pub fn is_retryable_status(status: u16) -> bool {
    RETRYABLE_STATUS.contains(&status)
}

/// Raw answer of a transport, before any status handling
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A single GET round trip
///
/// Implementations must be usable from many concurrent page fetches.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<TransportResponse, ScraperError>;
}

/// Result of a successful page fetch
#[derive(Debug)]
pub struct ScraperResult {
    /// The HTML content of the page
    pub html: String,
    /// The HTTP status code
    pub status: u16,
}

/// Configuration for requests and the retry policy
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Maximum retries after the first attempt
    pub max_retries: u32,
    /// Base delay for exponential backoff in milliseconds
    pub backoff_base_ms: u64,
    /// Upper bound of the random jitter added to each backoff
    pub backoff_jitter_ms: u64,
    /// Whether to rotate user agents
    pub rotate_user_agent: bool,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            connect_timeout_secs: 5,
            max_retries: 5,
            backoff_base_ms: 1000,
            backoff_jitter_ms: 500,
            rotate_user_agent: true,
        }
    }
}

impl ScraperConfig {
    /// Delay before retry number `attempt` (1-based), without jitter
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        Duration::from_millis(self.backoff_base_ms.saturating_mul(1u64 << exponent))
    }
}

/// List of realistic user agents for rotation
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15",
];

/// reqwest-backed transport
///
/// The inner client pools connections and is shared by all page fetches.
pub struct HttpTransport {
    client: Client,
    rotate_user_agent: bool,
}

impl HttpTransport {
    pub fn new(config: &ScraperConfig) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| ScraperError::ClientError(e.to_string()))?;

        Ok(Self {
            client,
            rotate_user_agent: config.rotate_user_agent,
        })
    }

    fn user_agent(&self) -> &'static str {
        if self.rotate_user_agent {
            let idx = rand::thread_rng().gen_range(0..USER_AGENTS.len());
            USER_AGENTS[idx]
        } else {
            USER_AGENTS[0]
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<TransportResponse, ScraperError> {
        let response = self
            .client
            .get(url)
            .header("User-Agent", self.user_agent())
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header("Accept-Language", "pt-BR,pt;q=0.9,en-US;q=0.8,en;q=0.7")
            .header("Cache-Control", "no-cache")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ScraperError::NetworkError("Connection timeout".to_string())
                } else if e.is_connect() {
                    ScraperError::NetworkError("Failed to connect to server".to_string())
                } else {
                    ScraperError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ScraperError::ResponseError(e.to_string()))?;

        Ok(TransportResponse { status, body })
    }
}

/// Page retriever with retry and exponential backoff
pub struct Scraper<T = HttpTransport> {
    transport: T,
    config: ScraperConfig,
    request_count: AtomicUsize,
}

impl Scraper<HttpTransport> {
    /// Create a scraper talking to the network
    pub fn new(config: ScraperConfig) -> Result<Self, ScraperError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(transport, config))
    }
}

impl<T: Transport> Scraper<T> {
    /// Create a scraper on top of any transport
    pub fn with_transport(transport: T, config: ScraperConfig) -> Self {
        Self {
            transport,
            config,
            request_count: AtomicUsize::new(0),
        }
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Apply exponential backoff delay before retry number `attempt`
    async fn apply_backoff(&self, attempt: u32) {
        let mut delay = self.config.backoff_delay(attempt);
        if self.config.backoff_jitter_ms > 0 {
            let jitter = rand::thread_rng().gen_range(0..self.config.backoff_jitter_ms);
            delay += Duration::from_millis(jitter);
        }
        if !delay.is_zero() {
            sleep(delay).await;
        }
    }

    /// Fetch a page, retrying transient failures
    ///
    /// Transport errors and the statuses in [`RETRYABLE_STATUS`] are retried
    /// up to `max_retries` times, each retry logging one warning. Any other
    /// non-success status fails immediately.
    pub async fn fetch_page(&self, url: &str) -> Result<ScraperResult, ScraperError> {
        let mut attempt = 0;

        loop {
            if attempt > 0 {
                self.apply_backoff(attempt).await;
            }

            let error = match self.do_fetch(url).await {
                Ok(result) => return Ok(result),
                Err(e) => e,
            };

            if !error.is_retryable() || attempt >= self.config.max_retries {
                return Err(error);
            }

            attempt += 1;
            tracing::warn!(
                "{} for {} on attempt {}, retrying...",
                error,
                url,
                attempt
            );
        }
    }

    /// Single attempt, mapping non-success statuses to errors
    async fn do_fetch(&self, url: &str) -> Result<ScraperResult, ScraperError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);

        let response = self.transport.get(url).await?;
        if !response.is_success() {
            return Err(ScraperError::HttpError(response.status));
        }

        Ok(ScraperResult {
            html: response.body,
            status: response.status,
        })
    }

    /// Number of attempts made so far, retries included
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{count_events, FakeTransport};
    use super::*;
    use tracing::Level;

    fn fast_config(max_retries: u32) -> ScraperConfig {
        ScraperConfig {
            max_retries,
            backoff_base_ms: 0,
            backoff_jitter_ms: 0,
            ..ScraperConfig::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = ScraperConfig::default();
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.backoff_base_ms, 1000);
        assert!(config.rotate_user_agent);
    }

    #[test]
    fn test_backoff_grows_exponentially() {
        let config = ScraperConfig {
            backoff_base_ms: 100,
            ..ScraperConfig::default()
        };
        assert_eq!(config.backoff_delay(1), Duration::from_millis(100));
        assert_eq!(config.backoff_delay(2), Duration::from_millis(200));
        assert_eq!(config.backoff_delay(3), Duration::from_millis(400));
    }

    #[test]
    fn test_backoff_does_not_overflow() {
        let config = ScraperConfig {
            backoff_base_ms: u64::MAX / 2,
            ..ScraperConfig::default()
        };
        assert_eq!(config.backoff_delay(40), Duration::from_millis(u64::MAX));
    }

    #[test]
    fn test_retryable_errors() {
        assert!(ScraperError::NetworkError("timeout".to_string()).is_retryable());
        assert!(ScraperError::ResponseError("eof".to_string()).is_retryable());
        for status in RETRYABLE_STATUS {
            assert!(ScraperError::HttpError(status).is_retryable());
        }
        assert!(!ScraperError::HttpError(404).is_retryable());
        assert!(!ScraperError::HttpError(501).is_retryable());
        assert!(!ScraperError::ClientError("tls".to_string()).is_retryable());
    }

    #[test]
    fn test_http_transport_creation() {
        let transport = HttpTransport::new(&ScraperConfig::default());
        assert!(transport.is_ok());
    }

    #[test]
    fn test_user_agent_rotation() {
        let transport = HttpTransport::new(&ScraperConfig::default()).unwrap();
        assert!(USER_AGENTS.contains(&transport.user_agent()));

        let fixed = HttpTransport::new(&ScraperConfig {
            rotate_user_agent: false,
            ..ScraperConfig::default()
        })
        .unwrap();
        assert_eq!(fixed.user_agent(), USER_AGENTS[0]);
    }

    #[tokio::test]
    async fn test_fetch_page_success() {
        let transport = FakeTransport::new().route("http://x/1", vec![Ok(TransportResponse::ok("<p>hi</p>"))]);
        let scraper = Scraper::with_transport(transport, fast_config(3));

        let result = scraper.fetch_page("http://x/1").await.unwrap();
        assert_eq!(result.html, "<p>hi</p>");
        assert_eq!(result.status, 200);
        assert_eq!(scraper.request_count(), 1);
    }

    #[tokio::test]
    async fn test_fetch_page_retries_transport_failure() {
        let transport = FakeTransport::new().route(
            "http://x/1",
            vec![
                Err(ScraperError::NetworkError("Connection timeout".to_string())),
                Ok(TransportResponse::ok("done")),
            ],
        );
        let scraper = Scraper::with_transport(transport, fast_config(3));

        let (_guard, warnings) = count_events(Level::WARN);
        let result = scraper.fetch_page("http://x/1").await.unwrap();

        assert_eq!(result.html, "done");
        assert_eq!(scraper.request_count(), 2);
        assert_eq!(warnings.get(), 1);
    }

    #[tokio::test]
    async fn test_fetch_page_retries_retryable_status() {
        let transport = FakeTransport::new().route(
            "http://x/1",
            vec![
                Ok(TransportResponse::new(503, "")),
                Ok(TransportResponse::new(429, "")),
                Ok(TransportResponse::ok("done")),
            ],
        );
        let scraper = Scraper::with_transport(transport, fast_config(3));

        let result = scraper.fetch_page("http://x/1").await.unwrap();
        assert_eq!(result.html, "done");
        assert_eq!(scraper.request_count(), 3);
    }

    #[tokio::test]
    async fn test_fetch_page_gives_up_after_max_retries() {
        let transport = FakeTransport::new().route(
            "http://x/1",
            vec![Err(ScraperError::NetworkError("refused".to_string()))],
        );
        let scraper = Scraper::with_transport(transport, fast_config(2));

        let error = scraper.fetch_page("http://x/1").await.unwrap_err();
        assert_eq!(error, ScraperError::NetworkError("refused".to_string()));
        assert_eq!(scraper.request_count(), 3);
    }

    #[tokio::test]
    async fn test_fetch_page_does_not_retry_client_errors() {
        let transport = FakeTransport::new().route("http://x/1", vec![Ok(TransportResponse::new(404, ""))]);
        let scraper = Scraper::with_transport(transport, fast_config(5));

        let (_guard, warnings) = count_events(Level::WARN);
        let error = scraper.fetch_page("http://x/1").await.unwrap_err();

        assert_eq!(error, ScraperError::HttpError(404));
        assert_eq!(scraper.request_count(), 1);
        assert_eq!(warnings.get(), 0);
    }

    #[tokio::test]
    async fn test_request_counter_counts_attempts() {
        let transport = FakeTransport::new().route(
            "http://x/1",
            vec![Ok(TransportResponse::new(503, "")), Ok(TransportResponse::ok(""))],
        );
        let scraper = Scraper::with_transport(transport, fast_config(2));

        scraper.fetch_page("http://x/1").await.unwrap();
        assert_eq!(scraper.request_count(), 2);
    }
}
