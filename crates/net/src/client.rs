//! HTTP client with connection pooling

use reqwest::{Client, RequestBuilder, Response};
use snapfind_errors::{Error, NetworkError};
use std::time::Duration;

/// Network client configuration
#[derive(Debug, Clone)]
pub struct NetConfig {
    /// Whole-request timeout; `None` because snapshot bodies can take hours
    pub timeout: Option<Duration>,
    pub connect_timeout: Duration,
    pub pool_idle_timeout: Duration,
    pub pool_max_idle_per_host: usize,
    pub user_agent: String,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            connect_timeout: Duration::from_secs(30),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 10,
            user_agent: format!("snapfind/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// HTTP client wrapper shared by the catalog fetch, probes and downloads
#[derive(Clone)]
pub struct NetClient {
    client: Client,
}

impl NetClient {
    /// Create a new network client
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client fails to initialize.
    pub fn new(config: NetConfig) -> Result<Self, Error> {
        let mut builder = Client::builder()
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| NetworkError::ConnectionRefused(e.to_string()))?;

        Ok(Self { client })
    }

    /// Create with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created with default settings.
    pub fn with_defaults() -> Result<Self, Error> {
        Self::new(NetConfig::default())
    }

    /// Execute a GET request
    ///
    /// # Errors
    ///
    /// Returns an error on timeouts, connection failures or other transport errors.
    /// HTTP error statuses are returned as a normal response.
    pub async fn get(&self, url: &str) -> Result<Response, NetworkError> {
        send(self.client.get(url), url).await
    }

    /// Execute a GET request bounded by `timeout`
    ///
    /// # Errors
    ///
    /// Returns an error if the response headers do not arrive in time or the
    /// request fails at the transport level.
    pub async fn get_with_timeout(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<Response, NetworkError> {
        send(self.client.get(url).timeout(timeout), url).await
    }

    /// Execute a HEAD request bounded by `timeout`
    ///
    /// # Errors
    ///
    /// Returns an error on timeouts, connection failures or other transport errors.
    pub async fn head(&self, url: &str, timeout: Duration) -> Result<Response, NetworkError> {
        send(self.client.head(url).timeout(timeout), url).await
    }
}

async fn send(request: RequestBuilder, url: &str) -> Result<Response, NetworkError> {
    request.send().await.map_err(|e| map_reqwest_error(&e, url))
}

/// Translate a reqwest failure into the crate's network error
pub(crate) fn map_reqwest_error(error: &reqwest::Error, url: &str) -> NetworkError {
    if error.is_timeout() {
        NetworkError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        NetworkError::ConnectionRefused(error.to_string())
    } else if error.is_builder() {
        NetworkError::InvalidUrl(error.to_string())
    } else {
        NetworkError::DownloadFailed(error.to_string())
    }
}
