//! Probe transport abstraction
//!
//! The health and throughput probers only need two operations from the
//! network: a bounded metadata request and an open body stream. Keeping them
//! behind a trait lets the probers run against scripted transports in tests.

use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::header::{ACCEPT_RANGES, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::header::HeaderMap;
use snapfind_errors::NetworkError;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::client::map_reqwest_error;
use crate::NetClient;

/// Body of a response, chunk by chunk
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, NetworkError>> + Send>>;

/// What a metadata request reports about a snapshot URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadResponse {
    pub status: u16,
    /// Raw `Content-Length` header, unparsed
    pub content_length: Option<String>,
    pub content_type: Option<String>,
    pub accept_ranges: Option<String>,
}

impl HeadResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Declared size in bytes, 0 when absent or unparsable
    #[must_use]
    pub fn declared_size(&self) -> u64 {
        self.content_length
            .as_deref()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }

    #[must_use]
    pub fn accepts_byte_ranges(&self) -> bool {
        self.accept_ranges
            .as_deref()
            .is_some_and(|v| v.eq_ignore_ascii_case("bytes"))
    }

    fn from_headers(status: u16, headers: &HeaderMap) -> Self {
        let header = |name| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Self {
            status,
            content_length: header(CONTENT_LENGTH),
            content_type: header(CONTENT_TYPE),
            accept_ranges: header(ACCEPT_RANGES),
        }
    }
}

/// Network operations the probers depend on
pub trait ProbeTransport: Send + Sync {
    /// Issue a metadata-only request that must complete within `timeout`
    fn head(
        &self,
        url: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<HeadResponse, NetworkError>> + Send;

    /// Start a full-body request and hand back its chunk stream
    ///
    /// Non-success statuses are reported as errors.
    fn open_stream(&self, url: &str)
        -> impl Future<Output = Result<ByteStream, NetworkError>> + Send;
}

impl ProbeTransport for NetClient {
    async fn head(&self, url: &str, timeout: Duration) -> Result<HeadResponse, NetworkError> {
        let response = NetClient::head(self, url, timeout).await?;
        // reqwest's content_length() reflects the (empty) HEAD body, not the header
        Ok(HeadResponse::from_headers(
            response.status().as_u16(),
            response.headers(),
        ))
    }

    async fn open_stream(&self, url: &str) -> Result<ByteStream, NetworkError> {
        let response = self.get(url).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::HttpError {
                status: status.as_u16(),
                message: status.to_string(),
            });
        }

        let url = url.to_string();
        let stream = response
            .bytes_stream()
            .map(move |chunk| chunk.map_err(|e| map_reqwest_error(&e, &url)));
        Ok(Box::pin(stream))
    }
}
