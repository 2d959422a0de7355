#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Network operations for snapfind
//!
//! This crate handles all HTTP operations: fetching the providers catalog,
//! the metadata and streaming requests the probers issue, and the final
//! snapshot download.

mod client;
mod download;
mod transport;

pub use client::{NetClient, NetConfig};
pub use download::{Download, DownloadResult};
pub use transport::{ByteStream, HeadResponse, ProbeTransport};

use snapfind_errors::{Error, NetworkError};
use snapfind_events::{EventEmitter, EventSender};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Download a file with progress reporting
///
/// # Errors
///
/// Returns an error if the URL is invalid, the download fails, or there are
/// I/O errors while writing the file.
pub async fn download_file(
    client: &NetClient,
    url: &str,
    dest: &Path,
    tx: &EventSender,
) -> Result<DownloadResult, Error> {
    let download = Download::new(url)?;
    download.execute(client, dest, tx).await
}

/// Fetch text content from a URL
///
/// # Errors
///
/// Returns an error if the HTTP request fails or times out, the server returns
/// an error status, or the response body cannot be decoded as text.
pub async fn fetch_text(
    client: &NetClient,
    url: &str,
    timeout: Duration,
    tx: &EventSender,
) -> Result<String, Error> {
    tx.emit_debug(format!("Fetching text from {url}"));

    let response = client.get_with_timeout(url, timeout).await?;

    if !response.status().is_success() {
        return Err(NetworkError::HttpError {
            status: response.status().as_u16(),
            message: response.status().to_string(),
        }
        .into());
    }

    response
        .text()
        .await
        .map_err(|e| NetworkError::DownloadFailed(e.to_string()).into())
}

/// Parse and validate a URL
///
/// # Errors
///
/// Returns an error if the URL string is malformed or invalid according to RFC 3986.
pub fn parse_url(url: &str) -> Result<Url, Error> {
    Url::parse(url).map_err(|e| NetworkError::InvalidUrl(e.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url() {
        assert!(parse_url("https://example.com").is_ok());
        assert!(parse_url("not a url").is_err());
    }
}
