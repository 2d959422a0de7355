//! Snapshot download with progress reporting

use futures::StreamExt;
use snapfind_errors::{Error, NetworkError};
use snapfind_events::{AppEvent, DownloadEvent, EventEmitter, EventSender, FailureContext};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::client::map_reqwest_error;
use crate::NetClient;

const PROGRESS_INTERVAL: Duration = Duration::from_millis(100);

/// Download operation handle
pub struct Download {
    url: Url,
}

/// Result of a download operation
#[derive(Debug, Clone)]
pub struct DownloadResult {
    pub url: String,
    pub path: PathBuf,
    pub size: u64,
    pub elapsed: Duration,
}

impl Download {
    /// Create a new download
    ///
    /// # Errors
    ///
    /// Returns an error if the provided URL is invalid or cannot be parsed.
    pub fn new(url: &str) -> Result<Self, Error> {
        let url = Url::parse(url).map_err(|e| NetworkError::InvalidUrl(e.to_string()))?;
        Ok(Self { url })
    }

    /// File name the snapshot is stored under: the last URL path segment
    ///
    /// # Errors
    ///
    /// Returns an error if the URL path has no usable final segment.
    pub fn file_name(&self) -> Result<String, Error> {
        self.url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|name| !name.is_empty() && *name != "." && *name != "..")
            .map(str::to_string)
            .ok_or_else(|| {
                NetworkError::InvalidUrl(format!("{} has no file name", self.url)).into()
            })
    }

    /// Execute the download into `dest`
    ///
    /// The body is written to a `.download` sibling first and renamed into
    /// place once complete, so an interrupted run never leaves a file that
    /// looks finished.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the server returns an error status,
    /// or the file cannot be created or written to.
    pub async fn execute(
        self,
        client: &NetClient,
        dest: &Path,
        tx: &EventSender,
    ) -> Result<DownloadResult, Error> {
        let url_str = self.url.to_string();
        let mut downloaded = 0u64;

        match self.stream_to(client, &url_str, dest, &mut downloaded, tx).await {
            Ok(result) => Ok(result),
            Err(e) => {
                tx.emit(AppEvent::Download(DownloadEvent::Failed {
                    url: url_str,
                    failure: FailureContext::from_error(&e),
                    bytes_downloaded: downloaded,
                }));
                Err(e)
            }
        }
    }

    async fn stream_to(
        &self,
        client: &NetClient,
        url: &str,
        dest: &Path,
        downloaded: &mut u64,
        tx: &EventSender,
    ) -> Result<DownloadResult, Error> {
        let started = Instant::now();
        let response = client.get(url).await?;

        if !response.status().is_success() {
            return Err(NetworkError::HttpError {
                status: response.status().as_u16(),
                message: response.status().to_string(),
            }
            .into());
        }

        let content_length = response.content_length();

        tx.emit(AppEvent::Download(DownloadEvent::Started {
            url: url.to_string(),
            dest: dest.to_path_buf(),
            total_size: content_length,
        }));

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::io_with_path(&e, parent))?;
        }

        let mut temp_name = dest.as_os_str().to_owned();
        temp_name.push(".download");
        let temp_path = PathBuf::from(temp_name);
        let file = File::create(&temp_path)
            .await
            .map_err(|e| Error::io_with_path(&e, &temp_path))?;

        if let Err(e) = copy_body(response, file, url, content_length, downloaded, tx).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(e);
        }

        if let Err(e) = tokio::fs::rename(&temp_path, dest).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(Error::io_with_path(&e, dest));
        }

        let elapsed = started.elapsed();
        tx.emit(AppEvent::Download(DownloadEvent::Progress {
            url: url.to_string(),
            bytes_downloaded: *downloaded,
            total_bytes: content_length,
        }));
        tx.emit(AppEvent::Download(DownloadEvent::Completed {
            url: url.to_string(),
            path: dest.to_path_buf(),
            size: *downloaded,
            elapsed,
        }));

        Ok(DownloadResult {
            url: url.to_string(),
            path: dest.to_path_buf(),
            size: *downloaded,
            elapsed,
        })
    }
}

/// Stream the response body into `file`, checking the declared length
async fn copy_body(
    response: reqwest::Response,
    mut file: File,
    url: &str,
    content_length: Option<u64>,
    downloaded: &mut u64,
    tx: &EventSender,
) -> Result<(), Error> {
    let mut stream = response.bytes_stream();
    let mut last_report = Instant::now();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| match map_reqwest_error(&e, url) {
            NetworkError::DownloadFailed(message) => NetworkError::StreamInterrupted {
                bytes_read: *downloaded,
                message,
            },
            other => other,
        })?;

        file.write_all(&chunk).await?;
        *downloaded += chunk.len() as u64;

        if last_report.elapsed() >= PROGRESS_INTERVAL {
            last_report = Instant::now();
            tx.emit(AppEvent::Download(DownloadEvent::Progress {
                url: url.to_string(),
                bytes_downloaded: *downloaded,
                total_bytes: content_length,
            }));
        }
    }

    file.flush().await?;

    if let Some(expected) = content_length {
        if *downloaded != expected {
            return Err(NetworkError::StreamInterrupted {
                bytes_read: *downloaded,
                message: format!("expected {expected} bytes"),
            }
            .into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_is_last_path_segment() {
        let download =
            Download::new("https://snaps.example/celestia/consensus-pruned.tar.lz4").unwrap();
        assert_eq!(download.file_name().unwrap(), "consensus-pruned.tar.lz4");

        let download = Download::new("https://snaps.example/snap.tar?token=abc").unwrap();
        assert_eq!(download.file_name().unwrap(), "snap.tar");
    }

    #[test]
    fn url_without_file_name_is_rejected() {
        let download = Download::new("https://snaps.example/").unwrap();
        assert!(download.file_name().is_err());
    }
}
