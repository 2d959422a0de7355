use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::FailureContext;

/// Snapshot download events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DownloadEvent {
    /// Download started
    Started {
        url: String,
        dest: PathBuf,
        total_size: Option<u64>,
    },

    /// Bytes written so far
    Progress {
        url: String,
        bytes_downloaded: u64,
        total_bytes: Option<u64>,
    },

    /// Download completed successfully
    Completed {
        url: String,
        path: PathBuf,
        size: u64,
        elapsed: Duration,
    },

    /// Download failed
    Failed {
        url: String,
        failure: FailureContext,
        bytes_downloaded: u64,
    },
}
