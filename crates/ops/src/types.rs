//! Types for operations and results

use serde::Serialize;
use snapfind_errors::Error;
use snapfind_catalog::SnapshotQuery;
use snapfind_events::SelectionKind;
use snapfind_types::{NodeType, SelectionMode, SnapshotType};
use std::path::PathBuf;
use std::time::Duration;

/// What to look for and how to choose among the results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRequest {
    pub node_type: NodeType,
    pub snapshot_type: SnapshotType,
    pub chain_id: String,
    pub mode: SelectionMode,
}

impl SnapshotRequest {
    #[must_use]
    pub fn new(
        node_type: NodeType,
        snapshot_type: SnapshotType,
        chain_id: impl Into<String>,
        mode: SelectionMode,
    ) -> Self {
        Self {
            node_type,
            snapshot_type,
            chain_id: chain_id.into(),
            mode,
        }
    }

    #[must_use]
    pub fn query(&self) -> SnapshotQuery {
        SnapshotQuery::new(self.node_type, self.snapshot_type, self.chain_id.clone())
    }
}

/// Summary of a chosen snapshot, printable without the full candidate list
#[derive(Clone, Debug, Serialize)]
pub struct SelectionReport {
    pub provider: String,
    pub url: String,
    /// Bytes per second
    pub rate: f64,
    /// Declared size in bytes, 0 when unknown
    pub size: u64,
    pub estimated_time: Option<Duration>,
    pub kind: SelectionKind,
}

/// Result of the final download
#[derive(Clone, Debug, Serialize)]
pub struct DownloadReport {
    pub provider: String,
    pub url: String,
    pub path: PathBuf,
    pub size: u64,
    pub elapsed: Duration,
}

impl DownloadReport {
    /// Size in decimal gigabytes
    #[must_use]
    pub fn size_gb(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let size = self.size as f64;
        size / 1_000_000_000.0
    }
}

/// Final result of a run, rendered by the CLI
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum OperationResult {
    /// Selection only (dry run)
    Selection(SelectionReport),
    /// Selection followed by a completed download
    Download(DownloadReport),
}

impl OperationResult {
    /// Convert to JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }
}
