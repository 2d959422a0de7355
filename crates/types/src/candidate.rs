//! Candidate records flowing through the selection pipeline

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Decimal megabyte, matching how providers advertise transfer rates
pub const BYTES_PER_MB: f64 = 1_000_000.0;

/// Observations captured by a successful health probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: u16,
    pub latency: Duration,
    pub content_type: Option<String>,
    /// Whether the provider advertises `Accept-Ranges: bytes`
    pub accepts_ranges: bool,
}

/// A provider + URL pairing under evaluation.
///
/// Created by the catalog filter, then annotated in place: the health
/// prober records `size` and `health`, the throughput prober records `rate`
/// and `estimated_time`. Each field is written by exactly one stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub provider: String,
    pub url: String,
    pub metadata_url: Option<String>,
    /// Declared size in bytes, 0 when unknown
    pub size: u64,
    /// Measured transfer rate in bytes per second, 0 until probed
    pub rate: f64,
    /// `None` until computed, and whenever size or rate is unknown
    pub estimated_time: Option<Duration>,
    pub health: Option<HealthReport>,
}

impl Candidate {
    #[must_use]
    pub fn new(
        provider: impl Into<String>,
        url: impl Into<String>,
        metadata_url: Option<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            url: url.into(),
            metadata_url,
            size: 0,
            rate: 0.0,
            estimated_time: None,
            health: None,
        }
    }

    /// Record the outcome of a successful health probe
    pub fn record_health(&mut self, size: u64, report: HealthReport) {
        self.size = size;
        self.health = Some(report);
    }

    /// Record the measured rate and derive the transfer estimate from it
    pub fn record_rate(&mut self, bytes_per_sec: f64) {
        self.rate = if bytes_per_sec.is_finite() && bytes_per_sec > 0.0 {
            bytes_per_sec
        } else {
            0.0
        };
        self.estimated_time = estimate_transfer_time(self.size, self.rate);
    }
}

/// `size / rate`, or `None` when either is unknown
#[must_use]
pub fn estimate_transfer_time(size: u64, bytes_per_sec: f64) -> Option<Duration> {
    if size == 0 || bytes_per_sec <= 0.0 || !bytes_per_sec.is_finite() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let secs = size as f64 / bytes_per_sec;
    Some(Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX))
}

/// Render a byte rate the way the CLI prints it, e.g. `5.00 MB/s`
#[must_use]
pub fn format_rate(bytes_per_sec: f64) -> String {
    format!("{:.2} MB/s", bytes_per_sec / BYTES_PER_MB)
}
