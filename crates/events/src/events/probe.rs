use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Health and throughput probe events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProbeEvent {
    /// Health probing of all candidates started
    HealthCheckStarted { candidates: usize, timeout: Duration },

    /// A candidate answered its metadata request successfully
    CandidateHealthy {
        provider: String,
        url: String,
        status: u16,
        latency: Duration,
        /// Raw `Content-Length` value if the provider sent one
        content_length: Option<String>,
        size: u64,
        content_type: Option<String>,
        accepts_ranges: bool,
    },

    /// A candidate was dropped by the health probe
    CandidateUnhealthy {
        provider: String,
        url: String,
        reason: String,
    },

    /// Every health probe has joined
    HealthCheckCompleted { healthy: usize, probed: usize },

    /// Throughput probing of all candidates started
    SpeedTestStarted { candidates: usize, window: Duration },

    /// A throughput probe finished (successfully or not)
    SpeedTestResult {
        provider: String,
        bytes_read: u64,
        elapsed: Duration,
        rate: f64,
        estimated_time: Option<Duration>,
        error: Option<String>,
    },

    /// Every throughput probe has joined
    SpeedTestCompleted { candidates: usize },
}
