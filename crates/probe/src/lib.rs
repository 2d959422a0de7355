#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Live network probes for snapshot candidates
//!
//! Two stages run one after the other, each fanning out one task per
//! candidate and joining all of them before returning:
//!
//! - [`HealthProber`] drops candidates that do not answer a metadata
//!   request in time and records the declared size of the rest.
//! - [`ThroughputProber`] reads each body for a fixed window and records
//!   the measured rate. It never drops a candidate.

mod health;
mod throughput;

#[cfg(test)]
pub(crate) mod mock;

pub use health::HealthProber;
pub use throughput::{Measurement, ThroughputProber};

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Probe timing and concurrency limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Deadline for each metadata request
    pub health_timeout: Duration,
    /// How long each throughput probe reads
    pub speed_test_window: Duration,
    /// Maximum simultaneous probes per stage, 0 for no limit
    pub max_concurrency: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            health_timeout: Duration::from_secs(3),
            speed_test_window: Duration::from_secs(10),
            max_concurrency: 0,
        }
    }
}

/// Optional cap on concurrently running probe tasks
#[derive(Debug, Clone)]
pub(crate) struct Limiter(Option<Arc<Semaphore>>);

impl Limiter {
    pub(crate) fn new(max_concurrency: usize) -> Self {
        Self((max_concurrency > 0).then(|| Arc::new(Semaphore::new(max_concurrency))))
    }

    /// Wait for a slot; `None` when unlimited
    pub(crate) async fn acquire(&self) -> Option<OwnedSemaphorePermit> {
        match &self.0 {
            Some(semaphore) => semaphore.clone().acquire_owned().await.ok(),
            None => None,
        }
    }
}
