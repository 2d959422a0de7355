//! Throughput probe: bounded read window per candidate

use futures::StreamExt;
use snapfind_events::{AppEvent, EventEmitter, EventSender, ProbeEvent};
use snapfind_net::ProbeTransport;
use snapfind_types::Candidate;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::{timeout_at, Instant};

use crate::{Limiter, ProbeConfig};

/// Below this the elapsed time is too small to divide by
const MIN_ELAPSED: Duration = Duration::from_micros(100);

/// Raw result of reading one candidate's body
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub bytes_read: u64,
    pub elapsed: Duration,
    pub error: Option<String>,
}

impl Measurement {
    fn failed(elapsed: Duration, error: impl Into<String>) -> Self {
        Self {
            bytes_read: 0,
            elapsed,
            error: Some(error.into()),
        }
    }

    /// Bytes per second, 0 when nothing usable was measured
    #[must_use]
    pub fn rate(&self) -> f64 {
        if self.bytes_read == 0 || self.elapsed < MIN_ELAPSED {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let bytes = self.bytes_read as f64;
        bytes / self.elapsed.as_secs_f64()
    }
}

/// Concurrent bounded-window download tester
pub struct ThroughputProber<T> {
    transport: Arc<T>,
    window: Duration,
    limiter: Limiter,
}

impl<T> ThroughputProber<T>
where
    T: ProbeTransport + 'static,
{
    #[must_use]
    pub fn new(transport: Arc<T>, config: &ProbeConfig) -> Self {
        Self {
            transport,
            window: config.speed_test_window,
            limiter: Limiter::new(config.max_concurrency),
        }
    }

    /// Measure every candidate and record its rate and transfer estimate
    ///
    /// The output has the same candidates in the same order as the input.
    /// A candidate whose probe fails keeps a rate of 0.
    pub async fn probe(&self, mut candidates: Vec<Candidate>, tx: &EventSender) -> Vec<Candidate> {
        tx.emit(AppEvent::Probe(ProbeEvent::SpeedTestStarted {
            candidates: candidates.len(),
            window: self.window,
        }));

        let mut tasks = JoinSet::new();
        let mut slots_by_task = HashMap::with_capacity(candidates.len());

        for (index, candidate) in candidates.iter().enumerate() {
            let transport = Arc::clone(&self.transport);
            let limiter = self.limiter.clone();
            let url = candidate.url.clone();
            let window = self.window;

            tx.emit_debug(format!("Running speed test for provider {}", candidate.provider));
            let handle = tasks.spawn(async move {
                let _permit = limiter.acquire().await;
                measure(transport.as_ref(), &url, window).await
            });
            slots_by_task.insert(handle.id(), index);
        }

        let unreported = Measurement::failed(Duration::ZERO, "probe task did not report");
        let mut measurements = vec![unreported; candidates.len()];
        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((id, measurement)) => {
                    if let Some(&index) = slots_by_task.get(&id) {
                        measurements[index] = measurement;
                    }
                }
                Err(e) => {
                    if let Some(&index) = slots_by_task.get(&e.id()) {
                        measurements[index] =
                            Measurement::failed(Duration::ZERO, format!("probe task failed: {e}"));
                    }
                }
            }
        }

        for (candidate, measurement) in candidates.iter_mut().zip(measurements) {
            candidate.record_rate(measurement.rate());
            tx.emit(AppEvent::Probe(ProbeEvent::SpeedTestResult {
                provider: candidate.provider.clone(),
                bytes_read: measurement.bytes_read,
                elapsed: measurement.elapsed,
                rate: candidate.rate,
                estimated_time: candidate.estimated_time,
                error: measurement.error,
            }));
        }

        tx.emit(AppEvent::Probe(ProbeEvent::SpeedTestCompleted {
            candidates: candidates.len(),
        }));
        candidates
    }
}

/// Read `url` until end of stream or until `window` has passed since the
/// body started arriving. Opening the stream is bounded by the same window.
async fn measure<T: ProbeTransport>(transport: &T, url: &str, window: Duration) -> Measurement {
    let opened = Instant::now();
    let mut stream = match timeout_at(opened + window, transport.open_stream(url)).await {
        Ok(Ok(stream)) => stream,
        Ok(Err(e)) => return Measurement::failed(opened.elapsed(), e.to_string()),
        Err(_) => return Measurement::failed(opened.elapsed(), "timed out opening stream"),
    };

    let started = Instant::now();
    let deadline = started + window;
    let mut bytes_read = 0u64;
    let mut error = None;

    loop {
        match timeout_at(deadline, stream.next()).await {
            Ok(Some(Ok(chunk))) => bytes_read += chunk.len() as u64,
            Ok(Some(Err(e))) => {
                error = Some(e.to_string());
                break;
            }
            // end of stream, or the window closed
            Ok(None) | Err(_) => break,
        }
    }

    Measurement {
        bytes_read,
        elapsed: started.elapsed(),
        error,
    }
}
