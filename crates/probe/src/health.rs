//! Health probe: metadata request with a per-candidate deadline

use snapfind_events::{AppEvent, EventEmitter, EventSender, ProbeEvent};
use snapfind_net::{HeadResponse, ProbeTransport};
use snapfind_types::{Candidate, HealthReport};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;

use crate::{Limiter, ProbeConfig};

type HealthOutcome = Result<(HeadResponse, Duration), String>;

/// Concurrent metadata prober
pub struct HealthProber<T> {
    transport: Arc<T>,
    timeout: Duration,
    limiter: Limiter,
}

impl<T> HealthProber<T>
where
    T: ProbeTransport + 'static,
{
    #[must_use]
    pub fn new(transport: Arc<T>, config: &ProbeConfig) -> Self {
        Self {
            transport,
            timeout: config.health_timeout,
            limiter: Limiter::new(config.max_concurrency),
        }
    }

    /// Probe every candidate and keep the healthy ones, in input order
    ///
    /// Healthy means the request completed within the timeout with a 2xx
    /// status. Survivors carry their declared size (0 when the provider
    /// sent no usable `Content-Length`) and a [`HealthReport`].
    pub async fn probe(&self, candidates: Vec<Candidate>, tx: &EventSender) -> Vec<Candidate> {
        let probed = candidates.len();
        tx.emit(AppEvent::Probe(ProbeEvent::HealthCheckStarted {
            candidates: probed,
            timeout: self.timeout,
        }));

        let mut tasks = JoinSet::new();
        let mut slots_by_task = HashMap::with_capacity(probed);

        for (index, candidate) in candidates.iter().enumerate() {
            let transport = Arc::clone(&self.transport);
            let limiter = self.limiter.clone();
            let url = candidate.url.clone();
            let timeout = self.timeout;

            let handle = tasks.spawn(async move {
                let _permit = limiter.acquire().await;
                check(transport.as_ref(), &url, timeout).await
            });
            slots_by_task.insert(handle.id(), index);
        }

        let mut outcomes: Vec<Option<HealthOutcome>> = vec![None; probed];
        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((id, outcome)) => {
                    if let Some(&index) = slots_by_task.get(&id) {
                        outcomes[index] = Some(outcome);
                    }
                }
                Err(e) => {
                    if let Some(&index) = slots_by_task.get(&e.id()) {
                        outcomes[index] = Some(Err(format!("probe task failed: {e}")));
                    }
                }
            }
        }

        let mut healthy = Vec::with_capacity(probed);
        for (mut candidate, outcome) in candidates.into_iter().zip(outcomes) {
            match outcome.unwrap_or_else(|| Err("probe task did not report".to_string())) {
                Ok((head, latency)) => {
                    let size = head.declared_size();
                    let report = HealthReport {
                        status: head.status,
                        latency,
                        content_type: head.content_type.clone(),
                        accepts_ranges: head.accepts_byte_ranges(),
                    };
                    tx.emit(AppEvent::Probe(ProbeEvent::CandidateHealthy {
                        provider: candidate.provider.clone(),
                        url: candidate.url.clone(),
                        status: head.status,
                        latency,
                        content_length: head.content_length,
                        size,
                        content_type: head.content_type,
                        accepts_ranges: report.accepts_ranges,
                    }));
                    candidate.record_health(size, report);
                    healthy.push(candidate);
                }
                Err(reason) => {
                    tx.emit(AppEvent::Probe(ProbeEvent::CandidateUnhealthy {
                        provider: candidate.provider,
                        url: candidate.url,
                        reason,
                    }));
                }
            }
        }

        tx.emit(AppEvent::Probe(ProbeEvent::HealthCheckCompleted {
            healthy: healthy.len(),
            probed,
        }));
        healthy
    }
}

async fn check<T: ProbeTransport>(transport: &T, url: &str, timeout: Duration) -> HealthOutcome {
    let started = Instant::now();
    let head = match tokio::time::timeout(timeout, transport.head(url, timeout)).await {
        Ok(Ok(head)) => head,
        Ok(Err(e)) => return Err(e.to_string()),
        Err(_) => return Err(format!("no response within {}s", timeout.as_secs_f64())),
    };

    if head.is_success() {
        Ok((head, started.elapsed()))
    } else {
        Err(format!("unexpected status code {}", head.status))
    }
}
