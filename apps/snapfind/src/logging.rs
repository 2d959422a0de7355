//! Structured logging integration for events
//!
//! Converts pipeline events into tracing records with structured fields so a
//! debug log file can be correlated with what the terminal showed.

use snapfind_events::{
    AppEvent, CatalogEvent, DownloadEvent, EventMessage, GeneralEvent, ProbeEvent, SelectionEvent,
};
use tracing::{debug, error, info, trace, warn};

/// Log an `AppEvent` using the tracing infrastructure with structured fields
#[allow(clippy::too_many_lines)]
pub fn log_event_with_tracing(message: &EventMessage) {
    let event = &message.event;
    let meta = &message.meta;

    match event {
        AppEvent::Catalog(catalog_event) => match catalog_event {
            CatalogEvent::FetchStarted { url } => {
                debug!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    url = %url,
                    "Catalog fetch started"
                );
            }
            CatalogEvent::Fetched {
                providers,
                snapshots,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    providers = providers,
                    snapshots = snapshots,
                    "Catalog fetched"
                );
            }
            CatalogEvent::Filtered {
                type_key,
                chain_id,
                matched,
                providers,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    type_key = %type_key,
                    chain_id = %chain_id,
                    matched = matched,
                    providers = providers,
                    "Catalog filtered"
                );
            }
        },

        AppEvent::Probe(probe_event) => match probe_event {
            ProbeEvent::HealthCheckStarted {
                candidates,
                timeout,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    candidates = candidates,
                    timeout_ms = timeout.as_millis(),
                    "Health check started"
                );
            }
            ProbeEvent::CandidateHealthy {
                provider,
                url,
                status,
                latency,
                size,
                content_type,
                accepts_ranges,
                ..
            } => {
                debug!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    provider = %provider,
                    url = %url,
                    status = status,
                    latency_ms = latency.as_millis(),
                    size = size,
                    content_type = ?content_type,
                    accepts_ranges = accepts_ranges,
                    "Candidate healthy"
                );
            }
            ProbeEvent::CandidateUnhealthy {
                provider,
                url,
                reason,
            } => {
                debug!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    provider = %provider,
                    url = %url,
                    reason = %reason,
                    "Candidate unhealthy"
                );
            }
            ProbeEvent::HealthCheckCompleted { healthy, probed } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    healthy = healthy,
                    probed = probed,
                    "Health check completed"
                );
            }
            ProbeEvent::SpeedTestStarted { candidates, window } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    candidates = candidates,
                    window_ms = window.as_millis(),
                    "Speed test started"
                );
            }
            ProbeEvent::SpeedTestResult {
                provider,
                bytes_read,
                elapsed,
                rate,
                estimated_time,
                error,
            } => {
                debug!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    provider = %provider,
                    bytes_read = bytes_read,
                    elapsed_ms = elapsed.as_millis(),
                    rate = rate,
                    estimated_secs = ?estimated_time.map(|d| d.as_secs()),
                    error = ?error,
                    "Speed test result"
                );
            }
            ProbeEvent::SpeedTestCompleted { candidates } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    candidates = candidates,
                    "Speed test completed"
                );
            }
        },

        AppEvent::Selection(selection_event) => match selection_event {
            SelectionEvent::Ranked { ranked } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    candidates = ranked.len(),
                    best = ?ranked.first().map(|entry| entry.provider.as_str()),
                    "Candidates ranked"
                );
            }
            SelectionEvent::ChoiceRejected { input, max } => {
                warn!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    input = %input,
                    max = max,
                    "Choice rejected"
                );
            }
            SelectionEvent::Selected {
                provider,
                url,
                rate,
                kind,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    provider = %provider,
                    url = %url,
                    rate = rate,
                    kind = ?kind,
                    "Snapshot selected"
                );
            }
        },

        AppEvent::Download(download_event) => match download_event {
            DownloadEvent::Started {
                url,
                dest,
                total_size,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    url = %url,
                    dest = %dest.display(),
                    total_size = ?total_size,
                    "Download started"
                );
            }
            DownloadEvent::Progress {
                url,
                bytes_downloaded,
                total_bytes,
            } => {
                trace!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    url = %url,
                    bytes_downloaded = bytes_downloaded,
                    total_bytes = ?total_bytes,
                    "Download progress"
                );
            }
            DownloadEvent::Completed {
                url,
                path,
                size,
                elapsed,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    url = %url,
                    path = %path.display(),
                    size = size,
                    elapsed_ms = elapsed.as_millis(),
                    "Download completed"
                );
            }
            DownloadEvent::Failed {
                url,
                failure,
                bytes_downloaded,
            } => {
                error!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    url = %url,
                    bytes_downloaded = bytes_downloaded,
                    retryable = failure.retryable,
                    code = ?failure.code,
                    message = %failure.message,
                    hint = ?failure.hint,
                    "Download failed"
                );
            }
        },

        AppEvent::General(general_event) => match general_event {
            GeneralEvent::Notice { message } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    "{message}"
                );
            }
            GeneralEvent::Warning { message, context } => {
                warn!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    context = ?context,
                    "{message}"
                );
            }
            GeneralEvent::Error { message, details } => {
                error!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    details = ?details,
                    "{message}"
                );
            }
            GeneralEvent::DebugLog { message, context } => {
                debug!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    context = ?context,
                    "{message}"
                );
            }
            GeneralEvent::OperationStarted { operation } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    operation = %operation,
                    "Operation started"
                );
            }
            GeneralEvent::OperationCompleted { operation, success } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    operation = %operation,
                    success = success,
                    "Operation completed"
                );
            }
            GeneralEvent::OperationFailed { operation, failure } => {
                error!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    operation = %operation,
                    retryable = failure.retryable,
                    code = ?failure.code,
                    message = %failure.message,
                    hint = ?failure.hint,
                    "Operation failed"
                );
            }
        },
    }
}
