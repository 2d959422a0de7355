//! Event handling and progress display

use crate::logging::log_event_with_tracing;
use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use snapfind_events::{
    AppEvent, CatalogEvent, DownloadEvent, EventMessage, GeneralEvent, ProbeEvent, SelectionEvent,
};
use snapfind_types::format_rate;

/// Severity of a rendered terminal line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Info,
    Debug,
    Warning,
    Error,
}

/// Event handler for progress display and user feedback
pub struct EventHandler {
    colors_enabled: bool,
    debug_enabled: bool,
    /// Suppress terminal output entirely (JSON mode)
    quiet: bool,
    /// Shared by every event of this invocation
    correlation_id: String,
    download_bar: Option<ProgressBar>,
}

impl EventHandler {
    /// Create new event handler
    pub fn new(colors_enabled: bool, debug_enabled: bool, quiet: bool) -> Self {
        Self {
            colors_enabled,
            debug_enabled,
            quiet,
            correlation_id: uuid::Uuid::new_v4().to_string(),
            download_bar: None,
        }
    }

    /// Handle incoming event
    pub fn handle_event(&mut self, event: AppEvent) {
        let mut message = EventMessage::from_event(event);
        message.meta = message
            .meta
            .with_correlation_id(self.correlation_id.clone());
        log_event_with_tracing(&message);

        if let AppEvent::Download(download_event) = &message.event {
            self.update_download_bar(download_event);
        }

        if self.quiet {
            return;
        }
        if let Some((kind, text)) = self.describe(&message.event) {
            let line = self.format_line(kind, &text);
            let print = || {
                if kind == LineKind::Error {
                    eprintln!("{line}");
                } else {
                    println!("{line}");
                }
            };
            match &self.download_bar {
                Some(bar) => bar.suspend(print),
                None => print(),
            }
        }
    }

    /// Terminal line for an event, if it should be shown at all
    pub fn describe(&self, event: &AppEvent) -> Option<(LineKind, String)> {
        let (kind, text) = match event {
            AppEvent::General(general) => match general {
                GeneralEvent::Notice { message } => (LineKind::Info, message.clone()),
                GeneralEvent::Warning { message, context } => match context {
                    Some(context) => (LineKind::Warning, format!("{message} ({context})")),
                    None => (LineKind::Warning, message.clone()),
                },
                GeneralEvent::Error { message, details } => match details {
                    Some(details) => (LineKind::Error, format!("{message}: {details}")),
                    None => (LineKind::Error, message.clone()),
                },
                GeneralEvent::DebugLog { message, .. } => (LineKind::Debug, message.clone()),
                GeneralEvent::OperationStarted { operation } => {
                    (LineKind::Debug, format!("{operation} started"))
                }
                GeneralEvent::OperationCompleted { operation, success } => (
                    LineKind::Debug,
                    format!("{operation} completed (success: {success})"),
                ),
                // The final error is printed once by main
                GeneralEvent::OperationFailed { operation, failure } => (
                    LineKind::Debug,
                    format!("{operation} failed: {}", failure.message),
                ),
            },

            AppEvent::Catalog(catalog) => match catalog {
                CatalogEvent::FetchStarted { url } => {
                    (LineKind::Debug, format!("Fetching providers catalog from {url}"))
                }
                CatalogEvent::Fetched {
                    providers,
                    snapshots,
                } => (
                    LineKind::Debug,
                    format!("Catalog lists {snapshots} snapshots from {providers} providers"),
                ),
                CatalogEvent::Filtered {
                    matched, providers, ..
                } => (
                    LineKind::Info,
                    format!("Found {matched} matching snapshots from {providers} providers"),
                ),
            },

            AppEvent::Probe(probe) => match probe {
                ProbeEvent::HealthCheckStarted {
                    candidates,
                    timeout,
                } => (
                    LineKind::Debug,
                    format!("Checking {candidates} snapshots (timeout {timeout:?})"),
                ),
                ProbeEvent::CandidateHealthy {
                    provider,
                    status,
                    latency,
                    size,
                    ..
                } => (
                    LineKind::Debug,
                    format!(
                        "{provider}: healthy (HTTP {status}, {} ms, {size} bytes)",
                        latency.as_millis()
                    ),
                ),
                ProbeEvent::CandidateUnhealthy {
                    provider, reason, ..
                } => (LineKind::Debug, format!("{provider}: unhealthy ({reason})")),
                ProbeEvent::HealthCheckCompleted { healthy, .. } => (
                    LineKind::Info,
                    format!("{healthy} snapshots are healthy and ready for download"),
                ),
                ProbeEvent::SpeedTestStarted { .. } => {
                    (LineKind::Info, "Testing download speeds...".to_string())
                }
                ProbeEvent::SpeedTestResult {
                    provider,
                    bytes_read,
                    elapsed,
                    rate,
                    error,
                    ..
                } => {
                    let mut text = format!(
                        "{provider}: {} ({bytes_read} bytes in {elapsed:.2?})",
                        format_rate(*rate)
                    );
                    if let Some(error) = error {
                        text.push_str(&format!(", stopped early: {error}"));
                    }
                    (LineKind::Debug, text)
                }
                ProbeEvent::SpeedTestCompleted { .. } => return None,
            },

            AppEvent::Selection(selection) => match selection {
                SelectionEvent::Ranked { ranked } => {
                    let entries: Vec<String> = ranked
                        .iter()
                        .map(|entry| {
                            format!(
                                "{}. {} ({})",
                                entry.position,
                                entry.provider,
                                format_rate(entry.rate)
                            )
                        })
                        .collect();
                    (LineKind::Debug, format!("Ranking: {}", entries.join(", ")))
                }
                SelectionEvent::ChoiceRejected { input, max } => (
                    LineKind::Debug,
                    format!("Rejected choice {input:?} (valid: 1-{max})"),
                ),
                SelectionEvent::Selected { provider, kind, .. } => {
                    (LineKind::Debug, format!("Chose {provider} ({kind:?})"))
                }
            },

            AppEvent::Download(download) => match download {
                DownloadEvent::Started { url, dest, .. } => (
                    LineKind::Debug,
                    format!("Downloading {url} to {}", dest.display()),
                ),
                DownloadEvent::Progress { .. } => return None,
                DownloadEvent::Completed { elapsed, .. } => {
                    (LineKind::Debug, format!("Download finished in {elapsed:.1?}"))
                }
                DownloadEvent::Failed { failure, .. } => (
                    LineKind::Error,
                    format!("Download failed: {}", failure.message),
                ),
            },
        };

        if kind == LineKind::Debug && !self.debug_enabled {
            return None;
        }
        Some((kind, text))
    }

    fn format_line(&self, kind: LineKind, text: &str) -> String {
        let prefix = match kind {
            LineKind::Info => "[INFO]".to_string(),
            LineKind::Debug => format!(
                "[DEBUG] {}",
                chrono::Local::now().format("%H:%M:%S%.3f")
            ),
            LineKind::Warning => "[WARN]".to_string(),
            LineKind::Error => "[ERROR]".to_string(),
        };
        if !self.colors_enabled {
            return format!("{prefix} {text}");
        }
        let styled = match kind {
            LineKind::Info => style(prefix).cyan(),
            LineKind::Debug | LineKind::Warning => style(prefix).yellow(),
            LineKind::Error => style(prefix).red().bold(),
        };
        format!("{styled} {text}")
    }

    fn update_download_bar(&mut self, event: &DownloadEvent) {
        match event {
            DownloadEvent::Started { total_size, .. } => {
                let bar = match total_size {
                    Some(total) => ProgressBar::new(*total),
                    None => ProgressBar::new_spinner(),
                };
                if self.quiet {
                    bar.set_draw_target(ProgressDrawTarget::hidden());
                }
                if let Ok(bar_style) = ProgressStyle::default_bar()
                    .template("{msg} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})")
                {
                    bar.set_style(bar_style.progress_chars("#>-"));
                }
                bar.set_message("Downloading");
                self.download_bar = Some(bar);
            }
            DownloadEvent::Progress {
                bytes_downloaded,
                total_bytes,
                ..
            } => {
                if let Some(bar) = &self.download_bar {
                    if let Some(total) = total_bytes {
                        bar.set_length(*total);
                    }
                    bar.set_position(*bytes_downloaded);
                }
            }
            DownloadEvent::Completed { .. } => {
                if let Some(bar) = self.download_bar.take() {
                    bar.finish_and_clear();
                }
            }
            DownloadEvent::Failed { .. } => {
                if let Some(bar) = self.download_bar.take() {
                    bar.abandon();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapfind_events::FailureContext;
    use std::path::PathBuf;
    use std::time::Duration;

    fn filtered() -> AppEvent {
        AppEvent::Catalog(CatalogEvent::Filtered {
            type_key: "consensus-pruned".into(),
            chain_id: "celestia".into(),
            matched: 4,
            providers: 3,
        })
    }

    #[test]
    fn milestones_render_as_info() {
        let handler = EventHandler::new(false, false, false);
        let (kind, text) = handler.describe(&filtered()).unwrap();
        assert_eq!(kind, LineKind::Info);
        assert_eq!(text, "Found 4 matching snapshots from 3 providers");
        assert_eq!(
            handler.format_line(kind, &text),
            "[INFO] Found 4 matching snapshots from 3 providers"
        );

        let healthy = AppEvent::Probe(ProbeEvent::HealthCheckCompleted {
            healthy: 2,
            probed: 4,
        });
        assert_eq!(
            handler.describe(&healthy).unwrap().1,
            "2 snapshots are healthy and ready for download"
        );
    }

    #[test]
    fn per_candidate_detail_needs_debug() {
        let event = AppEvent::Probe(ProbeEvent::CandidateUnhealthy {
            provider: "beta".into(),
            url: "http://b/snap.tar".into(),
            reason: "HTTP 503".into(),
        });

        let quiet = EventHandler::new(false, false, false);
        assert!(quiet.describe(&event).is_none());

        let verbose = EventHandler::new(false, true, false);
        let (kind, text) = verbose.describe(&event).unwrap();
        assert_eq!(kind, LineKind::Debug);
        assert_eq!(text, "beta: unhealthy (HTTP 503)");
        assert!(verbose.format_line(kind, &text).starts_with("[DEBUG] "));
    }

    #[test]
    fn download_bar_follows_download_events() {
        let mut handler = EventHandler::new(false, false, true);
        let url = "http://a/snap.tar".to_string();

        handler.handle_event(AppEvent::Download(DownloadEvent::Started {
            url: url.clone(),
            dest: PathBuf::from("/tmp/snap.tar"),
            total_size: Some(1024),
        }));
        assert!(handler.download_bar.is_some());

        handler.handle_event(AppEvent::Download(DownloadEvent::Progress {
            url: url.clone(),
            bytes_downloaded: 512,
            total_bytes: Some(1024),
        }));
        assert_eq!(handler.download_bar.as_ref().unwrap().position(), 512);

        handler.handle_event(AppEvent::Download(DownloadEvent::Completed {
            url,
            path: PathBuf::from("/tmp/snap.tar"),
            size: 1024,
            elapsed: Duration::from_secs(1),
        }));
        assert!(handler.download_bar.is_none());
    }

    #[test]
    fn download_failure_is_an_error_line() {
        let handler = EventHandler::new(false, false, false);
        let event = AppEvent::Download(DownloadEvent::Failed {
            url: "http://a/snap.tar".into(),
            failure: FailureContext::new(None::<String>, "HTTP 404", None::<String>, false),
            bytes_downloaded: 0,
        });
        let (kind, text) = handler.describe(&event).unwrap();
        assert_eq!(kind, LineKind::Error);
        assert_eq!(text, "Download failed: HTTP 404");
    }
}
