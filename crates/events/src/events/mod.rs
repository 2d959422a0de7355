use serde::{Deserialize, Serialize};

use crate::EventSource;
use snapfind_errors::UserFacingError;

/// Structured failure information shared across domains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureContext {
    /// Stable error code, when the error carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Short user-facing message.
    pub message: String,
    /// Optional remediation hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Whether retrying the operation might succeed.
    pub retryable: bool,
}

impl FailureContext {
    /// Construct a new failure context.
    #[must_use]
    pub fn new(
        code: Option<impl Into<String>>,
        message: impl Into<String>,
        hint: Option<impl Into<String>>,
        retryable: bool,
    ) -> Self {
        Self {
            code: code.map(Into::into),
            message: message.into(),
            hint: hint.map(Into::into),
            retryable,
        }
    }

    /// Build failure context from a `UserFacingError` implementation.
    #[must_use]
    pub fn from_error<E: UserFacingError + ?Sized>(error: &E) -> Self {
        Self::new(
            error.user_code(),
            error.user_message().into_owned(),
            error.user_hint(),
            error.is_retryable(),
        )
    }
}

pub mod catalog;
pub mod download;
pub mod general;
pub mod probe;
pub mod selection;

pub use catalog::*;
pub use download::*;
pub use general::*;
pub use probe::*;
pub use selection::*;

/// Top-level application event enum that aggregates all domain-specific events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// General utility events (notices, warnings, errors, operations)
    General(GeneralEvent),

    /// Catalog fetch and filter events
    Catalog(CatalogEvent),

    /// Health and throughput probe events
    Probe(ProbeEvent),

    /// Ranking and selection events
    Selection(SelectionEvent),

    /// Snapshot download events
    Download(DownloadEvent),
}

impl AppEvent {
    /// Identify the source domain for this event (used for metadata/logging).
    #[must_use]
    pub fn event_source(&self) -> EventSource {
        match self {
            Self::General(_) => EventSource::GENERAL,
            Self::Catalog(_) => EventSource::CATALOG,
            Self::Probe(ProbeEvent::HealthCheckStarted { .. }
                | ProbeEvent::CandidateHealthy { .. }
                | ProbeEvent::CandidateUnhealthy { .. }
                | ProbeEvent::HealthCheckCompleted { .. }) => EventSource::HEALTH,
            Self::Probe(_) => EventSource::THROUGHPUT,
            Self::Selection(_) => EventSource::SELECTION,
            Self::Download(_) => EventSource::DOWNLOAD,
        }
    }

    /// Determine the appropriate tracing log level for this event
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        use tracing::Level;

        match self {
            // Error-level events
            Self::General(GeneralEvent::Error { .. } | GeneralEvent::OperationFailed { .. })
            | Self::Download(DownloadEvent::Failed { .. }) => Level::ERROR,

            // Warning-level events
            Self::General(GeneralEvent::Warning { .. })
            | Self::Selection(SelectionEvent::ChoiceRejected { .. }) => Level::WARN,

            // Per-candidate outcomes and progress ticks are debug detail
            Self::General(GeneralEvent::DebugLog { .. })
            | Self::Catalog(CatalogEvent::FetchStarted { .. })
            | Self::Probe(
                ProbeEvent::CandidateHealthy { .. }
                | ProbeEvent::CandidateUnhealthy { .. }
                | ProbeEvent::SpeedTestResult { .. },
            ) => Level::DEBUG,

            Self::Download(DownloadEvent::Progress { .. }) => Level::TRACE,

            // Default to INFO for most events
            _ => Level::INFO,
        }
    }

    /// Get the log target for this event (for structured logging)
    #[must_use]
    pub fn log_target(&self) -> &'static str {
        match self {
            Self::General(_) => "snapfind::events::general",
            Self::Catalog(_) => "snapfind::events::catalog",
            Self::Probe(_) => "snapfind::events::probe",
            Self::Selection(_) => "snapfind::events::selection",
            Self::Download(_) => "snapfind::events::download",
        }
    }

    /// Structured fields for logging
    #[must_use]
    pub fn log_fields(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"))
    }
}
