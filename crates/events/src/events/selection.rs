use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Entry of a ranked candidate list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedEntry {
    /// 1-based position in the ranking
    pub position: usize,
    pub provider: String,
    pub rate: f64,
    pub estimated_time: Option<Duration>,
}

/// How the winning candidate was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionKind {
    /// Only one candidate survived probing
    OnlyCandidate,
    /// Best ranked candidate taken automatically
    Automatic,
    /// Picked by the user from the ranked list
    Manual,
}

/// Candidate ranking and selection events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SelectionEvent {
    /// Candidates ranked by the configured metric
    Ranked { ranked: Vec<RankedEntry> },

    /// A manual choice was rejected and the user is asked again
    ChoiceRejected { input: String, max: usize },

    /// Winner resolved
    Selected {
        provider: String,
        url: String,
        rate: f64,
        kind: SelectionKind,
    },
}
