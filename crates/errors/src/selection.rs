//! Provider selection pipeline error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelectionError {
    #[error(
        "no snapshots found for node type '{node_type}' and snapshot type '{snapshot_type}' (chain id: {chain_id})"
    )]
    NoMatch {
        node_type: String,
        snapshot_type: String,
        chain_id: String,
    },

    #[error("no healthy snapshots found ({probed} probed)")]
    NoHealthyCandidates { probed: usize },

    #[error("no snapshots available")]
    EmptyCandidateSet,

    #[error("selection prompt closed before a choice was made")]
    PromptClosed,

    #[error("selection prompt failed: {message}")]
    PromptFailed { message: String },
}

impl UserFacingError for SelectionError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::NoMatch { .. } => {
                Some("Check the node type, snapshot type and --chain-id against the providers catalog.")
            }
            Self::NoHealthyCandidates { .. } => {
                Some("All providers failed the health check; run with --debug for details.")
            }
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::NoHealthyCandidates { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::NoMatch { .. } => "selection.no_match",
            Self::NoHealthyCandidates { .. } => "selection.no_healthy_candidates",
            Self::EmptyCandidateSet => "selection.empty_candidate_set",
            Self::PromptClosed => "selection.prompt_closed",
            Self::PromptFailed { .. } => "selection.prompt_failed",
        })
    }
}
