//! Snapshot catalog error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CatalogError {
    #[error("failed to parse providers catalog: {message}")]
    ParseError { message: String },

    #[error("invalid node type: {value}. Must be one of: consensus (c), bridge (b)")]
    UnknownNodeType { value: String },

    #[error("invalid snapshot type: {value}. Must be one of: pruned (p), archive (a)")]
    UnknownSnapshotType { value: String },

    #[error("provider {provider} lists a snapshot without a URL")]
    MissingUrl { provider: String },
}

impl UserFacingError for CatalogError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::ParseError { .. } | Self::MissingUrl { .. } => {
                Some("The providers catalog is malformed; report it to the catalog maintainers.")
            }
            Self::UnknownNodeType { .. } | Self::UnknownSnapshotType { .. } => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::ParseError { .. } => "catalog.parse_error",
            Self::UnknownNodeType { .. } => "catalog.unknown_node_type",
            Self::UnknownSnapshotType { .. } => "catalog.unknown_snapshot_type",
            Self::MissingUrl { .. } => "catalog.missing_url",
        })
    }
}
