#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for snapfind
//!
//! This crate provides the fundamental types shared by the selection pipeline:
//! the requested snapshot kind, the candidate record every stage annotates,
//! and a few user-facing choices.

pub mod candidate;

pub use candidate::{format_rate, Candidate, HealthReport, BYTES_PER_MB};

use serde::{Deserialize, Serialize};
use snapfind_errors::CatalogError;
use std::fmt;
use std::str::FromStr;

/// Kind of node a snapshot was taken from (the catalog "category")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Consensus,
    Bridge,
}

impl NodeType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Consensus => "consensus",
            Self::Bridge => "bridge",
        }
    }
}

impl FromStr for NodeType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "c" | "consensus" => Ok(Self::Consensus),
            "b" | "bridge" => Ok(Self::Bridge),
            _ => Err(CatalogError::UnknownNodeType {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot retention flavour (the catalog "variant")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotType {
    Pruned,
    Archive,
}

impl SnapshotType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pruned => "pruned",
            Self::Archive => "archive",
        }
    }
}

impl FromStr for SnapshotType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "p" | "pruned" => Ok(Self::Pruned),
            "a" | "archive" => Ok(Self::Archive),
            _ => Err(CatalogError::UnknownSnapshotType {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for SnapshotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite catalog key, e.g. `consensus-pruned`
#[must_use]
pub fn type_key(node_type: NodeType, snapshot_type: SnapshotType) -> String {
    format!("{node_type}-{snapshot_type}")
}

/// How the winning candidate is chosen once the ranked list exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Take the best ranked candidate
    #[default]
    Auto,
    /// Ask the user to pick from the ranked list
    Manual,
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Manual => write!(f, "manual"),
        }
    }
}

/// Metric used to order probed candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankBy {
    /// Measured transfer rate, fastest first
    #[default]
    Rate,
    /// Estimated total transfer time, shortest first; unknown estimates last
    Eta,
}

impl FromStr for RankBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rate" | "speed" => Ok(Self::Rate),
            "eta" | "time" => Ok(Self::Eta),
            _ => Err(s.to_string()),
        }
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    Always,
    #[default]
    Auto,
    Never,
}

// Implement clap::ValueEnum for ColorChoice
impl clap::ValueEnum for ColorChoice {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Always, Self::Auto, Self::Never]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Always => clap::builder::PossibleValue::new("always"),
            Self::Auto => clap::builder::PossibleValue::new("auto"),
            Self::Never => clap::builder::PossibleValue::new("never"),
        })
    }
}
