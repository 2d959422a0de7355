//! Command line interface definition

use clap::Parser;
use snapfind_config::constants::DEFAULT_CHAIN_ID;
use snapfind_types::{ColorChoice, NodeType, SelectionMode, SnapshotType};
use std::path::PathBuf;

/// snapfind - Find and download the fastest Celestia node snapshot
#[derive(Parser)]
#[command(name = "snapfind")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Find and download the fastest Celestia node snapshot")]
#[command(
    long_about = "Fetches the providers catalog, health-checks and speed-tests every matching \
                  snapshot, then downloads the fastest one (or the one you pick with --manual)."
)]
pub struct Cli {
    /// Node type: consensus (c) or bridge (b)
    #[arg(value_parser = parse_node_type, value_name = "NODE_TYPE")]
    pub node_type: NodeType,

    /// Snapshot type: pruned (p) or archive (a)
    #[arg(value_parser = parse_snapshot_type, value_name = "SNAPSHOT_TYPE")]
    pub snapshot_type: SnapshotType,

    /// Chain ID ("*" matches any chain)
    #[arg(short = 'n', long, default_value = DEFAULT_CHAIN_ID)]
    pub chain_id: String,

    /// Choose the snapshot from the ranked list instead of taking the fastest
    #[arg(short, long)]
    pub manual: bool,

    /// Stop after selection and print the chosen URL
    #[arg(long)]
    pub dry_run: bool,

    /// Directory to download into (default: ~/celestia-snapshots)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Providers catalog to use instead of the published one
    #[arg(long, value_name = "URL")]
    pub catalog_url: Option<String>,

    #[command(flatten)]
    pub global: GlobalArgs,
}

impl Cli {
    pub fn selection_mode(&self) -> SelectionMode {
        if self.manual {
            SelectionMode::Manual
        } else {
            SelectionMode::Auto
        }
    }
}

/// Global arguments
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug mode with extra information
    #[arg(long)]
    pub debug: bool,

    /// Color output control
    #[arg(long, value_enum)]
    pub color: Option<ColorChoice>,

    /// Use alternate config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

fn parse_node_type(value: &str) -> Result<NodeType, String> {
    value.parse().map_err(|e: snapfind_errors::CatalogError| e.to_string())
}

fn parse_snapshot_type(value: &str) -> Result<SnapshotType, String> {
    value.parse().map_err(|e: snapfind_errors::CatalogError| e.to_string())
}
