#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! High-level operations orchestration for snapfind
//!
//! This crate sits between the CLI and the specialised crates: it fetches
//! the catalog, drives the probe stages, hands the ranked set to the
//! selector and downloads the winner.

mod context;
mod pipeline;
mod types;

pub use context::{OpsContextBuilder, OpsCtx};
pub use pipeline::{choose, probe_candidates};
pub use types::{DownloadReport, OperationResult, SelectionReport, SnapshotRequest};

pub use snapfind_select::{ConsolePrompt, DialoguerPrompt, Prompt, PromptOption, Selection};

use snapfind_catalog::fetch_catalog;
use snapfind_errors::Error;
use snapfind_events::EventEmitter;
use snapfind_net::Download;
use snapfind_types::{format_rate, Candidate};
use std::path::Path;
use std::sync::Arc;

/// Fetch the catalog and return the probed candidates for `request`
///
/// # Errors
///
/// Returns an error if the catalog cannot be retrieved, nothing matches the
/// request, or no candidate passes the health probe.
pub async fn find_snapshot(
    ctx: &OpsCtx,
    request: &SnapshotRequest,
) -> Result<Vec<Candidate>, Error> {
    ctx.emit_operation_started("find");
    ctx.emit_notice(format!(
        "Searching for {}-{} snapshots [chain-id: {}, mode: {}]",
        request.node_type, request.snapshot_type, request.chain_id, request.mode
    ));

    let result = async {
        let catalog = fetch_catalog(
            &ctx.net,
            &ctx.config.catalog.url,
            ctx.config.catalog.timeout(),
            &ctx.tx,
        )
        .await?;

        probe_candidates(
            Arc::clone(&ctx.net),
            &ctx.probe_config(),
            &catalog,
            request,
            &ctx.tx,
        )
        .await
    }
    .await;

    match &result {
        Ok(_) => ctx.emit_operation_completed("find", true),
        Err(e) => ctx.emit_operation_failed("find", e),
    }
    result
}

/// Choose among probed candidates using the configured ranking
///
/// # Errors
///
/// Returns an error if the set is empty or the prompt fails or closes.
pub fn select_snapshot(
    ctx: &OpsCtx,
    candidates: Vec<Candidate>,
    request: &SnapshotRequest,
    prompt: &mut dyn Prompt,
) -> Result<SelectionReport, Error> {
    let selection = choose(
        candidates,
        request,
        ctx.config.selection.rank_by,
        prompt,
        &ctx.tx,
    )?;
    let chosen = selection.candidate;

    ctx.emit_notice(format!(
        "Selected snapshot from {} ({})",
        chosen.provider,
        format_rate(chosen.rate)
    ));

    Ok(SelectionReport {
        provider: chosen.provider,
        url: chosen.url,
        rate: chosen.rate,
        size: chosen.size,
        estimated_time: chosen.estimated_time,
        kind: selection.kind,
    })
}

/// Download the chosen snapshot into `dir`, named after its URL
///
/// # Errors
///
/// Returns an error if the URL has no file name or the transfer fails.
pub async fn download_snapshot(
    ctx: &OpsCtx,
    selection: &SelectionReport,
    dir: &Path,
) -> Result<DownloadReport, Error> {
    let download = Download::new(&selection.url)?;
    let dest = dir.join(download.file_name()?);

    ctx.emit_notice(format!("Starting download from {}", selection.provider));
    ctx.emit_debug(format!("Download directory: {}", dir.display()));

    let result = download.execute(&ctx.net, &dest, &ctx.tx).await?;

    Ok(DownloadReport {
        provider: selection.provider.clone(),
        url: result.url,
        path: result.path,
        size: result.size,
        elapsed: result.elapsed,
    })
}
