#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Snapshot providers catalog for snapfind
//!
//! Retrieves the YAML list of providers and filters it down to the
//! candidates for one node type, snapshot type and chain.

mod filter;
mod models;

pub use filter::{filter_candidates, SnapshotQuery, ANY_CHAIN};
pub use models::{Catalog, CatalogEntry, Provider, Snapshot};

use snapfind_errors::Error;
use snapfind_events::{AppEvent, CatalogEvent, EventEmitter, EventSender};
use snapfind_net::NetClient;
use std::time::Duration;

/// Download and parse the providers catalog
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched or is not a valid
/// providers document.
pub async fn fetch_catalog(
    client: &NetClient,
    url: &str,
    timeout: Duration,
    tx: &EventSender,
) -> Result<Catalog, Error> {
    tx.emit(AppEvent::Catalog(CatalogEvent::FetchStarted {
        url: url.to_string(),
    }));

    let body = snapfind_net::fetch_text(client, url, timeout, tx).await?;
    let catalog = Catalog::from_yaml(&body)?;

    for problem in catalog.problems() {
        tx.emit_warning(format!("Skipping catalog entry: {problem}"));
    }

    for provider in &catalog.providers {
        tx.emit_debug(format!(
            "Provider {} has {} snapshots",
            provider.name,
            provider.snapshots.len()
        ));
    }

    tx.emit(AppEvent::Catalog(CatalogEvent::Fetched {
        providers: catalog.providers.len(),
        snapshots: catalog.snapshot_count(),
    }));

    Ok(catalog)
}
