//! The provider-selection pipeline: filter, health probe, throughput probe

use snapfind_catalog::{filter_candidates, Catalog};
use snapfind_errors::{Error, SelectionError};
use snapfind_events::{AppEvent, CatalogEvent, EventEmitter, EventSender};
use snapfind_net::ProbeTransport;
use snapfind_probe::{HealthProber, ProbeConfig, ThroughputProber};
use snapfind_select::{Prompt, Selection, Selector};
use snapfind_types::{Candidate, RankBy};
use std::collections::HashSet;
use std::sync::Arc;

use crate::SnapshotRequest;

/// Filter the catalog for `request` and run both probe stages
///
/// Stops before the health stage when nothing matches, and before the
/// throughput stage when nothing is healthy.
///
/// # Errors
///
/// Returns `SelectionError::NoMatch` or `SelectionError::NoHealthyCandidates`.
pub async fn probe_candidates<T>(
    transport: Arc<T>,
    config: &ProbeConfig,
    catalog: &Catalog,
    request: &SnapshotRequest,
    tx: &EventSender,
) -> Result<Vec<Candidate>, Error>
where
    T: ProbeTransport + 'static,
{
    let query = request.query();
    let candidates = filter_candidates(catalog, &query);

    let providers: HashSet<&str> = candidates.iter().map(|c| c.provider.as_str()).collect();
    tx.emit(AppEvent::Catalog(CatalogEvent::Filtered {
        type_key: query.type_key(),
        chain_id: query.chain_id.clone(),
        matched: candidates.len(),
        providers: providers.len(),
    }));
    for candidate in &candidates {
        tx.emit_debug(format!(
            "Matched snapshot from {}: {}",
            candidate.provider, candidate.url
        ));
    }

    if candidates.is_empty() {
        return Err(SelectionError::NoMatch {
            node_type: request.node_type.to_string(),
            snapshot_type: request.snapshot_type.to_string(),
            chain_id: request.chain_id.clone(),
        }
        .into());
    }

    let probed = candidates.len();
    let healthy = HealthProber::new(Arc::clone(&transport), config)
        .probe(candidates, tx)
        .await;
    if healthy.is_empty() {
        return Err(SelectionError::NoHealthyCandidates { probed }.into());
    }

    Ok(ThroughputProber::new(transport, config)
        .probe(healthy, tx)
        .await)
}

/// Rank probed candidates and pick one according to `request.mode`
///
/// # Errors
///
/// Returns an error if the set is empty or the prompt fails or closes.
pub fn choose(
    candidates: Vec<Candidate>,
    request: &SnapshotRequest,
    rank_by: RankBy,
    prompt: &mut dyn Prompt,
    tx: &EventSender,
) -> Result<Selection, Error> {
    Selector::new(request.mode, rank_by).select(candidates, prompt, tx)
}
