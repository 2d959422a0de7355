//! Narrowing the catalog down to the requested snapshot kind

use snapfind_types::{type_key, Candidate, NodeType, SnapshotType};

use crate::Catalog;

/// Chain id that matches every identifier
pub const ANY_CHAIN: &str = "*";

/// What the user asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotQuery {
    pub node_type: NodeType,
    pub snapshot_type: SnapshotType,
    /// Empty or `*` matches any chain
    pub chain_id: String,
}

impl SnapshotQuery {
    #[must_use]
    pub fn new(
        node_type: NodeType,
        snapshot_type: SnapshotType,
        chain_id: impl Into<String>,
    ) -> Self {
        Self {
            node_type,
            snapshot_type,
            chain_id: chain_id.into(),
        }
    }

    #[must_use]
    pub fn type_key(&self) -> String {
        type_key(self.node_type, self.snapshot_type)
    }

    fn matches_chain(&self, chain_id: &str) -> bool {
        self.chain_id.is_empty() || self.chain_id == ANY_CHAIN || self.chain_id == chain_id
    }
}

/// Candidates for every catalog entry matching `query`, in catalog order
///
/// Pure: no network, and an empty result is a normal outcome. Entries
/// without a URL are skipped.
#[must_use]
pub fn filter_candidates(catalog: &Catalog, query: &SnapshotQuery) -> Vec<Candidate> {
    let key = query.type_key();
    catalog
        .entries()
        .filter(|entry| {
            entry.type_key == key
                && query.matches_chain(entry.chain_id)
                && !entry.url.trim().is_empty()
        })
        .map(|entry| {
            Candidate::new(
                entry.provider,
                entry.url,
                entry.metadata_url.map(str::to_string),
            )
        })
        .collect()
}
