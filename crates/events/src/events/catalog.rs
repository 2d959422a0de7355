use serde::{Deserialize, Serialize};

/// Catalog retrieval and filtering events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CatalogEvent {
    /// Catalog download started
    FetchStarted { url: String },

    /// Catalog downloaded and parsed
    Fetched { providers: usize, snapshots: usize },

    /// Catalog filtered down to the requested snapshot kind
    Filtered {
        type_key: String,
        chain_id: String,
        matched: usize,
        providers: usize,
    },
}
