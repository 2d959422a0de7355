//! Providers catalog data models

use serde::{Deserialize, Serialize};
use snapfind_errors::{CatalogError, Error};

/// The providers catalog document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub providers: Vec<Provider>,
}

/// A snapshot provider and everything it publishes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    pub name: String,
    #[serde(default)]
    pub snapshots: Vec<Snapshot>,
}

/// One published snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Composite type key, e.g. `consensus-pruned`
    #[serde(rename = "type", default)]
    pub type_key: String,
    #[serde(default)]
    pub chain_id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_url: Option<String>,
}

/// Flattened, read-only view of a single provider snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry<'a> {
    pub provider: &'a str,
    pub type_key: &'a str,
    pub chain_id: &'a str,
    pub url: &'a str,
    pub metadata_url: Option<&'a str>,
}

impl Snapshot {
    /// Whether the snapshot can be probed at all
    #[must_use]
    pub fn has_url(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

impl Catalog {
    /// Parse a catalog from its YAML form
    ///
    /// Missing snapshot fields read as empty strings; such entries never
    /// match a query.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed.
    pub fn from_yaml(yaml: &str) -> Result<Self, Error> {
        serde_yml::from_str(yaml).map_err(|e| {
            CatalogError::ParseError {
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Problems with individual snapshots, one per unusable entry
    #[must_use]
    pub fn problems(&self) -> Vec<CatalogError> {
        self.providers
            .iter()
            .flat_map(|provider| {
                provider
                    .snapshots
                    .iter()
                    .filter(|snapshot| !snapshot.has_url())
                    .map(|_| CatalogError::MissingUrl {
                        provider: provider.name.clone(),
                    })
            })
            .collect()
    }

    /// All snapshots in catalog order
    pub fn entries(&self) -> impl Iterator<Item = CatalogEntry<'_>> {
        self.providers.iter().flat_map(|provider| {
            provider.snapshots.iter().map(move |snapshot| CatalogEntry {
                provider: &provider.name,
                type_key: &snapshot.type_key,
                chain_id: &snapshot.chain_id,
                url: &snapshot.url,
                metadata_url: snapshot.metadata_url.as_deref(),
            })
        })
    }

    #[must_use]
    pub fn snapshot_count(&self) -> usize {
        self.providers.iter().map(|p| p.snapshots.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r"
providers:
  - name: alpha
    snapshots:
      - type: consensus-pruned
        chain_id: celestia
        url: https://alpha.example/consensus-pruned.tar.lz4
        metadata_url: https://alpha.example/consensus-pruned.json
      - type: bridge-archive
        chain_id: mocha-4
        url: https://alpha.example/bridge-archive.tar
  - name: beta
    snapshots:
      - type: consensus-pruned
        chain_id: celestia
        url: https://beta.example/snap.tar
";

    #[test]
    fn parses_catalog_document() {
        let catalog = Catalog::from_yaml(YAML).unwrap();
        assert_eq!(catalog.providers.len(), 2);
        assert_eq!(catalog.snapshot_count(), 3);

        let first = catalog.entries().next().unwrap();
        assert_eq!(first.provider, "alpha");
        assert_eq!(first.type_key, "consensus-pruned");
        assert_eq!(
            first.metadata_url,
            Some("https://alpha.example/consensus-pruned.json")
        );
    }

    #[test]
    fn entries_follow_catalog_order() {
        let catalog = Catalog::from_yaml(YAML).unwrap();
        let urls: Vec<_> = catalog.entries().map(|e| e.url).collect();
        assert_eq!(
            urls,
            [
                "https://alpha.example/consensus-pruned.tar.lz4",
                "https://alpha.example/bridge-archive.tar",
                "https://beta.example/snap.tar",
            ]
        );
    }

    #[test]
    fn provider_without_snapshots_is_allowed() {
        let catalog = Catalog::from_yaml("providers:\n  - name: empty\n").unwrap();
        assert_eq!(catalog.snapshot_count(), 0);
    }

    const PARTLY_BROKEN: &str = r"
providers:
  - name: good
    snapshots:
      - type: consensus-pruned
        chain_id: celestia
        url: https://good.example/snap.tar
  - name: other
    snapshots:
      - type: bridge-archive
        chain_id: celestia
      - type: bridge-archive
        url: https://other.example/no-chain.tar
";

    #[test]
    fn broken_entries_do_not_reject_the_catalog() {
        let catalog = Catalog::from_yaml(PARTLY_BROKEN).unwrap();
        assert_eq!(catalog.snapshot_count(), 3);

        let no_chain = &catalog.providers[1].snapshots[1];
        assert_eq!(no_chain.chain_id, "");
        assert!(no_chain.has_url());
    }

    #[test]
    fn snapshot_without_url_is_reported() {
        let catalog = Catalog::from_yaml(PARTLY_BROKEN).unwrap();
        let problems = catalog.problems();
        assert_eq!(problems.len(), 1);
        assert!(matches!(
            &problems[0],
            CatalogError::MissingUrl { provider } if provider == "other"
        ));
    }

    #[test]
    fn snapshot_without_type_reads_as_empty() {
        let yaml = "providers:\n  - name: x\n    snapshots:\n      - url: https://x/a\n";
        let catalog = Catalog::from_yaml(yaml).unwrap();
        assert_eq!(catalog.providers[0].snapshots[0].type_key, "");
        assert!(catalog.problems().is_empty());
    }

    #[test]
    fn malformed_yaml_is_parse_error() {
        let err = Catalog::from_yaml("providers: [oops").unwrap_err();
        assert!(matches!(err, Error::Catalog(CatalogError::ParseError { .. })));
    }
}
