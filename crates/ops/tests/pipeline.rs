//! End-to-end pipeline scenarios against a scripted transport

use bytes::Bytes;
use snapfind_catalog::{Catalog, Provider, Snapshot};
use snapfind_errors::{Error, NetworkError, SelectionError};
use snapfind_events::{channel, SelectionKind};
use snapfind_net::{ByteStream, HeadResponse, ProbeTransport};
use snapfind_ops::{choose, probe_candidates, Prompt, PromptOption, SnapshotRequest};
use snapfind_probe::ProbeConfig;
use snapfind_types::{NodeType, RankBy, SelectionMode, SnapshotType};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

struct Route {
    status: u16,
    content_length: Option<&'static str>,
    /// Bytes delivered every 100ms
    per_tick: usize,
}

#[derive(Default)]
struct FakeProviders {
    routes: HashMap<String, Route>,
    heads: AtomicUsize,
    streams: AtomicUsize,
}

impl FakeProviders {
    fn route(
        mut self,
        url: &str,
        status: u16,
        content_length: Option<&'static str>,
        mb_per_sec: usize,
    ) -> Self {
        self.routes.insert(
            url.to_string(),
            Route {
                status,
                content_length,
                per_tick: mb_per_sec * 100_000,
            },
        );
        self
    }
}

impl ProbeTransport for FakeProviders {
    async fn head(&self, url: &str, _timeout: Duration) -> Result<HeadResponse, NetworkError> {
        self.heads.fetch_add(1, Ordering::SeqCst);
        let route = self
            .routes
            .get(url)
            .ok_or_else(|| NetworkError::ConnectionRefused(url.to_string()))?;
        Ok(HeadResponse {
            status: route.status,
            content_length: route.content_length.map(str::to_string),
            content_type: None,
            accept_ranges: None,
        })
    }

    async fn open_stream(&self, url: &str) -> Result<ByteStream, NetworkError> {
        self.streams.fetch_add(1, Ordering::SeqCst);
        let per_tick = self
            .routes
            .get(url)
            .map(|r| r.per_tick)
            .ok_or_else(|| NetworkError::ConnectionRefused(url.to_string()))?;
        let stream = futures::stream::unfold((), move |()| async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Some((Ok(Bytes::from(vec![0u8; per_tick])), ()))
        });
        Ok(Box::pin(stream))
    }
}

/// Never expected to be consulted
struct NoPrompt;

impl Prompt for NoPrompt {
    fn show(&mut self, _options: &[PromptOption]) -> Result<(), SelectionError> {
        panic!("prompt shown");
    }

    fn read_choice(&mut self, _count: usize) -> Result<Option<String>, SelectionError> {
        panic!("prompt asked");
    }

    fn reject(&mut self, _input: &str, _count: usize) -> Result<(), SelectionError> {
        panic!("prompt rejected");
    }
}

fn catalog(entries: &[(&str, &str, &str)]) -> Catalog {
    Catalog {
        providers: entries
            .iter()
            .map(|(name, type_key, url)| Provider {
                name: (*name).to_string(),
                snapshots: vec![Snapshot {
                    type_key: (*type_key).to_string(),
                    chain_id: "celestia".to_string(),
                    url: (*url).to_string(),
                    metadata_url: None,
                }],
            })
            .collect(),
    }
}

fn request() -> SnapshotRequest {
    SnapshotRequest::new(
        NodeType::Consensus,
        SnapshotType::Pruned,
        "celestia",
        SelectionMode::Auto,
    )
}

fn config() -> ProbeConfig {
    ProbeConfig {
        health_timeout: Duration::from_secs(3),
        speed_test_window: Duration::from_secs(2),
        max_concurrency: 0,
    }
}

#[tokio::test(start_paused = true)]
async fn fastest_of_two_healthy_providers_wins() {
    let transport = Arc::new(
        FakeProviders::default()
            .route("https://a/snap.tar", 200, Some("10000000"), 5)
            .route("https://b/snap.tar", 200, Some("10000000"), 2)
            .route("https://c/snap.tar", 503, None, 9),
    );
    let catalog = catalog(&[
        ("A", "consensus-pruned", "https://a/snap.tar"),
        ("B", "consensus-pruned", "https://b/snap.tar"),
        ("C", "consensus-pruned", "https://c/snap.tar"),
    ]);
    let (tx, _rx) = channel();

    let probed = probe_candidates(Arc::clone(&transport), &config(), &catalog, &request(), &tx)
        .await
        .unwrap();

    assert_eq!(transport.heads.load(Ordering::SeqCst), 3);
    assert_eq!(transport.streams.load(Ordering::SeqCst), 2);
    assert_eq!(probed.len(), 2);

    let selection = choose(probed, &request(), RankBy::Rate, &mut NoPrompt, &tx).unwrap();
    assert_eq!(selection.candidate.provider, "A");
    assert_eq!(selection.kind, SelectionKind::Automatic);
    assert!(selection.candidate.rate > 4.4e6);
    let estimate = selection.candidate.estimated_time.unwrap();
    assert!(estimate >= Duration::from_secs(2) && estimate < Duration::from_millis(2300));
}

#[tokio::test(start_paused = true)]
async fn single_sizeless_candidate_is_still_selected() {
    let transport = Arc::new(FakeProviders::default().route("https://a/snap.tar", 200, None, 1));
    let catalog = catalog(&[("A", "consensus-pruned", "https://a/snap.tar")]);
    let (tx, _rx) = channel();

    let probed = probe_candidates(transport, &config(), &catalog, &request(), &tx)
        .await
        .unwrap();
    let selection = choose(probed, &request(), RankBy::Rate, &mut NoPrompt, &tx).unwrap();

    assert_eq!(selection.candidate.provider, "A");
    assert_eq!(selection.kind, SelectionKind::OnlyCandidate);
    assert_eq!(selection.candidate.size, 0);
    assert!(selection.candidate.estimated_time.is_none());
}

#[tokio::test(start_paused = true)]
async fn no_match_stops_before_health_probing() {
    let transport = Arc::new(FakeProviders::default().route("https://a/snap.tar", 200, None, 1));
    let catalog = catalog(&[("A", "bridge-archive", "https://a/snap.tar")]);
    let (tx, _rx) = channel();

    let err = probe_candidates(Arc::clone(&transport), &config(), &catalog, &request(), &tx)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Selection(SelectionError::NoMatch { ref chain_id, .. }) if chain_id == "celestia"
    ));
    assert_eq!(transport.heads.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn all_unhealthy_stops_before_throughput_probing() {
    let transport = Arc::new(
        FakeProviders::default()
            .route("https://a/snap.tar", 500, None, 1)
            .route("https://b/snap.tar", 404, None, 1),
    );
    let catalog = catalog(&[
        ("A", "consensus-pruned", "https://a/snap.tar"),
        ("B", "consensus-pruned", "https://b/snap.tar"),
    ]);
    let (tx, _rx) = channel();

    let err = probe_candidates(Arc::clone(&transport), &config(), &catalog, &request(), &tx)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Selection(SelectionError::NoHealthyCandidates { probed: 2 })
    ));
    assert_eq!(transport.heads.load(Ordering::SeqCst), 2);
    assert_eq!(transport.streams.load(Ordering::SeqCst), 0);
}
