//! Full run against a mock HTTP server: catalog, probes, selection, download

use httpmock::prelude::*;
use httpmock::Method::HEAD;
use snapfind_config::Config;
use snapfind_errors::{Error, SelectionError};
use snapfind_events::{channel, AppEvent, SelectionKind};
use snapfind_net::NetClient;
use snapfind_ops::{
    download_snapshot, find_snapshot, select_snapshot, ConsolePrompt, OpsContextBuilder,
    SnapshotRequest,
};
use snapfind_types::{NodeType, SelectionMode, SnapshotType};
use tempfile::tempdir;

fn context(server: &MockServer) -> (snapfind_ops::OpsCtx, snapfind_events::EventReceiver) {
    let mut config = Config::default();
    config.catalog.url = server.url("/providers.yaml");
    config.probe.health_timeout = 2;
    config.probe.speed_test_window = 1;

    let (tx, rx) = channel();
    let ctx = OpsContextBuilder::new()
        .with_net(NetClient::with_defaults().unwrap())
        .with_event_sender(tx)
        .with_config(config)
        .build()
        .unwrap();
    (ctx, rx)
}

fn providers_yaml(server: &MockServer) -> String {
    format!(
        "providers:\n  - name: alpha\n    snapshots:\n      - type: consensus-pruned\n        chain_id: celestia\n        url: {}\n  - name: beta\n    snapshots:\n      - type: consensus-pruned\n        chain_id: celestia\n        url: {}\n",
        server.url("/alpha/consensus-pruned.tar.lz4"),
        server.url("/beta/consensus-pruned.tar.lz4"),
    )
}

#[tokio::test]
async fn finds_selects_and_downloads_a_snapshot() {
    let server = MockServer::start();
    let body = vec![42u8; 64 * 1024];

    server.mock(|when, then| {
        when.method(GET).path("/providers.yaml");
        then.status(200).body(providers_yaml(&server));
    });
    server.mock(|when, then| {
        when.method(HEAD).path("/alpha/consensus-pruned.tar.lz4");
        then.status(200)
            .header("content-length", body.len().to_string())
            .body(&body);
    });
    server.mock(|when, then| {
        when.method(GET).path("/alpha/consensus-pruned.tar.lz4");
        then.status(200).body(&body);
    });
    let beta_get = server.mock(|when, then| {
        when.method(GET).path("/beta/consensus-pruned.tar.lz4");
        then.status(200).body("never");
    });
    server.mock(|when, then| {
        when.method(HEAD).path("/beta/consensus-pruned.tar.lz4");
        then.status(503);
    });

    let (ctx, mut rx) = context(&server);
    let request = SnapshotRequest::new(
        NodeType::Consensus,
        SnapshotType::Pruned,
        "celestia",
        SelectionMode::Auto,
    );

    let candidates = find_snapshot(&ctx, &request).await.unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(beta_get.hits(), 0);

    let mut prompt = ConsolePrompt::new(&b""[..], Vec::new());
    let selection = select_snapshot(&ctx, candidates, &request, &mut prompt).unwrap();
    assert_eq!(selection.provider, "alpha");
    assert_eq!(selection.kind, SelectionKind::OnlyCandidate);

    let dir = tempdir().unwrap();
    let report = download_snapshot(&ctx, &selection, dir.path()).await.unwrap();
    assert_eq!(report.path, dir.path().join("consensus-pruned.tar.lz4"));
    assert_eq!(report.size, body.len() as u64);
    assert_eq!(tokio::fs::read(&report.path).await.unwrap(), body);

    let mut saw_download = false;
    while let Ok(event) = rx.try_recv() {
        if matches!(event, AppEvent::Download(_)) {
            saw_download = true;
        }
    }
    assert!(saw_download);
}

#[tokio::test]
async fn manual_mode_uses_the_prompt() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/providers.yaml");
        then.status(200).body(providers_yaml(&server));
    });
    server.mock(|when, then| {
        when.method(HEAD);
        then.status(200);
    });
    server.mock(|when, then| {
        when.method(GET).path_contains(".tar.lz4");
        then.status(200).body(vec![0u8; 1024]);
    });

    let (ctx, _rx) = context(&server);
    let request = SnapshotRequest::new(
        NodeType::Consensus,
        SnapshotType::Pruned,
        "celestia",
        SelectionMode::Manual,
    );

    let candidates = find_snapshot(&ctx, &request).await.unwrap();
    assert_eq!(candidates.len(), 2);

    let mut prompt = ConsolePrompt::new(&b"5\nx\n2\n"[..], Vec::new());
    let selection = select_snapshot(&ctx, candidates.clone(), &request, &mut prompt).unwrap();
    assert_eq!(selection.kind, SelectionKind::Manual);

    let printed = String::from_utf8(prompt.into_output()).unwrap();
    assert_eq!(
        printed
            .matches("Invalid choice. Please enter a number between 1 and 2")
            .count(),
        2
    );

    let mut closed = ConsolePrompt::new(&b""[..], Vec::new());
    let err = select_snapshot(&ctx, candidates, &request, &mut closed).unwrap_err();
    assert!(matches!(err, Error::Selection(SelectionError::PromptClosed)));
}

#[tokio::test]
async fn unknown_chain_reports_no_match() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/providers.yaml");
        then.status(200).body(providers_yaml(&server));
    });
    let head = server.mock(|when, then| {
        when.method(HEAD);
        then.status(200);
    });

    let (ctx, _rx) = context(&server);
    let request = SnapshotRequest::new(
        NodeType::Consensus,
        SnapshotType::Pruned,
        "mocha-4",
        SelectionMode::Auto,
    );

    let err = find_snapshot(&ctx, &request).await.unwrap_err();
    assert!(matches!(err, Error::Selection(SelectionError::NoMatch { .. })));
    assert_eq!(head.hits(), 0);
}
