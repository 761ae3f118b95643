//! Registry sync scenarios against an in-memory gateway

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::Address;
use serde_json::json;

use super::*;
use crate::contract::LaunchEvent;
use crate::errors::FetchError;
use crate::notifications::MemorySink;
use crate::testing::{launch_log, sample_metadata, FakeGateway, ScriptedProvider};

const GENESIS: u64 = 9_538_247;

fn options(chunk_size: u64) -> ScanOptions {
    ScanOptions {
        genesis_block: GENESIS,
        chunk_size,
        max_window_attempts: 3,
        retry_delay: Duration::from_millis(0),
        skip_failed_windows: true,
    }
}

fn token(n: u8) -> Address {
    Address::repeat_byte(n)
}

async fn connected_session(account: Address) -> Arc<WalletSession> {
    let provider = Arc::new(ScriptedProvider::new());
    provider.respond("eth_accounts", json!([account.to_string()]));
    provider.respond("eth_chainId", json!("0x279f"));
    let session = Arc::new(WalletSession::new(
        provider,
        Arc::new(MemorySink::new()),
        vec![10143, 11155111],
    ));
    session.restore().await.unwrap();
    session
}

fn event(token: Address, block: u64) -> LaunchEvent {
    LaunchEvent::from_log(&launch_log(token, block, 0)).unwrap()
}

// =============================================================================
// SCAN
// =============================================================================

#[tokio::test]
async fn scan_visits_two_windows_for_reference_range() {
    let gateway = FakeGateway::new(9_538_447);
    gateway.add_launch(token(1), 9_538_300);
    gateway.add_launch(token(2), 9_538_348);

    let report = scan_launch_events(
        &gateway,
        GENESIS,
        9_538_447,
        &options(100),
        &SessionTicket::detached(),
    )
    .await
    .unwrap();

    assert_eq!(
        gateway.queried_windows(),
        vec![(9_538_247, 9_538_347), (9_538_348, 9_538_447)]
    );
    assert_eq!(report.windows_scanned, 2);
    let tokens: Vec<Address> = report.events.iter().map(|e| e.token).collect();
    assert_eq!(tokens, vec![token(1), token(2)]);
    assert!(report.is_complete());
}

#[tokio::test]
async fn scan_window_count_and_order_hold_for_any_chunk() {
    for chunk in [0u64, 1, 7, 50, 100, 1000] {
        let upper = GENESIS + 333;
        let gateway = FakeGateway::new(upper);
        let blocks = [GENESIS + 300, GENESIS, GENESIS + 333, GENESIS + 17];
        for (i, block) in blocks.iter().enumerate() {
            gateway.add_launch(token(i as u8 + 1), *block);
        }

        let report = scan_launch_events(
            &gateway,
            GENESIS,
            upper,
            &options(chunk),
            &SessionTicket::detached(),
        )
        .await
        .unwrap();

        let span = upper - GENESIS + 1;
        let expected_windows = (span + chunk) / (chunk + 1);
        assert_eq!(report.windows_scanned, expected_windows, "chunk {}", chunk);
        assert_eq!(gateway.queried_windows().len() as u64, expected_windows);

        assert_eq!(report.events.len(), blocks.len(), "chunk {}", chunk);
        let ordered = report
            .events
            .windows(2)
            .all(|pair| pair[0].block_number <= pair[1].block_number);
        assert!(ordered, "chunk {}", chunk);
    }
}

#[tokio::test]
async fn scan_retries_a_flaky_window() {
    let gateway = FakeGateway::new(GENESIS + 150);
    gateway.add_launch(token(1), GENESIS + 120);
    gateway.fail_window(GENESIS + 101, 2);

    let report = scan_launch_events(
        &gateway,
        GENESIS,
        GENESIS + 150,
        &options(100),
        &SessionTicket::detached(),
    )
    .await
    .unwrap();

    assert_eq!(report.events.len(), 1);
    assert!(report.is_complete());
    assert_eq!(gateway.queried_windows().len(), 4);
}

#[tokio::test]
async fn exhausted_window_is_skipped_and_recorded() {
    let gateway = FakeGateway::new(GENESIS + 250);
    gateway.add_launch(token(1), GENESIS + 10);
    gateway.add_launch(token(2), GENESIS + 150);
    gateway.add_launch(token(3), GENESIS + 240);
    gateway.fail_window(GENESIS + 101, u32::MAX);

    let report = scan_launch_events(
        &gateway,
        GENESIS,
        GENESIS + 250,
        &options(100),
        &SessionTicket::detached(),
    )
    .await
    .unwrap();

    let tokens: Vec<Address> = report.events.iter().map(|e| e.token).collect();
    assert_eq!(tokens, vec![token(1), token(3)]);
    assert_eq!(report.skipped_windows.len(), 1);
    assert_eq!(
        report.skipped_windows[0].window,
        ScanWindow {
            from_block: GENESIS + 101,
            to_block: GENESIS + 201
        }
    );
    assert_eq!(report.skipped_windows[0].attempts, 3);
}

#[tokio::test]
async fn exhausted_window_aborts_when_skipping_is_off() {
    let gateway = FakeGateway::new(GENESIS + 250);
    gateway.fail_window(GENESIS, u32::MAX);
    let mut opts = options(100);
    opts.skip_failed_windows = false;

    let err = scan_launch_events(
        &gateway,
        GENESIS,
        GENESIS + 250,
        &opts,
        &SessionTicket::detached(),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        CurvepadError::Scan(ScanError::WindowFailed { from_block: GENESIS, attempts: 3, .. })
    ));
    assert_eq!(gateway.queried_windows().len(), 3);
}

#[tokio::test]
async fn head_below_genesis_scans_nothing() {
    let gateway = FakeGateway::new(GENESIS - 1);
    let report = scan_launch_events(
        &gateway,
        GENESIS,
        GENESIS - 1,
        &options(100),
        &SessionTicket::detached(),
    )
    .await
    .unwrap();

    assert!(report.events.is_empty());
    assert!(gateway.queried_windows().is_empty());
}

// =============================================================================
// CATALOG
// =============================================================================

#[tokio::test]
async fn one_failed_fetch_of_three_leaves_two_records() {
    let gateway = FakeGateway::new(GENESIS);
    let creator = token(0xaa);
    gateway.set_metadata(token(1), sample_metadata(creator, "alpha", 2));
    gateway.set_metadata(token(3), sample_metadata(creator, "gamma", 4));
    gateway.fail_token(token(2));

    let events = vec![
        event(token(1), GENESIS),
        event(token(2), GENESIS + 1),
        event(token(3), GENESIS + 2),
    ];
    let build = build_catalog(&events, &gateway).await;

    let addresses: Vec<Address> = build.catalog.iter().map(|r| r.address).collect();
    assert_eq!(addresses, vec![token(1), token(3)]);
    assert_eq!(build.failures.len(), 1);
    assert!(matches!(
        &build.failures[0],
        FetchError::TokenMetadata { token: t, .. } if *t == token(2).to_string()
    ));
}

#[tokio::test]
async fn duplicate_launch_events_are_fetched_once() {
    let gateway = FakeGateway::new(GENESIS);
    gateway.set_metadata(token(1), sample_metadata(token(9), "alpha", 1));

    let events = vec![event(token(1), GENESIS), event(token(1), GENESIS + 5)];
    let build = build_catalog(&events, &gateway).await;

    assert_eq!(build.catalog.len(), 1);
    assert_eq!(gateway.metadata_reads(), vec![token(1)]);
}

#[test]
fn filter_by_creator_ignores_case_and_is_idempotent() {
    let mine: Address = "0xabcdef0123456789abcdef0123456789abcdef01".parse().unwrap();
    let catalog: Catalog = vec![
        TokenRecord::from_metadata(token(1), &sample_metadata(token(7), "a", 1)),
        TokenRecord::from_metadata(token(2), &sample_metadata(mine, "b", 1)),
        TokenRecord::from_metadata(token(3), &sample_metadata(token(8), "c", 1)),
    ]
    .into_iter()
    .collect();

    let lower = "0xabcdef0123456789abcdef0123456789abcdef01";
    let upper = "0xABCDEF0123456789ABCDEF0123456789ABCDEF01";
    let once = filter_by_creator(&catalog, upper);
    assert_eq!(once.len(), 1);
    assert_eq!(once[0].address, token(2));

    let again: Catalog = once.clone().into_iter().collect();
    assert_eq!(filter_by_creator(&again, lower), once);
    assert_eq!(filter_by_creator(&catalog, lower), once);

    assert!(filter_by_creator(&Catalog::new(), lower).is_empty());
    assert!(filter_by_creator(&catalog, "0x0000000000000000000000000000000000000001").is_empty());
}

#[tokio::test]
async fn refresh_of_unknown_address_is_a_no_op() {
    let gateway = FakeGateway::new(GENESIS);
    let mut catalog: Catalog =
        vec![TokenRecord::from_metadata(token(1), &sample_metadata(token(7), "a", 1))]
            .into_iter()
            .collect();
    let before = catalog.clone();

    let changed = refresh_record(&mut catalog, token(5), &gateway).await.unwrap();

    assert!(!changed);
    assert_eq!(catalog, before);
    assert!(gateway.metadata_reads().is_empty());
}

#[tokio::test]
async fn refresh_replaces_only_the_matching_entry() {
    let gateway = FakeGateway::new(GENESIS);
    let mut catalog: Catalog = vec![
        TokenRecord::from_metadata(token(1), &sample_metadata(token(7), "a", 1)),
        TokenRecord::from_metadata(token(2), &sample_metadata(token(7), "b", 1)),
    ]
    .into_iter()
    .collect();
    gateway.set_metadata(token(2), sample_metadata(token(7), "b", 8));

    assert!(refresh_record(&mut catalog, token(2), &gateway).await.unwrap());

    assert_eq!(catalog.get(&token(1)).and_then(|r| r.unit_price), Some(1.0));
    assert_eq!(catalog.get(&token(2)).and_then(|r| r.unit_price), Some(0.125));
    assert_eq!(catalog.records()[1].address, token(2));
}

#[tokio::test]
async fn failed_refresh_leaves_catalog_untouched() {
    let gateway = FakeGateway::new(GENESIS);
    let mut catalog: Catalog =
        vec![TokenRecord::from_metadata(token(1), &sample_metadata(token(7), "a", 1))]
            .into_iter()
            .collect();
    let before = catalog.clone();
    gateway.fail_token(token(1));

    assert!(refresh_record(&mut catalog, token(1), &gateway).await.is_err());
    assert_eq!(catalog, before);
}

// =============================================================================
// REGISTRY SYNC
// =============================================================================

#[tokio::test]
async fn sync_applies_catalog_and_splits_my_tokens() {
    let me = token(0xaa);
    let session = connected_session(me).await;
    let gateway = Arc::new(FakeGateway::new(GENESIS + 200));
    gateway.add_launch(token(1), GENESIS + 5);
    gateway.add_launch(token(2), GENESIS + 150);
    gateway.set_metadata(token(1), sample_metadata(me, "mine", 2));
    gateway.set_metadata(token(2), sample_metadata(token(0xbb), "theirs", 2));

    let registry = RegistrySync::new(gateway.clone(), session, options(100));
    let outcome = registry.sync().await.unwrap();

    match outcome {
        SyncOutcome::Applied(report) => {
            assert_eq!(report.head_block, GENESIS + 200);
            assert_eq!(report.windows_scanned, 2);
            assert_eq!(report.catalog_size, 2);
            assert!(report.failed_tokens.is_empty());
        }
        SyncOutcome::Discarded => panic!("sync should apply"),
    }
    assert_eq!(registry.catalog().len(), 2);
    let mine: Vec<Address> = registry.my_tokens().iter().map(|r| r.address).collect();
    assert_eq!(mine, vec![token(1)]);
    assert!(registry.last_report().is_some());
}

#[tokio::test]
async fn session_change_mid_scan_discards_result() {
    let session = connected_session(token(0xaa)).await;
    let gateway = Arc::new(FakeGateway::new(GENESIS + 500));
    gateway.add_launch(token(1), GENESIS + 5);
    gateway.set_metadata(token(1), sample_metadata(token(0xaa), "a", 1));

    let switcher = Arc::clone(&session);
    gateway.on_query(move |from_block| {
        if from_block > GENESIS {
            switcher.handle_chain_changed(11155111);
        }
    });

    let registry = RegistrySync::new(gateway.clone(), session, options(100));
    let outcome = registry.sync().await.unwrap();

    assert_eq!(outcome, SyncOutcome::Discarded);
    assert!(registry.catalog().is_empty());
    assert_eq!(gateway.queried_windows().len(), 2);
}

#[tokio::test]
async fn stale_ticket_discards_result() {
    let session = connected_session(token(0xaa)).await;
    let gateway = Arc::new(FakeGateway::new(GENESIS + 50));
    gateway.add_launch(token(1), GENESIS + 5);
    gateway.set_metadata(token(1), sample_metadata(token(0xaa), "a", 1));

    let registry = RegistrySync::new(gateway.clone(), Arc::clone(&session), options(100));
    let ticket = session.ticket();
    session.handle_accounts_changed(&[token(0xcc)]);

    let outcome = registry.sync_with_ticket(ticket).await.unwrap();
    assert_eq!(outcome, SyncOutcome::Discarded);
    assert!(registry.catalog().is_empty());
}

#[tokio::test]
async fn registry_refresh_updates_known_token() {
    let session = connected_session(token(0xaa)).await;
    let gateway = Arc::new(FakeGateway::new(GENESIS + 10));
    gateway.add_launch(token(1), GENESIS + 5);
    gateway.set_metadata(token(1), sample_metadata(token(0xaa), "a", 2));

    let registry = RegistrySync::new(gateway.clone(), session, options(100));
    registry.sync().await.unwrap();
    assert_eq!(registry.record(&token(1)).and_then(|r| r.unit_price), Some(0.5));

    gateway.set_metadata(token(1), sample_metadata(token(0xaa), "a", 4));
    assert!(registry.refresh(token(1)).await.unwrap());
    assert_eq!(registry.record(&token(1)).and_then(|r| r.unit_price), Some(0.25));

    assert!(!registry.refresh(token(9)).await.unwrap());
}
