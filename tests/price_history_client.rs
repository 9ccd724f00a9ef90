//! End-to-end behaviour of `PriceHistoryClient` against a scripted source.

mod common;

use std::time::Duration;

use common::*;
use osrs_price_history::domain::price_history::{Freshness, LookupSource, PriceRange};

// ─── Cache hits ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn second_call_within_ttl_is_a_cache_hit() {
    let source = ScriptedSource::new(vec![array_body(&[(T0 - 300, 110, 100), (T0, 112, 101)])]);
    let (client, clock) = client_with(source.clone());

    let first = client.get_price_history(item(4151)).await;
    clock.advance(chrono::Duration::seconds(299));
    let second = client.get_price_history(item(4151)).await;

    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
    assert_eq!(source.calls(), 1);

    let stats = client.stats();
    assert_eq!(stats.fetches, 1);
    assert_eq!(stats.cache_hits, 1);
}

#[tokio::test]
async fn entry_goes_stale_exactly_at_ttl() {
    let source = ScriptedSource::new(vec![
        array_body(&[(T0, 110, 100)]),
        array_body(&[(T0 + 300, 120, 105)]),
    ]);
    let (client, clock) = client_with(source.clone());

    client.get_price_history(item(2)).await;
    clock.advance(chrono::Duration::minutes(5));
    assert_eq!(client.price_history().freshness(item(2)).await, Freshness::Stale);

    let lookup = client.price_history().get_detailed(item(2)).await;
    assert_eq!(lookup.source, LookupSource::Fresh);
    assert_eq!(lookup.points[0].avg_high_price, 120);
    assert_eq!(source.calls(), 2);
}

#[tokio::test]
async fn items_are_cached_independently() {
    let source = ScriptedSource::new(vec![
        array_body(&[(T0, 110, 100)]),
        array_body(&[(T0, 5, 4)]),
    ]);
    let (client, _clock) = client_with(source.clone());

    let whip = client.get_price_history(item(4151)).await;
    let coins = client.get_price_history(item(995)).await;
    client.get_price_history(item(4151)).await;

    assert_eq!(whip[0].avg_high_price, 110);
    assert_eq!(coins[0].avg_high_price, 5);
    assert_eq!(source.requested(), vec![item(4151), item(995)]);
}

// ─── Failure policy ──────────────────────────────────────────────────────────

#[tokio::test]
async fn cold_start_failure_returns_empty() {
    let source = ScriptedSource::new(vec![server_error()]);
    let (client, _clock) = client_with(source);

    let lookup = client.price_history().get_detailed(item(4151)).await;
    assert!(lookup.points.is_empty());
    assert_eq!(lookup.source, LookupSource::Empty);
    assert_eq!(lookup.fetched_at, None);
    assert_eq!(client.price_history().freshness(item(4151)).await, Freshness::Absent);
    assert_eq!(client.stats().fetch_failures, 1);
}

#[tokio::test]
async fn stale_data_served_when_refetch_fails() {
    let source = ScriptedSource::new(vec![
        array_body(&[(T0 - 600, 110, 100), (T0 - 300, 111, 100), (T0, 109, 99)]),
        server_error(),
        server_error(),
    ]);
    let (client, clock) = client_with(source.clone());

    let original = client.get_price_history(item(4151)).await;
    let entry = client.price_history().peek(item(4151)).await.unwrap();

    clock.advance(chrono::Duration::minutes(7));
    let stale = client.get_price_history(item(4151)).await;
    assert_eq!(stale, original);

    // fetched_at is untouched, so the next call tries the network again.
    let again = client.price_history().get_detailed(item(4151)).await;
    assert_eq!(again.source, LookupSource::Stale);
    assert_eq!(again.fetched_at, Some(entry.fetched_at));
    assert_eq!(client.price_history().peek(item(4151)).await.unwrap(), entry);
    assert_eq!(source.calls(), 3);
    assert_eq!(client.stats().stale_served, 2);
}

#[tokio::test]
async fn stale_entry_recovers_on_successful_refetch() {
    let source = ScriptedSource::new(vec![
        array_body(&[(T0, 110, 100)]),
        server_error(),
        array_body(&[(T0 + 900, 130, 120)]),
    ]);
    let (client, clock) = client_with(source);

    client.get_price_history(item(7)).await;
    clock.advance(chrono::Duration::minutes(10));
    assert_eq!(
        client.price_history().get_detailed(item(7)).await.source,
        LookupSource::Stale
    );

    let fresh = client.price_history().get_detailed(item(7)).await;
    assert_eq!(fresh.source, LookupSource::Fresh);
    assert_eq!(fresh.points.len(), 1);
    assert_eq!(fresh.points[0].avg_low_price, 120);
    assert_eq!(client.price_history().freshness(item(7)).await, Freshness::Fresh);
}

#[tokio::test]
async fn empty_successful_fetch_is_cached() {
    let source = ScriptedSource::new(vec![Ok(r#"{"data": null}"#.to_string())]);
    let (client, _clock) = client_with(source.clone());

    assert!(client.get_price_history(item(1)).await.is_empty());
    let lookup = client.price_history().get_detailed(item(1)).await;
    assert_eq!(lookup.source, LookupSource::Cache);
    assert_eq!(source.calls(), 1);
}

// ─── Pipeline ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn fetched_batch_is_retained_filtered_and_sorted() {
    let eighteen_hours = 18 * 60 * 60;
    let source = ScriptedSource::new(vec![array_body(&[
        (T0 - 60, 100, 50),
        (T0 - eighteen_hours - 1, 100, 50),
        (T0 - 120, 1000, 50),
        (T0 - eighteen_hours, 100, 50),
        (T0 - 180, 100, 50),
        (T0 - 240, 100, 0),
        (T0 - 300, 90, 95),
    ])]);
    let (client, _clock) = client_with(source);

    let points = client.get_price_history(item(4151)).await;
    let timestamps: Vec<i64> = points.iter().map(|p| p.timestamp.timestamp()).collect();
    assert_eq!(timestamps, vec![T0 - eighteen_hours, T0 - 180, T0 - 60]);

    let stats = client.stats();
    assert_eq!(stats.outliers_removed, 2);
    assert_eq!(stats.points_malformed, 0);
}

#[tokio::test]
async fn range_frames_cached_series() {
    let source = ScriptedSource::new(vec![array_body(&[(T0 - 300, 120, 100), (T0, 140, 110)])]);
    let (client, _clock) = client_with(source);

    let points = client.get_price_history(item(4151)).await;
    let range = PriceRange::from_points(&points).unwrap();
    assert_eq!(range.min_price, 100);
    assert_eq!(range.max_price, 140);
    assert_eq!(range.max_time.timestamp() - range.min_time.timestamp(), 300);
}

// ─── Concurrency ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn concurrent_misses_for_one_item_share_a_fetch() {
    let source = ScriptedSource::slow(
        vec![array_body(&[(T0, 110, 100)])],
        Duration::from_millis(50),
    );
    let (client, _clock) = client_with(source.clone());

    let ph = client.price_history();
    let (a, b, c) = tokio::join!(
        ph.get_detailed(item(4151)),
        ph.get_detailed(item(4151)),
        ph.get_detailed(item(4151)),
    );

    assert_eq!(source.calls(), 1);
    assert_eq!(a.points, b.points);
    assert_eq!(b.points, c.points);
    let fresh = [a.source, b.source, c.source]
        .iter()
        .filter(|s| **s == LookupSource::Fresh)
        .count();
    assert_eq!(fresh, 1);
}

#[tokio::test]
async fn concurrent_misses_for_different_items_fetch_in_parallel() {
    let source = ScriptedSource::slow(
        vec![array_body(&[(T0, 110, 100)]), array_body(&[(T0, 5, 4)])],
        Duration::from_millis(200),
    );
    let (client, _clock) = client_with(source.clone());

    let started = std::time::Instant::now();
    let other = client.clone();
    let handle = tokio::spawn(async move { other.get_price_history(item(995)).await });
    let whip = client.get_price_history(item(4151)).await;
    let coins = handle.await.unwrap();

    assert_eq!(source.calls(), 2);
    assert!(!whip.is_empty() && !coins.is_empty());
    assert!(started.elapsed() < Duration::from_millis(390));
}

#[tokio::test]
async fn clones_share_one_cache() {
    let source = ScriptedSource::new(vec![array_body(&[(T0, 110, 100)])]);
    let (client, _clock) = client_with(source.clone());
    let clone = client.clone();

    client.get_price_history(item(4151)).await;
    let cached = clone.get_price_history(item(4151)).await;

    assert_eq!(cached.len(), 1);
    assert_eq!(source.calls(), 1);

    clone.clear_all_caches().await;
    assert!(client.price_history().peek(item(4151)).await.is_none());
}
