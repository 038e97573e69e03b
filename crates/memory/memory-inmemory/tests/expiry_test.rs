//! Tests for expiry sweeps and the background ExpiryScheduler.
//!
//! Tokio time is paused, so sleeping in a test auto-advances the runtime clock and
//! fires the scheduler's interval deterministically.

use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use memory_core::{ManualClock, MemoryConfig, MemoryStore, MetadataPatch};
use memory_inmemory::{ExpiryScheduler, InMemoryMemoryStore};
use std::sync::Arc;
use std::time::Duration;

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
}

fn expiring_config() -> MemoryConfig {
    MemoryConfig {
        auto_expire: true,
        expire_days: 7,
        expiry_interval_secs: 60,
        ..MemoryConfig::default()
    }
}

fn store_with(config: MemoryConfig) -> (InMemoryMemoryStore, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(start()));
    let store = InMemoryMemoryStore::with_clock(config, clock.clone()).unwrap();
    (store, clock)
}

#[tokio::test]
async fn test_sweep_removes_records_older_than_cutoff() {
    let (store, clock) = store_with(expiring_config());

    let old = store.add("ancient history lesson", MetadataPatch::new()).await;
    clock.advance(ChronoDuration::days(3));
    let boundary = store.add("borderline reminder", MetadataPatch::new()).await;
    clock.advance(ChronoDuration::days(4));
    let fresh = store.add("brand new idea", MetadataPatch::new()).await;

    // now = start + 7d, cutoff = start: strictly older records go, the one at the cutoff stays
    assert_eq!(store.sweep_expired().await, 0);

    clock.advance(ChronoDuration::days(3));
    // cutoff = start + 3d
    assert_eq!(store.sweep_expired().await, 1);
    assert!(store.get(old).await.is_none());
    assert!(store.get(boundary).await.is_some());
    assert!(store.get(fresh).await.is_some());
}

#[tokio::test]
async fn test_sweep_is_noop_when_auto_expire_disabled() {
    let (store, clock) = store_with(MemoryConfig {
        auto_expire: false,
        expire_days: 1,
        ..MemoryConfig::default()
    });

    store.add("would be expired", MetadataPatch::new()).await;
    clock.advance(ChronoDuration::days(30));

    assert_eq!(store.sweep_expired().await, 0);
    assert_eq!(store.len().await, 1);
    assert!(store.start_expiry().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_scheduler_sweeps_on_each_tick() {
    let (store, clock) = store_with(expiring_config());
    store.add("will expire soon", MetadataPatch::new()).await;

    let handle = store.start_expiry().await.expect("auto-expire is enabled");
    assert!(handle.is_running());

    // first tick at 60s; record is not old enough yet
    tokio::time::sleep(Duration::from_secs(61)).await;
    assert_eq!(store.len().await, 1);

    clock.advance(ChronoDuration::days(8));
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert!(store.is_empty().await);

    drop(handle);
}

#[tokio::test(start_paused = true)]
async fn test_stopped_scheduler_no_longer_sweeps() {
    let (store, clock) = store_with(expiring_config());
    store.add("outlives the scheduler", MetadataPatch::new()).await;

    let mut handle = ExpiryScheduler::new(store.clone(), Duration::from_secs(60)).spawn();
    handle.stop();
    handle.stop();
    assert!(!handle.is_running());

    clock.advance(ChronoDuration::days(30));
    tokio::time::sleep(Duration::from_secs(600)).await;
    assert_eq!(store.len().await, 1);

    // on-demand sweeps still work without the scheduler
    assert_eq!(store.sweep_expired().await, 1);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_handle_stops_scheduler() {
    let (store, clock) = store_with(expiring_config());
    store.add("dropped handle keeps me", MetadataPatch::new()).await;

    let handle = store.start_expiry().await.expect("auto-expire is enabled");
    drop(handle);

    clock.advance(ChronoDuration::days(30));
    tokio::time::sleep(Duration::from_secs(600)).await;
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_sweep_window_beyond_date_range_expires_nothing() {
    let (store, clock) = store_with(MemoryConfig {
        expire_days: 100_000_000,
        ..expiring_config()
    });
    store.add("kept for a very long time", MetadataPatch::new()).await;
    clock.advance(ChronoDuration::days(365));

    assert_eq!(store.sweep_expired().await, 0);
    assert_eq!(store.len().await, 1);
}

#[test]
fn test_oversized_interval_is_rejected_by_store() {
    let config = MemoryConfig {
        expiry_interval_secs: u64::MAX,
        ..expiring_config()
    };
    assert!(matches!(
        InMemoryMemoryStore::new(config),
        Err(memory_core::MemoryError::Config(_))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_scheduler_clamps_oversized_period() {
    let (store, _clock) = store_with(expiring_config());

    let scheduler = ExpiryScheduler::new(store, Duration::MAX);
    assert_eq!(
        scheduler.period(),
        Duration::from_secs(memory_core::MAX_EXPIRY_INTERVAL_SECS)
    );

    let handle = scheduler.spawn();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(handle.is_running());
}
