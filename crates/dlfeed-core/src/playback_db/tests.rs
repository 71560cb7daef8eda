//! Tests for the playback store (use in-memory DB helper from db).

use std::time::Duration;

use crate::playback_db::db::{open_memory, unix_millis};
use crate::playback_db::{PlaybackRecord, RecordKey, RecordStore};

const DAY_MS: i64 = 86_400_000;

fn record(position: f64, saved_at_ms: i64) -> PlaybackRecord {
    PlaybackRecord {
        position_secs: position,
        duration_secs: Some(600.0),
        playback_rate: Some(1.1),
        saved_at_ms,
    }
}

#[tokio::test]
async fn save_then_load_roundtrip() {
    let store = open_memory().await.unwrap();
    let key = RecordKey::for_track("Song", "Band");
    assert!(store.load(&key).await.is_none());

    let rec = record(42.5, unix_millis());
    store.save(&key, &rec).await;
    assert_eq!(store.load(&key).await, Some(rec));
}

#[tokio::test]
async fn save_overwrites_wholesale() {
    let store = open_memory().await.unwrap();
    let key = RecordKey::for_track("Song", "Band");
    store.save(&key, &record(10.0, 1_000)).await;

    let replacement = PlaybackRecord {
        position_secs: 20.0,
        duration_secs: None,
        playback_rate: None,
        saved_at_ms: 2_000,
    };
    store.save(&key, &replacement).await;
    let loaded = store.load(&key).await.unwrap();
    assert_eq!(loaded, replacement, "old duration/rate must not survive");
    assert_eq!(store.list().await.len(), 1);
}

#[tokio::test]
async fn sweep_removes_records_past_retention() {
    let store = open_memory().await.unwrap();
    let now = 100 * DAY_MS;
    let old = RecordKey::for_track("Old", "A");
    let fresh = RecordKey::for_track("Fresh", "B");
    store.save(&old, &record(1.0, now - 8 * DAY_MS)).await;
    store.save(&fresh, &record(2.0, now - 6 * DAY_MS)).await;

    let removed = store
        .sweep_expired_at(Duration::from_secs(7 * 86_400), now)
        .await;
    assert_eq!(removed, 1);
    assert!(store.load(&old).await.is_none());
    assert!(store.load(&fresh).await.is_some());

    // Repeating the sweep is harmless.
    let removed = store
        .sweep_expired_at(Duration::from_secs(7 * 86_400), now)
        .await;
    assert_eq!(removed, 0);
}

#[tokio::test]
async fn sweep_with_wall_clock_keeps_recent_saves() {
    let store = open_memory().await.unwrap();
    let key = RecordKey::for_track("Now", "Playing");
    store.save(&key, &record(3.0, unix_millis())).await;
    assert_eq!(store.sweep_expired(Duration::from_secs(3 * 86_400)).await, 0);
    assert!(store.load(&key).await.is_some());
}

#[tokio::test]
async fn list_is_newest_first_and_remove_is_idempotent() {
    let store = open_memory().await.unwrap();
    let a = RecordKey::for_track("A", "x");
    let b = RecordKey::for_track("B", "y");
    store.save(&a, &record(1.0, 1_000)).await;
    store.save(&b, &record(2.0, 5_000)).await;

    let keys: Vec<String> = store
        .list()
        .await
        .into_iter()
        .map(|r| r.key.to_string())
        .collect();
    assert_eq!(keys, vec!["B - y", "A - x"]);

    assert!(store.remove(&a).await);
    assert!(!store.remove(&a).await);
    assert_eq!(store.list().await.len(), 1);
}

#[tokio::test]
async fn disabled_store_degrades_to_noop() {
    let store = RecordStore::disabled();
    assert!(!store.is_available());
    let key = RecordKey::for_track("T", "A");
    store.save(&key, &record(5.0, unix_millis())).await;
    assert!(store.load(&key).await.is_none());
    assert_eq!(store.sweep_expired(Duration::from_secs(1)).await, 0);
    assert!(store.list().await.is_empty());
    assert!(!store.remove(&key).await);
}

#[tokio::test]
async fn open_at_persists_across_handles() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("playback.db");
    let key = RecordKey::for_track("Persist", "Me");
    {
        let store = RecordStore::open_at(&path).await.unwrap();
        store.save(&key, &record(77.0, unix_millis())).await;
    }
    let reopened = RecordStore::open_at(&path).await.unwrap();
    assert_eq!(reopened.load(&key).await.unwrap().position_secs, 77.0);
}

#[test]
fn record_key_uses_title_and_artist() {
    assert_eq!(RecordKey::for_track("Song", "Band").as_str(), "Song - Band");
}

#[test]
fn media_progress_rendering() {
    let rec = PlaybackRecord {
        position_secs: 3725.0,
        duration_secs: Some(7450.0),
        playback_rate: None,
        saved_at_ms: 0,
    };
    let progress = rec.progress().unwrap();
    assert_eq!(progress.percent, 50.0);
    assert_eq!(progress.to_string(), "01:02:05 / 02:04:10 -  50%");

    let unknown_duration = PlaybackRecord {
        duration_secs: Some(0.0),
        ..rec
    };
    assert!(unknown_duration.progress().is_none());
}
