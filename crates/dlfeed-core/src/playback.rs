//! Per-track playback session: resume from the stored position, then save the
//! position periodically while the track plays.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::dispatch::{GateClaim, StreamGate};
use crate::playback_db::{unix_millis, PlaybackRecord, RecordKey, RecordStore};

/// Lower bound for the save interval; a zero interval would spin.
const MIN_SAVE_INTERVAL: Duration = Duration::from_millis(100);

/// The external audio widget. The session only reads its clock and asks it to
/// seek; decoding and buffering are the player's business.
pub trait Player: Send + Sync {
    fn position_secs(&self) -> f64;
    fn duration_secs(&self) -> Option<f64>;
    fn playback_rate(&self) -> f64;
    fn is_playing(&self) -> bool;
    fn seek(&self, position_secs: f64);
    fn set_playback_rate(&self, rate: f64);
}

/// One active stream. Owns the stream gate until it is stopped, dropped, or
/// displaced by a newer session; while its player plays, further stream
/// links are suppressed.
pub struct PlaybackSession {
    key: RecordKey,
    gate: StreamGate,
    claim: GateClaim,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PlaybackSession {
    /// Restore the stored position (if any) and start the save ticker.
    pub async fn open(
        store: RecordStore,
        key: RecordKey,
        player: Arc<dyn Player>,
        gate: StreamGate,
        save_interval: Duration,
    ) -> Self {
        let claim = gate.hold(&player);

        if let Some(record) = store.load(&key).await {
            if record.position_secs > 0.0 {
                player.seek(record.position_secs);
                if let Some(rate) = record.playback_rate.filter(|r| r.is_finite() && *r > 0.0) {
                    player.set_playback_rate(rate);
                }
                tracing::info!(
                    key = %key,
                    position_secs = record.position_secs,
                    "resuming playback"
                );
            }
        }

        let cancel = CancellationToken::new();
        let task = tokio::spawn(save_loop(
            store,
            key.clone(),
            player,
            save_interval.max(MIN_SAVE_INTERVAL),
            cancel.clone(),
        ));

        Self {
            key,
            gate,
            claim,
            cancel,
            task: Some(task),
        }
    }

    pub fn key(&self) -> &RecordKey {
        &self.key
    }

    /// Stop saving and wait for an in-flight save to finish. The gate is
    /// released once the session is gone, unless a newer session owns it.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                tracing::warn!(error = %err, "playback save task ended abnormally");
            }
        }
        tracing::debug!(key = %self.key, "playback stopped");
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.gate.release(&self.claim);
    }
}

async fn save_loop(
    store: RecordStore,
    key: RecordKey,
    player: Arc<dyn Player>,
    every: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; saving starts one interval in.
    ticker.tick().await;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }
        if cancel.is_cancelled() {
            break;
        }
        if !player.is_playing() {
            continue;
        }
        let record = PlaybackRecord {
            position_secs: player.position_secs(),
            duration_secs: player.duration_secs(),
            playback_rate: Some(player.playback_rate()),
            saved_at_ms: unix_millis(),
        };
        store.save(&key, &record).await;
    }
}
