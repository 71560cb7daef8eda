//! Record write operations: save, remove, sweep.

use anyhow::Result;
use std::time::Duration;

use super::super::db::{unix_millis, RecordStore};
use super::super::types::{PlaybackRecord, RecordKey};

impl RecordStore {
    /// Store `record` under `key`, replacing any previous record wholesale.
    /// Failures are logged and otherwise ignored.
    pub async fn save(&self, key: &RecordKey, record: &PlaybackRecord) {
        if let Err(e) = self.try_save(key, record).await {
            tracing::warn!(key = %key, "playback record save failed: {:#}", e);
        }
    }

    pub async fn try_save(&self, key: &RecordKey, record: &PlaybackRecord) -> Result<()> {
        let Some(pool) = &self.pool else {
            return Ok(());
        };
        sqlx::query(
            r#"
            INSERT INTO playback_records (
                key, position_secs, duration_secs, playback_rate, saved_at
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (key) DO UPDATE SET
                position_secs = excluded.position_secs,
                duration_secs = excluded.duration_secs,
                playback_rate = excluded.playback_rate,
                saved_at = excluded.saved_at
            "#,
        )
        .bind(key.as_str())
        .bind(record.position_secs)
        .bind(record.duration_secs)
        .bind(record.playback_rate)
        .bind(record.saved_at_ms)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Delete the record for `key`. Returns whether a record existed.
    pub async fn remove(&self, key: &RecordKey) -> bool {
        let Some(pool) = &self.pool else {
            return false;
        };
        let result = sqlx::query(
            r#"
            DELETE FROM playback_records
            WHERE key = ?1
            "#,
        )
        .bind(key.as_str())
        .execute(pool)
        .await;

        match result {
            Ok(r) => r.rows_affected() > 0,
            Err(e) => {
                tracing::warn!(key = %key, "playback record remove failed: {:#}", e);
                false
            }
        }
    }

    /// Delete every record saved more than `retention` ago. Returns the
    /// number of records removed (0 on failure).
    pub async fn sweep_expired(&self, retention: Duration) -> u64 {
        self.sweep_expired_at(retention, unix_millis()).await
    }

    /// `sweep_expired` against an explicit "now" in Unix milliseconds.
    ///
    /// One set-based DELETE: concurrent saves and loads on other keys are
    /// never invalidated by the sweep, and repeating it is harmless.
    pub async fn sweep_expired_at(&self, retention: Duration, now_ms: i64) -> u64 {
        let Some(pool) = &self.pool else {
            return 0;
        };
        let retention_ms = i64::try_from(retention.as_millis()).unwrap_or(i64::MAX);
        let cutoff = now_ms.saturating_sub(retention_ms);
        let result = sqlx::query(
            r#"
            DELETE FROM playback_records
            WHERE saved_at < ?1
            "#,
        )
        .bind(cutoff)
        .execute(pool)
        .await;

        match result {
            Ok(r) => {
                let removed = r.rows_affected();
                if removed > 0 {
                    tracing::debug!(removed, cutoff, "evicted expired playback records");
                }
                removed
            }
            Err(e) => {
                tracing::warn!("playback record sweep failed: {:#}", e);
                0
            }
        }
    }
}
