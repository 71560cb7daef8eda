//! Record read operations: load and list.

use anyhow::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::super::db::RecordStore;
use super::super::types::{PlaybackRecord, RecordKey, StoredRecord};

fn record_from_row(row: &SqliteRow) -> PlaybackRecord {
    PlaybackRecord {
        position_secs: row.get("position_secs"),
        duration_secs: row.get("duration_secs"),
        playback_rate: row.get("playback_rate"),
        saved_at_ms: row.get("saved_at"),
    }
}

impl RecordStore {
    /// Load the record for `key`. Absent on a miss, a disabled store, or a
    /// storage failure (logged).
    pub async fn load(&self, key: &RecordKey) -> Option<PlaybackRecord> {
        match self.try_load(key).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(key = %key, "playback record load failed: {:#}", e);
                None
            }
        }
    }

    pub async fn try_load(&self, key: &RecordKey) -> Result<Option<PlaybackRecord>> {
        let Some(pool) = &self.pool else {
            return Ok(None);
        };
        let row = sqlx::query(
            r#"
            SELECT position_secs, duration_secs, playback_rate, saved_at
            FROM playback_records
            WHERE key = ?1
            "#,
        )
        .bind(key.as_str())
        .fetch_optional(pool)
        .await?;

        Ok(row.as_ref().map(record_from_row))
    }

    /// All records, most recently saved first. Empty on failure.
    pub async fn list(&self) -> Vec<StoredRecord> {
        match self.try_list().await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("playback record listing failed: {:#}", e);
                Vec::new()
            }
        }
    }

    pub async fn try_list(&self) -> Result<Vec<StoredRecord>> {
        let Some(pool) = &self.pool else {
            return Ok(Vec::new());
        };
        let rows = sqlx::query(
            r#"
            SELECT key, position_secs, duration_secs, playback_rate, saved_at
            FROM playback_records
            ORDER BY saved_at DESC, key ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let key: String = row.get("key");
            out.push(StoredRecord {
                key: RecordKey::from_raw(key),
                record: record_from_row(&row),
            });
        }
        Ok(out)
    }
}
