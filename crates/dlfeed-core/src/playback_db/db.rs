//! SQLite-backed playback store implementation.
//!
//! Handles connection, migrations, and timestamp helpers. Record reads and
//! writes live in `records`.

use anyhow::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Percent-encode a path for use in a sqlite:// URI so spaces and special chars don't break parsing.
fn path_to_sqlite_uri(path: &Path) -> String {
    let s = path.to_string_lossy();
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '%' => out.push_str("%25"),
            ' ' => out.push_str("%20"),
            '#' => out.push_str("%23"),
            '?' => out.push_str("%3F"),
            '&' => out.push_str("%26"),
            c => out.push(c),
        }
    }
    format!("sqlite://{}", out)
}

/// Handle to the playback-position store.
///
/// The database file lives under the XDG state directory:
/// `~/.local/state/dlfeed/playback.db`. A store without a pool is
/// "disabled": every operation is a no-op.
#[derive(Clone)]
pub struct RecordStore {
    pub(crate) pool: Option<Pool<Sqlite>>,
}

impl RecordStore {
    /// Open (or create) the default store and run migrations.
    pub async fn open_default() -> Result<Self> {
        Self::open_at(crate::config::state_path("playback.db")?).await
    }

    /// Open (or create) the store at a specific path. Creates parent dirs if needed.
    pub async fn open_at(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let uri = path_to_sqlite_uri(path) + "?mode=rwc";
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect(&uri)
            .await?;
        let store = RecordStore { pool: Some(pool) };
        store.migrate().await?;
        Ok(store)
    }

    /// Like `open_default`, but falls back to a disabled store when the
    /// database cannot be opened. Playback then simply never resumes.
    pub async fn open_default_or_disabled() -> Self {
        match Self::open_default().await {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!("playback store unavailable, positions will not persist: {:#}", e);
                Self::disabled()
            }
        }
    }

    /// A store that keeps nothing.
    pub fn disabled() -> Self {
        RecordStore { pool: None }
    }

    pub fn is_available(&self) -> bool {
        self.pool.is_some()
    }

    async fn migrate(&self) -> Result<()> {
        let Some(pool) = &self.pool else {
            return Ok(());
        };
        // - `saved_at` is Unix milliseconds; the index keeps sweeps cheap.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS playback_records (
                key TEXT PRIMARY KEY NOT NULL,
                position_secs REAL NOT NULL,
                duration_secs REAL,
                playback_rate REAL,
                saved_at INTEGER NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS playback_records_saved_at
            ON playback_records (saved_at);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

/// Current time as Unix milliseconds.
pub fn unix_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

#[cfg(test)]
/// Open an in-memory store for tests (no disk I/O).
pub(crate) async fn open_memory() -> Result<RecordStore> {
    // Single connection to avoid in-memory pool handing back a different empty DB.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    let store = RecordStore { pool: Some(pool) };
    store.migrate().await?;
    Ok(store)
}
