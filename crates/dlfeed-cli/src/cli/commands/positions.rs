//! `dlfeed positions` – list stored playback positions.

use anyhow::Result;
use dlfeed_core::playback_db::{unix_millis, RecordStore};

pub async fn run_positions() -> Result<()> {
    let store = RecordStore::open_default().await?;
    let records = store.try_list().await?;
    if records.is_empty() {
        println!("No stored positions.");
        return Ok(());
    }

    let now = unix_millis();
    println!("{:<28} {:<6} TRACK", "PROGRESS", "AGE");
    for stored in records {
        let progress = stored
            .record
            .progress()
            .map(|p| p.to_string())
            .unwrap_or_else(|| format!("{:.0}s", stored.record.position_secs));
        let age_hours = (now - stored.record.saved_at_ms).max(0) / 3_600_000;
        println!(
            "{:<28} {:<6} {}",
            progress,
            format!("{age_hours}h"),
            stored.key
        );
    }
    Ok(())
}
