//! `dlfeed sweep` – evict stale playback positions.

use anyhow::Result;
use dlfeed_core::config::DlfeedConfig;
use dlfeed_core::playback_db::RecordStore;
use std::time::Duration;

pub async fn run_sweep(cfg: &DlfeedConfig, days: Option<u64>) -> Result<()> {
    let retention = match days {
        Some(d) => Duration::from_secs(d.saturating_mul(86_400)),
        None => cfg.playback().retention(),
    };
    let store = RecordStore::open_default().await?;
    let removed = store.sweep_expired(retention).await;
    println!(
        "Removed {} position(s) older than {} day(s).",
        removed,
        retention.as_secs() / 86_400
    );
    Ok(())
}
