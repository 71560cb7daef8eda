//! `dlfeed forget` – drop one stored position.

use anyhow::Result;
use dlfeed_core::playback_db::{RecordKey, RecordStore};

pub async fn run_forget(title: &str, artist: &str) -> Result<()> {
    let store = RecordStore::open_default().await?;
    let key = RecordKey::for_track(title, artist);
    if store.remove(&key).await {
        println!("Forgot {key}.");
    } else {
        println!("No stored position for {key}.");
    }
    Ok(())
}
