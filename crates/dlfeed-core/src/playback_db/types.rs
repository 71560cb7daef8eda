//! Types used by the playback-position store.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Key of a stored playback record.
///
/// Records are keyed by `"<title> - <artist>"` so a track keeps its resume
/// point even when the server hands out a different URL for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey(String);

impl RecordKey {
    pub fn for_track(title: &str, artist: &str) -> Self {
        Self(format!("{title} - {artist}"))
    }

    /// Wrap an already-derived key (e.g. read back from the store).
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resume point for one media resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackRecord {
    pub position_secs: f64,
    pub duration_secs: Option<f64>,
    pub playback_rate: Option<f64>,
    /// Unix time in milliseconds.
    pub saved_at_ms: i64,
}

impl PlaybackRecord {
    /// Resume progress, only when a positive duration is known.
    pub fn progress(&self) -> Option<MediaProgress> {
        let duration = self.duration_secs.filter(|d| d.is_finite() && *d > 0.0)?;
        Some(MediaProgress {
            position_secs: self.position_secs,
            duration_secs: duration,
            percent: self.position_secs / duration * 100.0,
        })
    }
}

/// A record paired with its key, as returned by `RecordStore::list`.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub key: RecordKey,
    pub record: PlaybackRecord,
}

/// How far into a track the listener got, for the recent list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaProgress {
    pub position_secs: f64,
    pub duration_secs: f64,
    pub percent: f64,
}

impl fmt::Display for MediaProgress {
    /// `HH:MM:SS / HH:MM:SS - NNN%`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} - {:>3.0}%",
            hms(self.position_secs),
            hms(self.duration_secs),
            self.percent
        )
    }
}

fn hms(secs: f64) -> String {
    let total = if secs.is_finite() && secs > 0.0 {
        secs as u64
    } else {
        0
    };
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total / 60) % 60,
        total % 60
    )
}
