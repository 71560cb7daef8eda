//! Job snapshot and partial update types.

use std::collections::VecDeque;
use std::time::SystemTime;

use crate::message::{JobId, JobInfo, ProgressUpdate};

/// Current view of one in-flight job.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: JobId,
    pub title: Option<String>,
    pub file_size_bytes: Option<u64>,
    /// Always within `[0, 100]`.
    pub progress_percent: f64,
    pub eta: Option<String>,
    /// Newest status line first.
    pub status_log: VecDeque<String>,
    pub last_updated: SystemTime,
    /// First-seen order, used to keep rendering stable.
    pub(super) seq: u64,
}

impl Job {
    pub(super) fn new(id: JobId, seq: u64) -> Self {
        Self {
            id,
            title: None,
            file_size_bytes: None,
            progress_percent: 0.0,
            eta: None,
            status_log: VecDeque::new(),
            last_updated: SystemTime::now(),
            seq,
        }
    }

    /// Title for display; empty until `info` has arrived.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// Size in MiB, as the status view shows it.
    pub fn file_size_mib(&self) -> Option<f64> {
        self.file_size_bytes
            .map(|b| b as f64 / (1024.0 * 1024.0))
    }

    /// Most recent status line, if any.
    pub fn latest_status(&self) -> Option<&str> {
        self.status_log.front().map(String::as_str)
    }

    pub(super) fn apply(&mut self, update: JobUpdate) {
        if let Some(title) = update.title {
            self.title = Some(title);
        }
        if let Some(bytes) = update.file_size_bytes {
            self.file_size_bytes = Some(bytes);
        }
        if let Some(pct) = update.progress_percent.and_then(clamp_percent) {
            self.progress_percent = pct;
        }
        if let Some(eta) = update.eta {
            self.eta = Some(eta);
        }
        self.last_updated = SystemTime::now();
    }
}

/// Values above 100 truncate to 100, below 0 to 0; NaN/inf are ignored.
pub(super) fn clamp_percent(pct: f64) -> Option<f64> {
    pct.is_finite().then(|| pct.clamp(0.0, 100.0))
}

/// Partial job fields. `None` means "leave the stored value alone".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobUpdate {
    pub title: Option<String>,
    pub file_size_bytes: Option<u64>,
    pub progress_percent: Option<f64>,
    pub eta: Option<String>,
}

impl JobUpdate {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn file_size_bytes(mut self, bytes: u64) -> Self {
        self.file_size_bytes = Some(bytes);
        self
    }

    pub fn percent(mut self, pct: f64) -> Self {
        self.progress_percent = Some(pct);
        self
    }

    pub fn eta(mut self, eta: impl Into<String>) -> Self {
        self.eta = Some(eta.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &JobUpdate::default()
    }
}

impl From<ProgressUpdate> for JobUpdate {
    fn from(p: ProgressUpdate) -> Self {
        Self {
            title: None,
            file_size_bytes: p.file_size_bytes,
            progress_percent: p.percent,
            eta: p.eta,
        }
    }
}

impl From<JobInfo> for JobUpdate {
    fn from(info: JobInfo) -> Self {
        let mut update = info.progress.map(JobUpdate::from).unwrap_or_default();
        update.title = info.title;
        if info.file_size_bytes.is_some() {
            update.file_size_bytes = info.file_size_bytes;
        }
        update
    }
}
