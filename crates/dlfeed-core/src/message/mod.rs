//! Live-channel message model.
//!
//! Every unit on the channel is a `{ "Key": ..., "Value": ... }` envelope.
//! `decode` turns one raw unit into a closed `Message` variant; keys we do not
//! know become `Message::Unrecognized` so routing stays exhaustive.

mod decode;
mod wire;

pub use decode::{decode, DecodeError};

/// Stable job key. The server sends numeric or string ids; both normalise here.
pub type JobId = String;

/// Partial progress for a job. Absent fields leave the stored job untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressUpdate {
    pub percent: Option<f64>,
    pub eta: Option<String>,
    pub file_size_bytes: Option<u64>,
}

/// Job metadata announced once the server has probed the resource.
#[derive(Debug, Clone, PartialEq)]
pub struct JobInfo {
    pub id: JobId,
    pub title: Option<String>,
    pub file_size_bytes: Option<u64>,
    /// Later servers nest a progress object under `info.Progress`.
    pub progress: Option<ProgressUpdate>,
}

/// A playable result pushed for streaming.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamLink {
    pub download_url: String,
    pub title: String,
    pub artist: String,
}

/// One entry of the recently-downloaded list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentEntry {
    pub url: String,
    pub title: String,
    pub artist: String,
}

/// Decoded live-channel message.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Server-side failure text, shown verbatim.
    Error(String),
    Info(JobInfo),
    Progress { id: JobId, update: ProgressUpdate },
    /// Free-form status line. Without an id it belongs to no job.
    Unknown { id: Option<JobId>, text: String },
    Completed { id: JobId },
    Link { download_url: String },
    LinkStream(StreamLink),
    Recent(Vec<RecentEntry>),
    /// A `Key` this client does not route.
    Unrecognized { key: String },
}

impl Message {
    /// Wire discriminant, used for logging.
    pub fn kind(&self) -> &str {
        match self {
            Message::Error(_) => "error",
            Message::Info(_) => "info",
            Message::Progress { .. } => "progress",
            Message::Unknown { .. } => "unknown",
            Message::Completed { .. } => "completed",
            Message::Link { .. } => "link",
            Message::LinkStream(_) => "link_stream",
            Message::Recent(_) => "recent",
            Message::Unrecognized { key } => key,
        }
    }
}
