use tokio::sync::mpsc;

use crate::jobs::Job;
use crate::message::{JobId, RecentEntry, StreamLink};

/// A finished result announced by the server.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultLink {
    /// Plain download link.
    Download { download_url: String },
    /// Playable stream link. Only emitted while no other stream is playing.
    Stream(StreamLink),
}

/// What the dispatcher hands to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// User-facing status text: server `error` payloads and job-less status lines.
    Status(String),
    JobChanged(Job),
    JobRemoved(JobId),
    ResultReady(ResultLink),
    Recent(Vec<RecentEntry>),
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: ClientEvent);
}

/// Forwards events over a tokio channel. A closed receiver is ignored.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<ClientEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<ClientEvent>) -> Self {
        Self { tx }
    }

    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ClientEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: ClientEvent) {
        let _ = self.tx.send(event);
    }
}
