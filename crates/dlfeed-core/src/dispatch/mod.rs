//! Message dispatch: decode raw units and route them to the job store or to
//! the renderer sink.

mod gate;
mod sink;

pub use gate::{GateClaim, StreamGate};
pub use sink::{ChannelSink, ClientEvent, EventSink, ResultLink};

use crate::jobs::{JobStore, JobUpdate};
use crate::message::{decode, Message};

/// What happened to one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// State changed and/or the sink was notified.
    Applied,
    /// A `link_stream` arrived while another stream was playing.
    Suppressed,
    /// Valid message with nothing to do (empty `recent`, unknown job completed).
    NoOp,
    /// Undecodable or unrecognized unit.
    Dropped,
}

/// Routes decoded messages. Owns the job store; meant to live on a single
/// consumer task so messages are applied in receive order.
pub struct Dispatcher<S: EventSink> {
    jobs: JobStore,
    sink: S,
    gate: StreamGate,
}

impl<S: EventSink> Dispatcher<S> {
    pub fn new(sink: S, gate: StreamGate) -> Self {
        Self {
            jobs: JobStore::new(),
            sink,
            gate,
        }
    }

    pub fn jobs(&self) -> &JobStore {
        &self.jobs
    }

    pub fn gate(&self) -> &StreamGate {
        &self.gate
    }

    /// Decode and apply one raw unit. Protocol faults are logged and dropped.
    pub fn dispatch(&mut self, raw: &str) -> DispatchOutcome {
        match decode(raw) {
            Ok(msg) => self.apply(msg),
            Err(err) => {
                tracing::debug!(error = %err, unit = raw, "dropping undecodable unit");
                DispatchOutcome::Dropped
            }
        }
    }

    pub fn apply(&mut self, msg: Message) -> DispatchOutcome {
        tracing::trace!(kind = msg.kind(), "dispatching");
        match msg {
            Message::Error(text) => {
                self.sink.emit(ClientEvent::Status(text));
                DispatchOutcome::Applied
            }
            Message::Info(info) => {
                let id = info.id.clone();
                let job = self.jobs.upsert(&id, JobUpdate::from(info));
                self.sink.emit(ClientEvent::JobChanged(job));
                DispatchOutcome::Applied
            }
            Message::Progress { id, update } => {
                let job = self.jobs.upsert(&id, JobUpdate::from(update));
                self.sink.emit(ClientEvent::JobChanged(job));
                DispatchOutcome::Applied
            }
            Message::Unknown { id: Some(id), text } => {
                let job = self.jobs.append_status(&id, text);
                self.sink.emit(ClientEvent::JobChanged(job));
                DispatchOutcome::Applied
            }
            Message::Unknown { id: None, text } => {
                self.sink.emit(ClientEvent::Status(text));
                DispatchOutcome::Applied
            }
            Message::Completed { id } => {
                if self.jobs.remove(&id) {
                    self.sink.emit(ClientEvent::JobRemoved(id));
                    DispatchOutcome::Applied
                } else {
                    DispatchOutcome::NoOp
                }
            }
            Message::Link { download_url } => {
                self.sink
                    .emit(ClientEvent::ResultReady(ResultLink::Download { download_url }));
                DispatchOutcome::Applied
            }
            Message::LinkStream(link) => {
                if self.gate.is_playing() {
                    tracing::debug!(
                        url = %link.download_url,
                        "stream already playing, ignoring link_stream"
                    );
                    DispatchOutcome::Suppressed
                } else {
                    self.sink
                        .emit(ClientEvent::ResultReady(ResultLink::Stream(link)));
                    DispatchOutcome::Applied
                }
            }
            Message::Recent(entries) if entries.is_empty() => DispatchOutcome::NoOp,
            Message::Recent(entries) => {
                self.sink.emit(ClientEvent::Recent(entries));
                DispatchOutcome::Applied
            }
            Message::Unrecognized { key } => {
                tracing::debug!(key = %key, "dropping unrecognized message");
                DispatchOutcome::Dropped
            }
        }
    }
}
