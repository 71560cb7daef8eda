//! Live channel transport: connect, frame, and reconnect with backoff.
//!
//! A [`Connector`] opens one connection and yields raw events. The
//! [`TransportManager`] owns the connection lifecycle: it splits events into
//! units, publishes [`ConnectionState`] changes and schedules reconnects on a
//! debounced timer until the owner closes it.

mod connector;
mod error;
pub mod framing;
mod manager;
mod sse;
mod websocket;

pub use connector::{Connector, EventStream};
pub use error::TransportError;
pub use manager::{TransportHandle, TransportManager};
pub use sse::SseConnector;
pub use websocket::WsConnector;

use std::fmt;

/// Connection lifecycle state. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests;
