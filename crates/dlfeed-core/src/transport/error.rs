use thiserror::Error;

/// Failures seen by the transport layer.
///
/// [`TransportError::Undecodable`] is per-frame: the frame is dropped and the
/// connection stays up. Every other variant ends the current connection.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server answered with HTTP {0}")]
    Status(u16),
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("remote closed the channel")]
    Closed,
    #[error("undecodable frame: {0}")]
    Undecodable(String),
}

impl TransportError {
    /// True when only the current frame is lost, not the connection.
    pub fn is_frame_local(&self) -> bool {
        matches!(self, TransportError::Undecodable(_))
    }
}
