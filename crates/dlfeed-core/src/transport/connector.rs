use async_trait::async_trait;
use futures::stream::BoxStream;

use super::TransportError;

/// Events from one open connection. Each `Ok` item is one delivered event
/// (it may still carry several newline-separated units). The stream ending
/// means the remote side closed.
pub type EventStream = BoxStream<'static, Result<String, TransportError>>;

/// Opens a single live-channel connection.
///
/// Implementations do not retry; reconnect policy lives in
/// [`TransportManager`](super::TransportManager).
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    async fn connect(&self) -> Result<EventStream, TransportError>;

    /// Short description for log lines (usually the endpoint URL).
    fn describe(&self) -> String {
        "live channel".to_string()
    }
}

#[async_trait]
impl Connector for Box<dyn Connector> {
    async fn connect(&self) -> Result<EventStream, TransportError> {
        (**self).connect().await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
