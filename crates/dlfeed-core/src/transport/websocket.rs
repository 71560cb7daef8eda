use async_trait::async_trait;
use futures::{future, StreamExt};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use url::Url;

use super::{Connector, EventStream, TransportError};

/// WebSocket live channel. Each text frame is one event; binary frames are
/// not part of the protocol and are reported as undecodable.
#[derive(Debug, Clone)]
pub struct WsConnector {
    url: Url,
}

impl WsConnector {
    pub fn new(url: Url) -> Self {
        Self { url }
    }
}

#[async_trait]
impl Connector for WsConnector {
    async fn connect(&self) -> Result<EventStream, TransportError> {
        let (socket, _response) = connect_async(self.url.as_str()).await?;

        // Control frames are answered by tungstenite while we read.
        let events = socket.filter_map(|frame| {
            future::ready(match frame {
                Ok(WsMessage::Text(text)) => Some(Ok(text)),
                Ok(WsMessage::Binary(data)) => Some(Err(TransportError::Undecodable(format!(
                    "{} byte binary frame",
                    data.len()
                )))),
                Ok(WsMessage::Close(_)) => Some(Err(TransportError::Closed)),
                Ok(WsMessage::Ping(_) | WsMessage::Pong(_) | WsMessage::Frame(_)) => None,
                Err(err) => Some(Err(TransportError::from(err))),
            })
        });
        Ok(events.boxed())
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}
