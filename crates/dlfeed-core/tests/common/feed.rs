//! Scripted live channels and event helpers.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use dlfeed_core::config::{DlfeedConfig, TransportKind};
use dlfeed_core::dispatch::ClientEvent;
use dlfeed_core::transport::{Connector, EventStream, TransportError};
use futures::{stream, StreamExt};
use tokio::sync::mpsc::UnboundedReceiver;

/// Delivers a fixed list of events on the first connection and then keeps it
/// open. Later attempts fail.
#[derive(Clone)]
pub struct OneShotFeed {
    events: Arc<Mutex<Option<Vec<String>>>>,
    pub attempts: Arc<Mutex<usize>>,
}

impl OneShotFeed {
    pub fn new<I, T>(events: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            events: Arc::new(Mutex::new(Some(events.into_iter().map(Into::into).collect()))),
            attempts: Arc::new(Mutex::new(0)),
        }
    }
}

#[async_trait]
impl Connector for OneShotFeed {
    async fn connect(&self) -> Result<EventStream, TransportError> {
        *self.attempts.lock().unwrap() += 1;
        match self.events.lock().unwrap().take() {
            Some(events) => Ok(stream::iter(events.into_iter().map(Ok))
                .chain(stream::pending())
                .boxed()),
            None => Err(TransportError::Closed),
        }
    }
}

pub fn config_for(server_url: &str, transport: TransportKind) -> DlfeedConfig {
    DlfeedConfig {
        server_url: server_url.to_string(),
        transport,
        ..DlfeedConfig::default()
    }
}

/// Next renderer event, failing the test after a few seconds of silence.
pub async fn next_event(rx: &mut UnboundedReceiver<ClientEvent>) -> ClientEvent {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for a client event")
        .expect("event channel closed")
}
