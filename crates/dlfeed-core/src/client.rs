//! Live client: wires the transport to the dispatcher on one consumer task.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::backoff::BackoffPolicy;
use crate::config::{DlfeedConfig, TransportKind};
use crate::dispatch::{Dispatcher, EventSink, StreamGate};
use crate::endpoint::Endpoints;
use crate::jobs::Job;
use crate::message::StreamLink;
use crate::playback::{PlaybackSession, Player};
use crate::playback_db::{RecordKey, RecordStore};
use crate::transport::{
    ConnectionState, Connector, SseConnector, TransportHandle, TransportManager, WsConnector,
};

/// Everything a live session needs, resolved from configuration.
#[derive(Clone)]
pub struct LiveClient {
    endpoints: Endpoints,
    transport: TransportKind,
    backoff: BackoffPolicy,
    retention: Duration,
    save_interval: Duration,
    store: RecordStore,
    gate: StreamGate,
}

impl LiveClient {
    pub fn new(config: &DlfeedConfig, store: RecordStore) -> Result<Self> {
        let playback = config.playback();
        Ok(Self {
            endpoints: Endpoints::parse(&config.server_url)?,
            transport: config.transport,
            backoff: config.backoff_policy(),
            retention: playback.retention(),
            save_interval: playback.save_interval(),
            store,
            gate: StreamGate::new(),
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Gate shared by the dispatcher and playback sessions.
    pub fn gate(&self) -> &StreamGate {
        &self.gate
    }

    /// Connector for the configured transport flavour.
    pub fn connector(&self) -> Box<dyn Connector> {
        match self.transport {
            TransportKind::Sse => Box::new(SseConnector::new(self.endpoints.sse())),
            TransportKind::Websocket => Box::new(WsConnector::new(self.endpoints.websocket())),
        }
    }

    /// Sweep expired playback records, then open the configured live channel.
    pub async fn start<S: EventSink + 'static>(&self, sink: S) -> LiveSession<S> {
        self.start_with(self.connector(), sink).await
    }

    /// Like [`start`](Self::start) with an explicit connector.
    pub async fn start_with<C, S>(&self, connector: C, sink: S) -> LiveSession<S>
    where
        C: Connector,
        S: EventSink + 'static,
    {
        let swept = self.store.sweep_expired(self.retention).await;
        if swept > 0 {
            tracing::info!(swept, "evicted expired playback records");
        }

        let (transport, mut units) = TransportManager::new(connector, self.backoff).connect();
        let mut dispatcher = Dispatcher::new(sink, self.gate.clone());
        let consumer = tokio::spawn(async move {
            while let Some(unit) = units.recv().await {
                dispatcher.dispatch(&unit);
            }
            dispatcher
        });

        LiveSession {
            transport,
            consumer,
        }
    }

    /// Start a playback session for a stream link, keyed by its title and artist.
    pub async fn open_playback(
        &self,
        link: &StreamLink,
        player: Arc<dyn Player>,
    ) -> PlaybackSession {
        PlaybackSession::open(
            self.store.clone(),
            RecordKey::for_track(&link.title, &link.artist),
            player,
            self.gate.clone(),
            self.save_interval,
        )
        .await
    }
}

/// A running live channel and its consumer task.
pub struct LiveSession<S: EventSink + 'static> {
    transport: TransportHandle,
    consumer: JoinHandle<Dispatcher<S>>,
}

impl<S: EventSink + 'static> LiveSession<S> {
    pub fn state(&self) -> ConnectionState {
        self.transport.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.transport.subscribe()
    }

    /// Close the channel, drain already-received units and return the jobs
    /// still in flight.
    pub async fn close(self) -> Result<Vec<Job>> {
        self.transport.close().await;
        let dispatcher = self.consumer.await?;
        Ok(dispatcher.jobs().all())
    }
}
