use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::framing::split_units;
use super::{ConnectionState, Connector, EventStream, TransportError};
use crate::backoff::{Backoff, BackoffPolicy, ReconnectTimer};

/// Owns the connect / reconnect lifecycle of one live channel.
pub struct TransportManager<C: Connector> {
    connector: Arc<C>,
    policy: BackoffPolicy,
}

impl<C: Connector> TransportManager<C> {
    pub fn new(connector: C, policy: BackoffPolicy) -> Self {
        Self {
            connector: Arc::new(connector),
            policy,
        }
    }

    /// Start the lifecycle task. Units arrive on the returned receiver in
    /// delivery order; the receiver closes once the transport is closed.
    ///
    /// Must be called from within a tokio runtime.
    pub fn connect(self) -> (TransportHandle, mpsc::UnboundedReceiver<String>) {
        let (units_tx, units_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);
        let cancel = CancellationToken::new();

        let lifecycle = Lifecycle {
            connector: self.connector,
            backoff: Backoff::new(self.policy),
            timer: ReconnectTimer::new(),
            state: state_tx,
            units: units_tx,
            cancel: cancel.clone(),
        };
        let task = tokio::spawn(lifecycle.run());

        let handle = TransportHandle {
            cancel,
            state: state_rx,
            task: Some(task),
        };
        (handle, units_rx)
    }
}

/// Owner side of a running transport. Dropping it closes the transport.
#[derive(Debug)]
pub struct TransportHandle {
    cancel: CancellationToken,
    state: watch::Receiver<ConnectionState>,
    task: Option<JoinHandle<()>>,
}

impl TransportHandle {
    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Watch state transitions.
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }

    /// Close the connection, cancel any pending reconnect and wait for the
    /// lifecycle task to finish. No reconnect happens afterwards.
    pub async fn close(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                tracing::warn!(error = %err, "transport task ended abnormally");
            }
        }
    }
}

impl Drop for TransportHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

enum SessionEnd {
    /// Owner asked to close.
    Closed,
    /// Nobody is reading units any more.
    ConsumerGone,
    /// Remote side ended the connection or it failed.
    Dropped(TransportError),
}

struct Lifecycle<C: Connector> {
    connector: Arc<C>,
    backoff: Backoff,
    timer: ReconnectTimer,
    state: watch::Sender<ConnectionState>,
    units: mpsc::UnboundedSender<String>,
    cancel: CancellationToken,
}

impl<C: Connector> Lifecycle<C> {
    async fn run(mut self) {
        let endpoint = self.connector.describe();
        loop {
            self.set_state(ConnectionState::Connecting);
            let attempt = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                attempt = self.connector.connect() => attempt,
            };

            match attempt {
                Ok(events) => {
                    self.set_state(ConnectionState::Connected);
                    self.backoff.reset();
                    tracing::info!(endpoint = %endpoint, "live channel connected");
                    match self.pump(events).await {
                        SessionEnd::Closed | SessionEnd::ConsumerGone => break,
                        SessionEnd::Dropped(err) => {
                            tracing::warn!(endpoint = %endpoint, error = %err, "live channel dropped")
                        }
                    }
                }
                Err(err) => {
                    tracing::warn!(endpoint = %endpoint, error = %err, "live channel connect failed")
                }
            }

            self.set_state(ConnectionState::Disconnected);
            let delay = self.backoff.next_delay();
            self.timer.schedule(delay);
            tracing::info!(delay_secs = delay.as_secs_f64(), "reconnect scheduled");

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                _ = self.timer.fired() => {}
            }
        }

        self.timer.cancel();
        self.set_state(ConnectionState::Disconnected);
        tracing::debug!(endpoint = %endpoint, "transport closed");
    }

    async fn pump(&mut self, mut events: EventStream) -> SessionEnd {
        loop {
            let item = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return SessionEnd::Closed,
                item = events.next() => item,
            };
            match item {
                None => return SessionEnd::Dropped(TransportError::Closed),
                Some(Ok(event)) => {
                    for unit in split_units(&event) {
                        if self.units.send(unit.to_string()).is_err() {
                            return SessionEnd::ConsumerGone;
                        }
                    }
                }
                Some(Err(err)) if err.is_frame_local() => {
                    tracing::debug!(error = %err, "dropping frame");
                }
                Some(Err(err)) => return SessionEnd::Dropped(err),
            }
        }
    }

    fn set_state(&self, next: ConnectionState) {
        self.state.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            tracing::debug!(from = %current, to = %next, "connection state");
            *current = next;
            true
        });
    }
}
