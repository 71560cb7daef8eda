//! Lifecycle tests against a scripted connector under paused time.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::{stream, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{sleep, Instant};

use super::{
    ConnectionState, Connector, EventStream, TransportError, TransportHandle, TransportManager,
};
use crate::backoff::BackoffPolicy;

enum Step {
    Fail,
    /// Deliver these items, then either end the stream or keep it open.
    Open {
        items: Vec<Result<String, TransportError>>,
        hold: bool,
    },
}

#[derive(Clone)]
struct Scripted {
    steps: Arc<Mutex<VecDeque<Step>>>,
    attempts: Arc<Mutex<Vec<Instant>>>,
}

impl Scripted {
    fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Arc::new(Mutex::new(steps.into())),
            attempts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Attempt times in whole seconds since `start`.
    fn attempt_offsets(&self, start: Instant) -> Vec<u64> {
        self.attempts
            .lock()
            .unwrap()
            .iter()
            .map(|at| at.duration_since(start).as_secs())
            .collect()
    }
}

#[async_trait]
impl Connector for Scripted {
    async fn connect(&self) -> Result<EventStream, TransportError> {
        self.attempts.lock().unwrap().push(Instant::now());
        let step = self.steps.lock().unwrap().pop_front().unwrap_or(Step::Fail);
        match step {
            Step::Fail => Err(TransportError::Status(503)),
            Step::Open { items, hold } => {
                let delivered = stream::iter(items);
                if hold {
                    Ok(delivered.chain(stream::pending()).boxed())
                } else {
                    Ok(delivered.boxed())
                }
            }
        }
    }
}

fn start(connector: &Scripted) -> (TransportHandle, mpsc::UnboundedReceiver<String>) {
    TransportManager::new(connector.clone(), BackoffPolicy::default()).connect()
}

fn ok(text: &str) -> Result<String, TransportError> {
    Ok(text.to_string())
}

#[tokio::test(start_paused = true)]
async fn failed_attempts_back_off_exponentially() {
    let connector = Scripted::new(Vec::new());
    let t0 = Instant::now();
    let (handle, _units) = start(&connector);

    sleep(Duration::from_secs(16)).await;
    assert_eq!(connector.attempt_offsets(t0), vec![0, 1, 3, 7, 15]);
    handle.close().await;
}

#[tokio::test(start_paused = true)]
async fn successful_connect_resets_backoff() {
    let connector = Scripted::new(vec![
        Step::Fail,
        Step::Fail,
        Step::Open {
            items: Vec::new(),
            hold: false,
        },
    ]);
    let t0 = Instant::now();
    let (handle, _units) = start(&connector);

    sleep(Duration::from_secs(7)).await;
    // 1s, 2s, then a connect that drops: the next delay starts over at 1s.
    assert_eq!(connector.attempt_offsets(t0), vec![0, 1, 3, 4, 6]);
    handle.close().await;
}

#[tokio::test(start_paused = true)]
async fn batched_events_are_split_into_ordered_units() {
    let connector = Scripted::new(vec![Step::Open {
        items: vec![ok("{\"n\":1}\r\n{\"n\":2}\n"), ok("{\"n\":3}")],
        hold: true,
    }]);
    let (handle, mut units) = start(&connector);

    let mut state = handle.subscribe();
    state
        .wait_for(|s| *s == ConnectionState::Connected)
        .await
        .unwrap();

    let mut got = Vec::new();
    for _ in 0..3 {
        got.push(units.recv().await.unwrap());
    }
    assert_eq!(got, vec!["{\"n\":1}", "{\"n\":2}", "{\"n\":3}"]);
    assert_eq!(handle.state(), ConnectionState::Connected);

    handle.close().await;
    assert!(units.recv().await.is_none(), "unit stream ends after close");
    assert_eq!(*state.borrow(), ConnectionState::Disconnected);
}

#[tokio::test(start_paused = true)]
async fn undecodable_frame_keeps_connection() {
    let connector = Scripted::new(vec![Step::Open {
        items: vec![
            ok("a"),
            Err(TransportError::Undecodable("binary".into())),
            ok("b"),
        ],
        hold: true,
    }]);
    let (handle, mut units) = start(&connector);

    assert_eq!(units.recv().await.as_deref(), Some("a"));
    assert_eq!(units.recv().await.as_deref(), Some("b"));
    sleep(Duration::from_secs(30)).await;
    assert_eq!(connector.attempts.lock().unwrap().len(), 1);
    handle.close().await;
}

#[tokio::test(start_paused = true)]
async fn close_cancels_pending_reconnect() {
    let connector = Scripted::new(Vec::new());
    let (handle, _units) = start(&connector);
    let state = handle.subscribe();

    sleep(Duration::from_millis(500)).await;
    assert_eq!(connector.attempts.lock().unwrap().len(), 1);
    handle.close().await;

    sleep(Duration::from_secs(120)).await;
    assert_eq!(connector.attempts.lock().unwrap().len(), 1);
    assert_eq!(*state.borrow(), ConnectionState::Disconnected);
}

#[tokio::test(start_paused = true)]
async fn dropping_handle_stops_reconnecting() {
    let connector = Scripted::new(Vec::new());
    let (handle, _units) = start(&connector);
    sleep(Duration::from_millis(100)).await;
    drop(handle);

    sleep(Duration::from_secs(120)).await;
    assert_eq!(connector.attempts.lock().unwrap().len(), 1);
}
