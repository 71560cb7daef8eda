//! Debounced one-shot reconnect timer.

use std::pin::Pin;
use std::time::Duration;

use tokio::time::{sleep, Sleep};

/// Holds at most one pending reconnect deadline.
///
/// Scheduling while a deadline is pending replaces it, so repeated error
/// notifications for the same drop never stack reconnect attempts.
#[derive(Debug, Default)]
pub struct ReconnectTimer {
    pending: Option<Pin<Box<Sleep>>>,
}

impl ReconnectTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timer for `delay` from now. Returns true if a pending deadline
    /// was cancelled and replaced.
    pub fn schedule(&mut self, delay: Duration) -> bool {
        let replaced = self.pending.is_some();
        if replaced {
            tracing::debug!(?delay, "replacing pending reconnect timer");
        }
        self.pending = Some(Box::pin(sleep(delay)));
        replaced
    }

    /// Disarm the timer. Returns true if a deadline was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Wait for the pending deadline, then disarm. Never resolves while the
    /// timer is disarmed. Cancel-safe: dropping the future keeps the deadline.
    pub async fn fired(&mut self) {
        match self.pending.as_mut() {
            Some(deadline) => {
                deadline.as_mut().await;
                self.pending = None;
            }
            None => std::future::pending::<()>().await,
        }
    }
}
