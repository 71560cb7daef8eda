use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::playback::Player;

#[derive(Default)]
struct GateState {
    issued: u64,
    owner: Option<Owner>,
}

struct Owner {
    token: u64,
    player: Weak<dyn Player>,
}

/// Which playback session currently owns the stream output.
///
/// A new `link_stream` is only turned away while the owner's player reports
/// that it is playing. A paused, stopped or dropped player leaves the way
/// open.
#[derive(Clone, Default)]
pub struct StreamGate {
    state: Arc<Mutex<GateState>>,
}

/// Ownership token from [`StreamGate::hold`]. Releasing with a stale claim
/// does nothing.
#[derive(Debug, PartialEq, Eq)]
pub struct GateClaim {
    token: u64,
}

impl StreamGate {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make `player` the owner, displacing whoever held the gate before.
    pub fn hold(&self, player: &Arc<dyn Player>) -> GateClaim {
        let mut state = self.lock();
        state.issued += 1;
        let token = state.issued;
        state.owner = Some(Owner {
            token,
            player: Arc::downgrade(player),
        });
        GateClaim { token }
    }

    /// Clear the gate if `claim` still owns it. Returns whether it did.
    pub fn release(&self, claim: &GateClaim) -> bool {
        let mut state = self.lock();
        match &state.owner {
            Some(owner) if owner.token == claim.token => {
                state.owner = None;
                true
            }
            _ => false,
        }
    }

    /// True while the owner's player is playing.
    pub fn is_playing(&self) -> bool {
        let player = self.lock().owner.as_ref().and_then(|o| o.player.upgrade());
        // Asked outside the lock; the player may take locks of its own.
        player.is_some_and(|p| p.is_playing())
    }

    pub fn is_held(&self) -> bool {
        self.lock().owner.is_some()
    }
}

impl fmt::Debug for StreamGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("StreamGate")
            .field("owner", &state.owner.as_ref().map(|o| o.token))
            .finish()
    }
}
