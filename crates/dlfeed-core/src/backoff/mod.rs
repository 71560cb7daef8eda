//! Reconnect backoff policy and the debounced reconnect timer.
//!
//! The transport manager owns one `Backoff` and one `ReconnectTimer` per
//! instance; nothing here is global, so independent managers can coexist.

mod policy;
mod timer;

pub use policy::{Backoff, BackoffPolicy};
pub use timer::ReconnectTimer;
