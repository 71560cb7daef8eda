//! Job reconciliation store.
//!
//! Keeps one mergeable `Job` per server job id. Partial updates only touch
//! the fields they carry, so `progress` arriving before `info` is fine: the
//! job simply has no title until `info` shows up.

mod job;
mod store;

pub use job::{Job, JobUpdate};
pub use store::JobStore;
