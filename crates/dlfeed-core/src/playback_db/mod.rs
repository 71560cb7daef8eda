//! Persistent playback-position store (SQLite via sqlx).
//!
//! One row per resource key holding the last saved position, duration,
//! playback rate and save time. Rows older than a caller-chosen retention
//! window are evicted by `sweep_expired`. Storage failures never reach the
//! caller: a store that cannot be opened or queried behaves as empty.

pub mod db;
mod records;
pub mod types;

pub use db::*;
pub use types::*;

#[cfg(test)]
mod tests;
