pub mod config;
pub mod logging;

pub mod backoff;
pub mod client;
pub mod dispatch;
pub mod endpoint;
pub mod jobs;
pub mod message;
pub mod playback;
pub mod playback_db;
pub mod request;
pub mod transport;
