//! Presence manager: connection lifecycle, heartbeat and polling cadence,
//! reconnect with backoff, and token rotation.

mod controller;
mod handle;
mod timers;
mod types;


pub use handle::PresenceManager;
pub use types::{
    ConnectionState, HostSignal, PresenceConfig, PresenceStatus, PresenceView, Visibility,
};
