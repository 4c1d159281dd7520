//! Realtime online-user count over an authenticated WebSocket.
//!
//! [`PresenceManager`] keeps one connection per mounted view, polls the
//! server for the number of online users, and survives drops with
//! exponential backoff. The access token comes from a [`TokenSource`] and is
//! re-checked periodically so a rotated token forces a fresh connection.

pub mod backoff;
pub mod manager;
pub mod protocol;
pub mod token;
pub mod transport;

pub use backoff::BackoffPolicy;
pub use manager::{
    ConnectionState, HostSignal, PresenceConfig, PresenceManager, PresenceStatus, PresenceView,
    Visibility,
};
pub use protocol::{parse_inbound, Inbound, Outbound};
pub use token::{parse_cookies, CookieFile, CookieJar, TokenSource};
pub use transport::{
    CloseReason, ConnectRequest, Link, LinkCommand, LinkEvent, LinkPeer, Transport,
    TransportError, WebSocketTransport,
};
