//! Transport seam between the presence controller and the network.
//!
//! The controller only sees a [`Link`]: a command sender plus an event
//! receiver. [`WebSocketTransport`] backs it with `tokio-tungstenite`; tests
//! back it with plain channels through [`Link::channel`].

mod link;
mod websocket;

use async_trait::async_trait;

pub use link::{CloseReason, Link, LinkCommand, LinkEvent, LinkPeer};
pub use peace_common::TransportError;
pub use websocket::WebSocketTransport;

/// Everything needed to open one authenticated connection.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectRequest {
    pub url: String,
    /// Authentication scheme, sent as the first subprotocol.
    pub scheme: String,
    /// Bearer token, sent as the second subprotocol.
    pub token: String,
}

impl std::fmt::Debug for ConnectRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectRequest")
            .field("url", &self.url)
            .field("scheme", &self.scheme)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Opens connections to the presence server.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn connect(&self, request: ConnectRequest) -> Result<Link, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_request_debug_redacts_token() {
        let request = ConnectRequest {
            url: "ws://localhost:8081/ws".into(),
            scheme: "bearer".into(),
            token: "eyJhbGciOi.secret".into(),
        };
        let debug = format!("{request:?}");
        assert!(debug.contains("ws://localhost:8081/ws"));
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("secret"));
    }
}
