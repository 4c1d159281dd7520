//! `tokio-tungstenite` transport.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::http::header::SEC_WEBSOCKET_PROTOCOL;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::{Error as WsError, Message as WsMessage};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use super::link::{CloseReason, Link, LinkCommand, LinkEvent, LinkPeer};
use super::{ConnectRequest, Transport, TransportError};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket transport authenticating through subprotocol negotiation
/// (`Sec-WebSocket-Protocol: <scheme>, <token>`).
#[derive(Debug, Clone)]
pub struct WebSocketTransport {
    /// Inbound events buffered per connection.
    buffer: usize,
}

impl Default for WebSocketTransport {
    fn default() -> Self {
        Self { buffer: 64 }
    }
}

impl WebSocketTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Transport for WebSocketTransport {
    async fn connect(&self, request: ConnectRequest) -> Result<Link, TransportError> {
        let ws_request = build_request(&request)?;
        info!(url = %request.url, "Connecting to presence server");

        let ws = match tokio_tungstenite::connect_async(ws_request).await {
            Ok((ws, _response)) => ws,
            Err(WsError::Url(e)) => return Err(TransportError::InvalidRequest(e.to_string())),
            Err(e) => return Err(TransportError::Connect(e.to_string())),
        };

        let (link, peer) = Link::channel(self.buffer);
        tokio::spawn(pump(ws, peer));
        Ok(link)
    }
}

/// Build the handshake request with the two-element subprotocol list.
pub(crate) fn build_request(request: &ConnectRequest) -> Result<Request, TransportError> {
    let mut ws_request = request
        .url
        .as_str()
        .into_client_request()
        .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;

    let protocols = format!("{}, {}", request.scheme, request.token);
    let value = HeaderValue::from_str(&protocols).map_err(|_| {
        TransportError::InvalidRequest("token is not a valid subprotocol value".into())
    })?;
    ws_request.headers_mut().insert(SEC_WEBSOCKET_PROTOCOL, value);
    Ok(ws_request)
}

/// Move frames between the socket and the controller until either side ends.
async fn pump(ws: Socket, peer: LinkPeer) {
    let LinkPeer {
        mut commands,
        events,
    } = peer;
    let (mut sink, mut stream) = ws.split();

    let reason = loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(LinkCommand::Send(text)) => {
                    if let Err(e) = sink.send(WsMessage::Text(text.into())).await {
                        warn!(error = %e, "WebSocket write failed");
                        break Some(CloseReason::Error(e.to_string()));
                    }
                }
                Some(LinkCommand::Close) | None => {
                    let _ = sink.send(WsMessage::Close(None)).await;
                    debug!("Closed presence connection");
                    break None;
                }
            },

            frame = stream.next() => match frame {
                Some(Ok(WsMessage::Text(text))) => {
                    if events.send(LinkEvent::Message(text.to_string())).await.is_err() {
                        break None;
                    }
                }
                Some(Ok(WsMessage::Close(_))) | None => {
                    info!("Presence server closed connection");
                    break Some(CloseReason::Server);
                }
                Some(Err(e)) => {
                    warn!(error = %e, "WebSocket error");
                    break Some(CloseReason::Error(e.to_string()));
                }
                _ => {}
            }
        }
    };

    if let Some(reason) = reason {
        let _ = events.send(LinkEvent::Closed(reason)).await;
    }
}
