//! End-to-end checks against a local WebSocket server.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use peace_presence::{
    ConnectionState, CookieJar, PresenceConfig, PresenceManager, PresenceStatus, Visibility,
    WebSocketTransport,
};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::time::timeout;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::header::SEC_WEBSOCKET_PROTOCOL;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;

fn mount(url: String) -> PresenceManager {
    PresenceManager::mount(
        PresenceConfig {
            url,
            ..PresenceConfig::default()
        },
        Arc::new(WebSocketTransport::new()),
        Arc::new(CookieJar::with("access_token", "tok-A")),
        Visibility::Visible,
    )
}

#[tokio::test]
async fn negotiates_bearer_and_reports_count() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (offered_tx, offered_rx) = oneshot::channel::<String>();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let callback = move |req: &Request, mut response: Response| -> Result<Response, ErrorResponse> {
            let offered = req
                .headers()
                .get(SEC_WEBSOCKET_PROTOCOL)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            let _ = offered_tx.send(offered);
            response
                .headers_mut()
                .insert(SEC_WEBSOCKET_PROTOCOL, HeaderValue::from_static("bearer"));
            Ok(response)
        };
        let mut ws = accept_hdr_async(stream, callback).await.unwrap();

        let first = ws.next().await.unwrap().unwrap();
        assert_eq!(first.to_text().unwrap(), r#"{"type":"get_amount_online_users"}"#);

        ws.send(Message::text(
            r#"{"type":"connection_established","data":{"user_id":"u1"}}"#.to_string(),
        ))
        .await
        .unwrap();
        ws.send(Message::text(
            r#"{"type":"amount_online_users","data":{"count":3,"ts":1700000000}}"#.to_string(),
        ))
        .await
        .unwrap();

        // Run until the client goes away.
        while let Some(Ok(frame)) = ws.next().await {
            if frame.is_close() {
                break;
            }
        }
    });

    let manager = mount(format!("ws://{addr}/ws"));
    let mut view = manager.subscribe();

    let snapshot = timeout(Duration::from_secs(10), view.wait_for(|v| v.online_count == 3))
        .await
        .expect("count within 10s")
        .unwrap()
        .clone();
    assert!(snapshot.is_connected());
    assert_eq!(snapshot.status, PresenceStatus::Connected);

    assert_eq!(offered_rx.await.unwrap(), "bearer, tok-A");

    manager.unmount().await;
    timeout(Duration::from_secs(10), server)
        .await
        .expect("server sees the close")
        .unwrap();
}

#[tokio::test]
async fn refused_connection_schedules_reconnect() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let manager = mount(format!("ws://{addr}/ws"));
    let mut view = manager.subscribe();

    let snapshot = timeout(
        Duration::from_secs(10),
        view.wait_for(|v| v.state == ConnectionState::ReconnectPending),
    )
    .await
    .expect("failure within 10s")
    .unwrap()
    .clone();
    assert!(matches!(snapshot.status, PresenceStatus::Disconnected(_)));
    assert_eq!(snapshot.online_count, 0);

    manager.unmount().await;
}

#[tokio::test]
async fn non_websocket_url_is_not_retried() {
    let manager = mount("http://127.0.0.1/ws".into());
    let mut view = manager.subscribe();

    let snapshot = timeout(
        Duration::from_secs(10),
        view.wait_for(|v| v.state == ConnectionState::Closed),
    )
    .await
    .expect("failure within 10s")
    .unwrap()
    .clone();
    assert!(snapshot
        .status
        .to_string()
        .starts_with("Failed to open connection"));

    manager.unmount().await;
}
