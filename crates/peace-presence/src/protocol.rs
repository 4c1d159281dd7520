//! Presence wire protocol.
//!
//! Every frame is a JSON envelope `{ "type": string, "data"?: object }`.
//! Only `amount_online_users` changes client state; the other server
//! envelopes are recognised for diagnostics and otherwise ignored.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// Messages the client sends to the presence server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outbound {
    /// Heartbeat; the server answers with `pong` and refreshes last-seen.
    Ping,
    /// Ask for the current online count.
    GetAmountOnlineUsers,
}

impl Outbound {
    pub fn to_json(self) -> serde_json::Result<String> {
        serde_json::to_string(&self)
    }
}

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// Raw envelope; `data` is interpreted per `type`.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: serde_json::Value,
}

/// Server messages the client understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// Current number of online users.
    AmountOnlineUsers { count: u64 },
    /// Welcome frame sent right after the upgrade.
    ConnectionEstablished { user_id: Option<String> },
    Pong,
    /// Full user list. Only its size is kept.
    OnlineUsersList { users: usize },
    ServerError { code: String, message: String },
}

/// Parse one text frame. Returns `None` for invalid JSON, unknown types, and
/// known types whose payload has the wrong shape (e.g. a string count).
pub fn parse_inbound(text: &str) -> Option<Inbound> {
    let envelope: Envelope = serde_json::from_str(text).ok()?;
    let data = &envelope.data;

    match envelope.kind.as_str() {
        "amount_online_users" => {
            let count = data.get("count")?.as_u64()?;
            Some(Inbound::AmountOnlineUsers { count })
        }
        "connection_established" => Some(Inbound::ConnectionEstablished {
            user_id: data
                .get("user_id")
                .and_then(|v| v.as_str())
                .map(str::to_string),
        }),
        "pong" => Some(Inbound::Pong),
        "online_users_list" => {
            let users = data
                .get("users")
                .and_then(|u| u.as_array())
                .map_or(0, |u| u.len());
            Some(Inbound::OnlineUsersList { users })
        }
        "error" => Some(Inbound::ServerError {
            code: data
                .get("code")
                .and_then(|c| c.as_str())
                .unwrap_or("UNKNOWN")
                .to_string(),
            message: data
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or_default()
                .to_string(),
        }),
        _ => None,
    }
}
