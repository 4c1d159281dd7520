//! Presence connection configuration types.

use serde::{Deserialize, Serialize};

/// Presence connection configuration.
///
/// Interval fields are in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenceConfig {
    /// WebSocket URL of the presence server.
    pub server_url: String,
    /// First subprotocol sent during the handshake; the token is the second.
    pub auth_scheme: String,
    /// Cookie key holding the access token.
    pub token_key: String,
    /// Cookie file to read the token from. Empty means none.
    pub cookie_file: String,
    pub heartbeat_interval: u32,
    pub hidden_heartbeat_interval: u32,
    pub count_poll_interval: u32,
    pub token_check_interval: u32,
    pub connect_timeout: u32,
    pub reconnect: ReconnectConfig,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            server_url: "ws://localhost:8081/ws".into(),
            auth_scheme: "bearer".into(),
            token_key: "access_token".into(),
            cookie_file: String::new(),
            heartbeat_interval: 10,
            hidden_heartbeat_interval: 30,
            count_poll_interval: 30,
            token_check_interval: 10,
            connect_timeout: 15,
            reconnect: ReconnectConfig::default(),
        }
    }
}

/// Reconnect backoff settings, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconnectConfig {
    pub base_delay_ms: u32,
    pub max_delay_ms: u32,
    /// Upper bound (exclusive) of the random delay added to each attempt.
    pub jitter_ms: u32,
    /// Exponent cap; later attempts reuse this one's delay.
    pub max_attempt: u32,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: 2000,
            max_delay_ms: 30000,
            jitter_ms: 1000,
            max_attempt: 10,
        }
    }
}
