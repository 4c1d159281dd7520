//! Configuration, view state, and host-signal types for the presence manager.

use std::time::Duration;

use crate::backoff::BackoffPolicy;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Runtime configuration for one mounted presence manager.
#[derive(Debug, Clone)]
pub struct PresenceConfig {
    /// WebSocket URL of the presence server.
    pub url: String,
    /// First subprotocol of the handshake.
    pub auth_scheme: String,
    /// Key of the access token in the token source.
    pub token_key: String,
    /// Heartbeat period while the view is visible.
    pub heartbeat_visible: Duration,
    /// Heartbeat period while the view is hidden.
    pub heartbeat_hidden: Duration,
    /// Count-request period; only runs while visible.
    pub count_poll: Duration,
    /// How often the token source is checked for a rotated token.
    pub token_watch: Duration,
    /// Upper bound on a single connection attempt.
    pub connect_timeout: Duration,
    pub backoff: BackoffPolicy,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            url: "ws://localhost:8081/ws".into(),
            auth_scheme: "bearer".into(),
            token_key: "access_token".into(),
            heartbeat_visible: Duration::from_secs(10),
            heartbeat_hidden: Duration::from_secs(30),
            count_poll: Duration::from_secs(30),
            token_watch: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(15),
            backoff: BackoffPolicy::default(),
        }
    }
}

impl PresenceConfig {
    /// Heartbeat period for the given visibility.
    pub fn heartbeat_for(&self, visibility: Visibility) -> Duration {
        match visibility {
            Visibility::Visible => self.heartbeat_visible,
            Visibility::Hidden => self.heartbeat_hidden,
        }
    }
}

// ---------------------------------------------------------------------------
// Host signals
// ---------------------------------------------------------------------------

/// Whether the hosting view is currently shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

impl Visibility {
    pub fn is_hidden(self) -> bool {
        self == Visibility::Hidden
    }
}

/// Notifications from the host environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostSignal {
    VisibilityChanged(Visibility),
    /// The window regained focus.
    Focus,
    /// The view is going away; tear everything down.
    Unmount,
}

// ---------------------------------------------------------------------------
// View state
// ---------------------------------------------------------------------------

/// Connection lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Idle,
    Connecting,
    Open,
    Closed,
    ReconnectPending,
    /// No access token at mount; nothing further happens.
    Unavailable,
    /// Torn down.
    Stopped,
}

/// Human-readable connection status shown next to the count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenceStatus {
    Connected,
    Connecting,
    /// Not connected, with the most recent failure.
    Disconnected(String),
    /// Permanently unavailable for this mount.
    Unavailable(String),
    Stopped,
}

impl std::fmt::Display for PresenceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PresenceStatus::Connected => f.write_str("connected"),
            PresenceStatus::Connecting => f.write_str("Connecting..."),
            PresenceStatus::Disconnected(reason) | PresenceStatus::Unavailable(reason) => {
                f.write_str(reason)
            }
            PresenceStatus::Stopped => f.write_str("stopped"),
        }
    }
}

/// Everything the view can observe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceView {
    /// Last count reported by the server.
    pub online_count: u64,
    pub state: ConnectionState,
    pub status: PresenceStatus,
}

impl Default for PresenceView {
    fn default() -> Self {
        Self {
            online_count: 0,
            state: ConnectionState::Idle,
            status: PresenceStatus::Connecting,
        }
    }
}

impl PresenceView {
    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Open
    }
}
