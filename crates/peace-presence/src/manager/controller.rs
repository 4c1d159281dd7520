//! The presence state machine and the task loop that drives it.
//!
//! One controller per mounted view. All inputs (connection events, timer
//! ticks, host signals) are funnelled through [`Controller::handle`], which is
//! synchronous, so every transition happens in a single place.

use std::future::pending;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use crate::protocol::{parse_inbound, Inbound, Outbound};
use crate::token::TokenSource;
use crate::transport::{ConnectRequest, Link, LinkEvent, Transport, TransportError};

use super::timers::{fire, tick, TimerSet};
use super::types::{
    ConnectionState, HostSignal, PresenceConfig, PresenceStatus, PresenceView, Visibility,
};

pub(crate) const MISSING_TOKEN: &str = "Missing access token";

type ConnectFuture = BoxFuture<'static, Result<Link, TransportError>>;

/// One thing that happened.
#[derive(Debug)]
pub(crate) enum Input {
    Signal(HostSignal),
    Connected(Result<Link, TransportError>),
    Link(LinkEvent),
    Heartbeat,
    CountPoll,
    TokenWatch,
    ReconnectDue,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Stop,
}

pub(crate) struct Controller {
    config: PresenceConfig,
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenSource>,
    view: watch::Sender<PresenceView>,
    pub(crate) state: ConnectionState,
    visibility: Visibility,
    link: Option<Link>,
    /// In-flight connection attempt. At most one.
    connecting: Option<ConnectFuture>,
    pub(crate) timers: TimerSet,
    pub(crate) attempt: u32,
    /// Most recent token seen in the token source; the next attempt uses it.
    pub(crate) last_token: Option<String>,
    /// Token the in-flight attempt or open link authenticated with.
    pub(crate) link_token: Option<String>,
    last_error: Option<String>,
    online_count: u64,
}

impl Controller {
    pub(crate) fn new(
        config: PresenceConfig,
        transport: Arc<dyn Transport>,
        tokens: Arc<dyn TokenSource>,
        visibility: Visibility,
        view: watch::Sender<PresenceView>,
    ) -> Self {
        Self {
            config,
            transport,
            tokens,
            view,
            state: ConnectionState::Idle,
            visibility,
            link: None,
            connecting: None,
            timers: TimerSet::default(),
            attempt: 0,
            last_token: None,
            link_token: None,
            last_error: None,
            online_count: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Task loop
    // -----------------------------------------------------------------------

    /// Mount, then process inputs until unmounted. A closed signal channel
    /// counts as an unmount.
    pub(crate) async fn run(mut self, mut signals: mpsc::Receiver<HostSignal>) {
        self.mount();

        loop {
            let input = tokio::select! {
                signal = signals.recv() => Input::Signal(signal.unwrap_or(HostSignal::Unmount)),
                result = connect_result(&mut self.connecting) => Input::Connected(result),
                event = link_event(&mut self.link) => Input::Link(event),
                _ = tick(&mut self.timers.heartbeat) => Input::Heartbeat,
                _ = tick(&mut self.timers.count_poll) => Input::CountPoll,
                _ = tick(&mut self.timers.token_watch) => Input::TokenWatch,
                _ = fire(&mut self.timers.reconnect) => Input::ReconnectDue,
            };

            if self.handle(input) == Flow::Stop {
                break;
            }
        }
    }

    pub(crate) fn handle(&mut self, input: Input) -> Flow {
        match input {
            Input::Signal(HostSignal::Unmount) => {
                self.unmount();
                return Flow::Stop;
            }
            Input::Signal(HostSignal::VisibilityChanged(visibility)) => {
                self.on_visibility(visibility)
            }
            Input::Signal(HostSignal::Focus) => self.on_focus(),
            Input::Connected(result) => {
                self.connecting = None;
                self.on_connect_result(result);
            }
            Input::Link(event) => self.on_link_event(event),
            Input::Heartbeat => self.send(Outbound::Ping),
            Input::CountPoll => self.send(Outbound::GetAmountOnlineUsers),
            Input::TokenWatch => self.on_token_watch(),
            Input::ReconnectDue => self.on_reconnect_due(),
        }
        Flow::Continue
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    pub(crate) fn mount(&mut self) {
        let Some(token) = self.tokens.token(&self.config.token_key) else {
            warn!(key = %self.config.token_key, "No access token; presence unavailable");
            self.state = ConnectionState::Unavailable;
            self.last_error = Some(MISSING_TOKEN.to_string());
            self.publish();
            return;
        };

        self.last_token = Some(token.clone());
        self.timers.arm_token_watch(self.config.token_watch);
        self.connect(token);
    }

    fn connect(&mut self, token: String) {
        if self.state == ConnectionState::Open
            || self.connecting.is_some()
            || self.timers.reconnect_pending()
        {
            debug!(state = ?self.state, "Connection already active or pending; not connecting");
            return;
        }

        self.link_token = Some(token.clone());
        let request = ConnectRequest {
            url: self.config.url.clone(),
            scheme: self.config.auth_scheme.clone(),
            token,
        };
        let transport = Arc::clone(&self.transport);
        let timeout = self.config.connect_timeout;

        self.connecting = Some(Box::pin(async move {
            match tokio::time::timeout(timeout, transport.connect(request)).await {
                Ok(result) => result,
                Err(_elapsed) => Err(TransportError::Timeout(timeout)),
            }
        }));
        self.state = ConnectionState::Connecting;
        self.publish();
    }

    fn on_connect_result(&mut self, result: Result<Link, TransportError>) {
        match result {
            Ok(link) => self.on_open(link),
            Err(e) if e.is_retryable() => {
                warn!(error = %e, "Presence connection failed");
                self.on_closed(e.to_string());
            }
            Err(e) => {
                error!(error = %e, "Failed to open presence connection");
                self.state = ConnectionState::Closed;
                self.last_error = Some(format!("Failed to open connection: {e}"));
                self.publish();
            }
        }
    }

    fn on_open(&mut self, link: Link) {
        if self.state == ConnectionState::Open {
            warn!("Second open while already open; closing the extra connection");
            link.close();
            return;
        }

        info!(attempt = self.attempt, "Presence connection open");
        self.link = Some(link);
        self.state = ConnectionState::Open;
        self.attempt = 0;
        self.last_error = None;

        self.send(Outbound::GetAmountOnlineUsers);
        self.timers.arm_activity(&self.config, self.visibility);
        self.publish();
    }

    fn on_link_event(&mut self, event: LinkEvent) {
        match event {
            LinkEvent::Message(text) => self.on_message(&text),
            LinkEvent::Closed(reason) => {
                info!(reason = %reason, "Presence connection closed");
                self.on_closed(reason.to_string());
            }
        }
    }

    /// Connection (or attempt) ended: stop activity timers and schedule a
    /// reconnect.
    fn on_closed(&mut self, reason: String) {
        self.link = None;
        self.timers.cancel_activity();
        self.state = ConnectionState::Closed;
        self.last_error = Some(reason);
        self.schedule_reconnect();
        self.publish();
    }

    fn schedule_reconnect(&mut self) {
        if self.timers.reconnect_pending() {
            debug!("Reconnect already pending");
            self.state = ConnectionState::ReconnectPending;
            return;
        }

        let delay = self.config.backoff.delay(self.attempt);
        info!(
            attempt = self.attempt,
            delay_ms = delay.as_millis() as u64,
            "Reconnecting in {:?}",
            delay
        );
        self.timers.arm_reconnect(delay);
        self.state = ConnectionState::ReconnectPending;
    }

    fn on_reconnect_due(&mut self) {
        self.timers.reconnect = None;
        self.attempt = self.config.backoff.next_attempt(self.attempt);

        match self.last_token.clone() {
            Some(token) => self.connect(token),
            None => {
                self.state = ConnectionState::Unavailable;
                self.last_error = Some(MISSING_TOKEN.to_string());
                self.publish();
            }
        }
    }

    fn unmount(&mut self) {
        self.timers.cancel_all();
        self.connecting = None;
        if let Some(link) = self.link.take() {
            link.close();
        }
        self.state = ConnectionState::Stopped;
        info!("Presence manager unmounted");
        self.publish();
    }

    // -----------------------------------------------------------------------
    // Timers and host signals
    // -----------------------------------------------------------------------

    fn on_token_watch(&mut self) {
        let Some(current) = self.tokens.token(&self.config.token_key) else {
            return;
        };
        if self.last_token.as_deref() != Some(current.as_str()) {
            info!("Access token rotated");
            self.last_token = Some(current.clone());
        }

        // A rotation seen while connecting retires the link once it opens.
        let stale = self
            .link_token
            .as_deref()
            .is_some_and(|used| used != current);
        if self.state == ConnectionState::Open && stale {
            if let Some(link) = self.link.take() {
                link.close();
            }
            self.on_closed("access token rotated".to_string());
        }
    }

    fn on_visibility(&mut self, visibility: Visibility) {
        if self.visibility == visibility {
            return;
        }
        self.visibility = visibility;
        debug!(hidden = visibility.is_hidden(), "Visibility changed");

        if self.state != ConnectionState::Open {
            return;
        }
        if visibility == Visibility::Visible {
            self.send(Outbound::Ping);
            self.send(Outbound::GetAmountOnlineUsers);
        }
        self.timers.arm_activity(&self.config, visibility);
    }

    fn on_focus(&mut self) {
        if self.state == ConnectionState::Open {
            self.send(Outbound::GetAmountOnlineUsers);
        }
    }

    // -----------------------------------------------------------------------
    // Messages
    // -----------------------------------------------------------------------

    fn on_message(&mut self, text: &str) {
        match parse_inbound(text) {
            Some(Inbound::AmountOnlineUsers { count }) => {
                self.online_count = count;
                self.publish();
            }
            Some(other) => debug!(message = ?other, "Presence message ignored"),
            None => debug!(len = text.len(), "Unrecognized presence message dropped"),
        }
    }

    /// Send while open; otherwise drop silently.
    fn send(&self, message: Outbound) {
        let Some(link) = self
            .link
            .as_ref()
            .filter(|_| self.state == ConnectionState::Open)
        else {
            debug!(?message, "Not connected; message dropped");
            return;
        };

        match message.to_json() {
            Ok(json) => {
                if !link.send(json) {
                    debug!(?message, "Transport gone; message dropped");
                }
            }
            Err(e) => warn!(error = %e, "Failed to encode presence message"),
        }
    }

    // -----------------------------------------------------------------------
    // View
    // -----------------------------------------------------------------------

    pub(crate) fn snapshot(&self) -> PresenceView {
        PresenceView {
            online_count: self.online_count,
            state: self.state,
            status: self.status(),
        }
    }

    fn status(&self) -> PresenceStatus {
        match self.state {
            ConnectionState::Open => PresenceStatus::Connected,
            ConnectionState::Stopped => PresenceStatus::Stopped,
            ConnectionState::Unavailable => PresenceStatus::Unavailable(
                self.last_error
                    .clone()
                    .unwrap_or_else(|| MISSING_TOKEN.to_string()),
            ),
            _ => match &self.last_error {
                Some(reason) => PresenceStatus::Disconnected(reason.clone()),
                None => PresenceStatus::Connecting,
            },
        }
    }

    fn publish(&self) {
        let view = self.snapshot();
        self.view.send_if_modified(|current| {
            if *current == view {
                false
            } else {
                *current = view;
                true
            }
        });
    }
}

// ---------------------------------------------------------------------------
// Select helpers
// ---------------------------------------------------------------------------

async fn connect_result(slot: &mut Option<ConnectFuture>) -> Result<Link, TransportError> {
    match slot {
        Some(attempt) => attempt.await,
        None => pending().await,
    }
}

async fn link_event(slot: &mut Option<Link>) -> LinkEvent {
    match slot {
        Some(link) => link.next_event().await,
        None => pending().await,
    }
}
