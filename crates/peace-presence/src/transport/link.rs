//! Channel-backed handle to one live connection.

use tokio::sync::mpsc;

/// Instruction for the task that owns the socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkCommand {
    Send(String),
    Close,
}

/// Why a connection ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    /// The server closed the connection.
    Server,
    /// Transport error.
    Error(String),
}

impl std::fmt::Display for CloseReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CloseReason::Server => f.write_str("connection closed by server"),
            CloseReason::Error(e) => write!(f, "connection error: {e}"),
        }
    }
}

/// Something that happened on the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// A text frame.
    Message(String),
    /// The connection is gone. Always the last event.
    Closed(CloseReason),
}

/// The controller's end of a connection.
#[derive(Debug)]
pub struct Link {
    commands: mpsc::UnboundedSender<LinkCommand>,
    events: mpsc::Receiver<LinkEvent>,
}

/// The transport's end of a connection.
#[derive(Debug)]
pub struct LinkPeer {
    /// Frames to write and close requests, in order.
    pub commands: mpsc::UnboundedReceiver<LinkCommand>,
    /// Frames read and the final close.
    pub events: mpsc::Sender<LinkEvent>,
}

impl Link {
    /// Create a connected `(Link, LinkPeer)` pair. `buffer` bounds the number
    /// of undelivered inbound events.
    pub fn channel(buffer: usize) -> (Link, LinkPeer) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel(buffer.max(1));
        (
            Link {
                commands: command_tx,
                events: event_rx,
            },
            LinkPeer {
                commands: command_rx,
                events: event_tx,
            },
        )
    }

    /// Queue a text frame. Returns `false` if the transport side is gone.
    pub fn send(&self, text: String) -> bool {
        self.commands.send(LinkCommand::Send(text)).is_ok()
    }

    /// Ask the transport to close the connection and give up the handle.
    pub fn close(self) {
        let _ = self.commands.send(LinkCommand::Close);
    }

    /// Wait for the next event. A vanished transport reads as a close.
    pub async fn next_event(&mut self) -> LinkEvent {
        self.events
            .recv()
            .await
            .unwrap_or_else(|| LinkEvent::Closed(CloseReason::Error("transport dropped".into())))
    }
}
