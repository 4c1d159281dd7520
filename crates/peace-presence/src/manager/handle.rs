//! Public handle to a mounted presence manager.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::warn;

use crate::token::TokenSource;
use crate::transport::Transport;

use super::controller::Controller;
use super::types::{HostSignal, PresenceConfig, PresenceStatus, PresenceView, Visibility};

const SIGNAL_BUFFER: usize = 16;

/// Live online-user count for one mounted view.
///
/// Mounting spawns a controller task that owns the connection and every
/// timer. The handle forwards host signals to it and exposes the latest
/// [`PresenceView`]. Dropping the handle tears the task down the same way
/// [`PresenceManager::unmount`] does, without waiting for it.
pub struct PresenceManager {
    signals: mpsc::Sender<HostSignal>,
    view: watch::Receiver<PresenceView>,
    task: Option<JoinHandle<()>>,
}

impl PresenceManager {
    /// Mount a manager. Must be called from within a tokio runtime.
    ///
    /// If `tokens` has no access token the manager reports
    /// [`PresenceStatus::Unavailable`] and never connects.
    pub fn mount(
        config: PresenceConfig,
        transport: Arc<dyn Transport>,
        tokens: Arc<dyn TokenSource>,
        visibility: Visibility,
    ) -> Self {
        let (signal_tx, signal_rx) = mpsc::channel(SIGNAL_BUFFER);
        let (view_tx, view_rx) = watch::channel(PresenceView::default());

        let controller = Controller::new(config, transport, tokens, visibility, view_tx);
        let task = tokio::spawn(controller.run(signal_rx));

        Self {
            signals: signal_tx,
            view: view_rx,
            task: Some(task),
        }
    }

    /// Current view.
    pub fn view(&self) -> PresenceView {
        self.view.borrow().clone()
    }

    pub fn online_count(&self) -> u64 {
        self.view.borrow().online_count
    }

    pub fn status(&self) -> PresenceStatus {
        self.view.borrow().status.clone()
    }

    pub fn is_connected(&self) -> bool {
        self.view.borrow().is_connected()
    }

    /// Receiver that is notified whenever the view changes.
    pub fn subscribe(&self) -> watch::Receiver<PresenceView> {
        self.view.clone()
    }

    pub async fn visibility_changed(&self, visibility: Visibility) {
        self.signal(HostSignal::VisibilityChanged(visibility)).await;
    }

    /// The hosting window regained focus.
    pub async fn focused(&self) {
        self.signal(HostSignal::Focus).await;
    }

    /// Tear down: cancel timers, close the connection, and wait for the task
    /// to finish. Idempotent with respect to the final view.
    pub async fn unmount(mut self) {
        self.signal(HostSignal::Unmount).await;
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "Presence task ended abnormally");
            }
        }
    }

    async fn signal(&self, signal: HostSignal) {
        if self.signals.send(signal).await.is_err() {
            warn!(?signal, "Presence task is gone; signal dropped");
        }
    }
}

impl std::fmt::Debug for PresenceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresenceManager")
            .field("view", &*self.view.borrow())
            .field("running", &self.task.is_some())
            .finish()
    }
}
