//! Fan-out of change notifications to connected listeners.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::model::{Alert, Bin, DemoSummary};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
/// Change published after a successful mutation.
pub enum Notification {
    /// A bin was registered.
    BinCreated(Bin),
    /// A bin's fill level or description changed.
    BinUpdated(Bin),
    /// An alert was acknowledged.
    AlertAcknowledged(Alert),
    /// The store was seeded with demo bins and alerts.
    DemoDataInitialized(DemoSummary),
}

/// Receiving half handed to a listener.
pub type NotificationReceiver = UnboundedReceiver<Notification>;

/// Best-effort broadcast to any number of listeners.
///
/// Listeners that dropped their receiver are pruned on the next publish.
#[derive(Debug, Default)]
pub struct NotificationHub {
    listeners: Mutex<Vec<UnboundedSender<Notification>>>,
}

impl NotificationHub {
    /// Create a hub with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new listener.
    pub fn subscribe(&self) -> NotificationReceiver {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.lock().push(sender);
        receiver
    }

    /// Deliver `notification` to every live listener and return how many received it.
    pub fn publish(&self, notification: &Notification) -> usize {
        let mut listeners = self.lock();
        let before = listeners.len();
        listeners.retain(|listener| listener.send(notification.clone()).is_ok());
        let pruned = before - listeners.len();
        if pruned > 0 {
            debug!(pruned, "dropped disconnected listeners");
        }
        listeners.len()
    }

    /// Number of registered listeners, including any not yet pruned.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<UnboundedSender<Notification>>> {
        // A panic while holding the lock leaves the list itself intact.
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
