//! Notification bus
//!
//! Committed notifications fan out to every subscriber over a tokio
//! broadcast channel. Delivery is fire-and-forget: a send with no
//! subscribers is logged and never fails the operation that produced it.

use shared::message::ChainNotification;
use tokio::sync::broadcast;

/// Default per-subscriber buffer
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

#[derive(Debug, Clone)]
pub struct NotificationBus {
    tx: broadcast::Sender<ChainNotification>,
}

impl NotificationBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChainNotification> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Broadcast notifications of one committed transaction, in order
    pub fn publish(&self, notifications: Vec<ChainNotification>) {
        for notification in notifications {
            let topic = notification.topic.clone();
            match self.tx.send(notification) {
                Ok(receivers) => {
                    tracing::debug!(topic = %topic, receivers, "Notification broadcast");
                }
                Err(_) => {
                    tracing::debug!(topic = %topic, "Notification dropped: no active receivers");
                }
            }
        }
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}
