use std::collections::HashMap;
use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

use crate::notifications::events::Notification;

/// One connected WebSocket client for a user. A user can hold several
/// connections (multiple tabs), so handles carry their own id.
#[derive(Debug)]
struct ClientHandle {
    connection_id: Uuid,
    sender: mpsc::UnboundedSender<Notification>,
}

/// Routes workflow notifications to connected clients, keyed by user id.
///
/// Dispatch is fire-and-forget: an offline recipient simply misses the
/// event, and the workflow result never depends on delivery.
pub struct NotificationHub {
    connections: RwLock<HashMap<Uuid, Vec<ClientHandle>>>,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register a connection for a user. Returns the connection id (for
    /// cleanup) and the receiver the WebSocket session forwards from.
    pub async fn subscribe(&self, user_id: Uuid) -> (Uuid, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let connection_id = Uuid::new_v4();

        let mut connections = self.connections.write().await;
        connections
            .entry(user_id)
            .or_default()
            .push(ClientHandle {
                connection_id,
                sender: tx,
            });

        (connection_id, rx)
    }

    /// Remove a single connection; drops the user entry when it was the last.
    pub async fn unsubscribe(&self, user_id: Uuid, connection_id: Uuid) {
        let mut connections = self.connections.write().await;
        if let Some(handles) = connections.get_mut(&user_id) {
            handles.retain(|h| h.connection_id != connection_id);
            if handles.is_empty() {
                connections.remove(&user_id);
            }
        }
    }

    /// Push a notification to every connection the recipient has open.
    pub async fn notify(&self, user_id: Uuid, notification: Notification) {
        let connections = self.connections.read().await;
        match connections.get(&user_id) {
            Some(handles) => {
                tracing::debug!(%user_id, kind = ?notification.kind, "dispatching notification");
                for handle in handles {
                    // A failed send means the receiver was dropped; the
                    // session cleanup will unsubscribe it.
                    let _ = handle.sender.send(notification.clone());
                }
            }
            None => {
                tracing::debug!(%user_id, "recipient not connected, dropping notification");
            }
        }
    }

}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::events::Notification as N;

    #[tokio::test]
    async fn notify_reaches_every_connection_of_the_recipient() {
        let hub = NotificationHub::new();
        let user = Uuid::new_v4();

        let (_c1, mut rx1) = hub.subscribe(user).await;
        let (_c2, mut rx2) = hub.subscribe(user).await;

        let n = N::application_rejected(user, Uuid::new_v4(), "P");
        hub.notify(user, n).await;

        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_ok());
    }

    #[tokio::test]
    async fn notify_to_offline_user_is_a_no_op() {
        let hub = NotificationHub::new();
        let user = Uuid::new_v4();
        let other = Uuid::new_v4();

        let (_cid, mut rx) = hub.subscribe(user).await;
        hub.notify(other, N::application_rejected(other, Uuid::new_v4(), "P"))
            .await;

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn unsubscribed_connection_receives_nothing_more() {
        let hub = NotificationHub::new();
        let user = Uuid::new_v4();

        let (cid, mut rx) = hub.subscribe(user).await;
        hub.notify(user, N::application_rejected(user, Uuid::new_v4(), "P"))
            .await;
        assert!(rx.try_recv().is_ok());

        hub.unsubscribe(user, cid).await;
        hub.notify(user, N::application_rejected(user, Uuid::new_v4(), "P"))
            .await;
        assert!(rx.try_recv().is_err());
    }
}
