use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::{RwLock, broadcast};
use tracing::trace;
use uuid::Uuid;

use kindred_types::events::SessionEvent;

/// Fans session events out to every connected client.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    /// All connected clients receive all events
    broadcast_tx: broadcast::Sender<SessionEvent>,

    /// Ids of live connections
    connections: RwLock<HashSet<Uuid>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        let (broadcast_tx, _) = broadcast::channel(256);
        Self {
            inner: Arc::new(DispatcherInner {
                broadcast_tx,
                connections: RwLock::new(HashSet::new()),
            }),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.broadcast_tx.subscribe()
    }

    /// Send to all connected clients. Having no listeners is not an error.
    pub fn broadcast(&self, event: SessionEvent) {
        trace!("Broadcasting event from {:?}", event.actor());
        let _ = self.inner.broadcast_tx.send(event);
    }

    /// Register a new connection and return its id.
    pub async fn connect(&self) -> Uuid {
        let conn_id = Uuid::new_v4();
        self.inner.connections.write().await.insert(conn_id);
        conn_id
    }

    pub async fn disconnect(&self, conn_id: Uuid) {
        self.inner.connections.write().await.remove(&conn_id);
    }

    pub async fn connection_count(&self) -> usize {
        self.inner.connections.read().await.len()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
