//! Cross-Instance Sync Channel
//!
//! Publish/subscribe channel carrying annotation changes between live
//! store instances that share one durable store. Stands in for the
//! storage-change notifications a browser delivers between tabs; any
//! transport able to deliver [`AnnotationEvent`]s (OS IPC, a socket) can
//! replace the in-process broadcast without touching the store.

use std::collections::BTreeSet;

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::domain::Comment;

/// Identifier for one live annotation store instance
pub type InstanceId = Uuid;

/// A change published by one annotation store instance.
///
/// Payloads are full snapshots (whole favorites set, whole thread), so
/// receivers apply them by replacement: last writer wins.
#[derive(Debug, Clone)]
pub enum AnnotationEvent {
    /// The favorites set after a toggle
    FavoritesChanged {
        origin: InstanceId,
        favorites: BTreeSet<String>,
    },
    /// The comment thread for one character after an append or delete
    CommentsChanged {
        origin: InstanceId,
        character_id: String,
        comments: Vec<Comment>,
    },
}

impl AnnotationEvent {
    /// The instance that published this event
    pub fn origin(&self) -> InstanceId {
        match self {
            AnnotationEvent::FavoritesChanged { origin, .. } => *origin,
            AnnotationEvent::CommentsChanged { origin, .. } => *origin,
        }
    }
}

/// Broadcast channel shared by every instance attached to one durable store
#[derive(Clone)]
pub struct SyncChannel {
    tx: broadcast::Sender<AnnotationEvent>,
}

impl SyncChannel {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self { tx }
    }

    /// Subscribe to changes published on this channel
    pub fn subscribe(&self) -> broadcast::Receiver<AnnotationEvent> {
        self.tx.subscribe()
    }

    /// Publish a change; delivery is best-effort.
    ///
    /// A send only fails when nobody is subscribed, which is not an error
    /// for a single-instance session.
    pub fn publish(&self, event: AnnotationEvent) {
        let _ = self.tx.send(event);
    }
}

impl Default for SyncChannel {
    fn default() -> Self {
        Self::new()
    }
}
