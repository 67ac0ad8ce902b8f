//! Annotation Store
//!
//! Favorites and comment threads: cached in memory, written through to the
//! durable backend, and broadcast to every other live instance on the same
//! sync channel. Received events are compared before apply, so an instance
//! never re-broadcasts or re-persists state it already holds and updates
//! cannot loop between instances.

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use crate::domain::{Comment, DomainResult};
use crate::repository::{AnnotationBackend, CommentMap};
use crate::sync::{AnnotationEvent, InstanceId, SyncChannel};

/// One live view over the shared annotation state.
///
/// Cheap to clone; clones share the caches and the backend.
#[derive(Clone)]
pub struct AnnotationStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    instance: InstanceId,
    backend: Arc<dyn AnnotationBackend>,
    channel: SyncChannel,
    favorites: RwLock<BTreeSet<String>>,
    comments: RwLock<CommentMap>,
}

impl AnnotationStore {
    /// Open a store over a backend, loading the persisted annotation state
    pub async fn open(
        backend: Arc<dyn AnnotationBackend>,
        channel: SyncChannel,
    ) -> DomainResult<Self> {
        let favorites = backend.load_favorites().await?;
        let comments = backend.load_comments().await?;
        log::debug!(
            "annotation store opened: {} favorites, {} threads",
            favorites.len(),
            comments.len()
        );

        Ok(Self {
            inner: Arc::new(StoreInner {
                instance: Uuid::new_v4(),
                backend,
                channel,
                favorites: RwLock::new(favorites),
                comments: RwLock::new(comments),
            }),
        })
    }

    /// This instance's id; events it publishes carry it as origin
    pub fn instance_id(&self) -> InstanceId {
        self.inner.instance
    }

    // ========================
    // Favorites
    // ========================

    /// Snapshot of the favorites set
    pub async fn favorites(&self) -> BTreeSet<String> {
        self.inner.favorites.read().await.clone()
    }

    pub async fn is_favorite(&self, id: &str) -> bool {
        self.inner.favorites.read().await.contains(id)
    }

    /// Flip membership of `id`, persist the whole set, and notify other
    /// live instances. Returns the new membership state.
    pub async fn toggle_favorite(&self, id: &str) -> DomainResult<bool> {
        let snapshot = {
            let mut favorites = self.inner.favorites.write().await;
            if !favorites.remove(id) {
                favorites.insert(id.to_string());
            }
            favorites.clone()
        };
        let now_favorite = snapshot.contains(id);

        self.inner.backend.save_favorites(&snapshot).await?;
        log::debug!("favorite {} -> {}", id, now_favorite);
        self.inner.channel.publish(AnnotationEvent::FavoritesChanged {
            origin: self.inner.instance,
            favorites: snapshot,
        });

        Ok(now_favorite)
    }

    // ========================
    // Comments
    // ========================

    /// Ordered comment thread for a character (empty when none)
    pub async fn comments(&self, character_id: &str) -> Vec<Comment> {
        self.inner
            .comments
            .read()
            .await
            .get(character_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Append a comment to a character's thread.
    ///
    /// Blank text (empty after trimming) is a silent no-op returning
    /// `None`. The appended comment is visible to `comments()` on this
    /// instance as soon as this returns.
    pub async fn add_comment(
        &self,
        character_id: &str,
        text: &str,
    ) -> DomainResult<Option<Comment>> {
        let Some(comment) = Comment::new(text) else {
            log::debug!("ignoring blank comment for {}", character_id);
            return Ok(None);
        };

        let (snapshot, thread) = {
            let mut comments = self.inner.comments.write().await;
            let thread = comments.entry(character_id.to_string()).or_default();
            thread.push(comment.clone());
            let thread = thread.clone();
            (comments.clone(), thread)
        };

        self.inner.backend.save_comments(&snapshot).await?;
        self.inner.channel.publish(AnnotationEvent::CommentsChanged {
            origin: self.inner.instance,
            character_id: character_id.to_string(),
            comments: thread,
        });

        Ok(Some(comment))
    }

    /// Remove a comment by id; an absent id is not an error
    pub async fn delete_comment(&self, character_id: &str, comment_id: &str) -> DomainResult<()> {
        let mut comments = self.inner.comments.write().await;
        let Some(thread) = comments.get_mut(character_id) else {
            return Ok(());
        };

        let before = thread.len();
        thread.retain(|c| c.id != comment_id);
        if thread.len() == before {
            return Ok(());
        }

        let thread = thread.clone();
        let snapshot = comments.clone();
        drop(comments);

        self.inner.backend.save_comments(&snapshot).await?;
        self.inner.channel.publish(AnnotationEvent::CommentsChanged {
            origin: self.inner.instance,
            character_id: character_id.to_string(),
            comments: thread,
        });

        Ok(())
    }

    // ========================
    // Cross-instance sync
    // ========================

    /// Apply a change received from another instance.
    ///
    /// Events published by this instance, and events equal to current
    /// state, are ignored; everything else is adopted by replacement
    /// (the writer already persisted it).
    pub async fn apply_event(&self, event: AnnotationEvent) {
        if event.origin() == self.inner.instance {
            return;
        }

        match event {
            AnnotationEvent::FavoritesChanged { favorites, .. } => {
                let mut current = self.inner.favorites.write().await;
                if *current == favorites {
                    return;
                }
                log::debug!("adopting peer favorites ({} entries)", favorites.len());
                *current = favorites;
            }
            AnnotationEvent::CommentsChanged {
                character_id,
                comments,
                ..
            } => {
                let mut map = self.inner.comments.write().await;
                if map.get(&character_id).map(Vec::as_slice).unwrap_or(&[]) == comments.as_slice()
                {
                    return;
                }
                log::debug!("adopting peer thread for {}", character_id);
                map.insert(character_id, comments);
            }
        }
    }

    /// Spawn the background task feeding channel events into this store,
    /// so concurrently open instances converge without polling.
    pub fn spawn_sync(&self) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        let mut rx = self.inner.channel.subscribe();

        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => store.apply_event(event).await,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        log::warn!("sync listener lagged, skipped {} events", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}
