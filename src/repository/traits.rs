//! Repository Layer - Core Traits
//!
//! Defines the abstract interface for annotation persistence.
//! Implementations can use SQLite, in-memory state, or any durable
//! key-value store that can hold two serialized records.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;

use crate::domain::{Comment, DomainResult};

/// Ordered comment threads keyed by character id
pub type CommentMap = HashMap<String, Vec<Comment>>;

/// Durable backend for the two annotation records.
///
/// Writes are whole-record replacements, atomic from the caller's
/// perspective: readers never observe a partially written value.
/// Malformed stored data loads as the empty default rather than erroring;
/// annotation loss is preferable to a crash.
#[async_trait]
pub trait AnnotationBackend: Send + Sync {
    /// Load the persisted favorites set
    async fn load_favorites(&self) -> DomainResult<BTreeSet<String>>;

    /// Replace the persisted favorites set
    async fn save_favorites(&self, favorites: &BTreeSet<String>) -> DomainResult<()>;

    /// Load all persisted comment threads
    async fn load_comments(&self) -> DomainResult<CommentMap>;

    /// Replace the persisted comment threads
    async fn save_comments(&self, comments: &CommentMap) -> DomainResult<()>;
}
