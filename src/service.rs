//! Catalog Service
//!
//! The app-facing facade. Owns the list state machine, drives fetches
//! against the remote catalog, reads the favorites set for derivations,
//! and builds the detail projection. Every operation returns the fresh
//! [`ListSnapshot`] so callers re-render from one value.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::annotations::AnnotationStore;
use crate::detail::DetailProjection;
use crate::domain::{CharacterClass, Comment, DomainResult, FilterField, ServerFilter, SortOrder};
use crate::list::{FetchSpec, ListSnapshot, ListState};
use crate::remote::{CatalogClient, PageRequest};

pub struct CatalogService {
    catalog: Arc<dyn CatalogClient>,
    annotations: AnnotationStore,
    state: Mutex<ListState>,
}

impl CatalogService {
    pub fn new(catalog: Arc<dyn CatalogClient>, annotations: AnnotationStore) -> Self {
        Self {
            catalog,
            annotations,
            state: Mutex::new(ListState::new()),
        }
    }

    /// The annotation store backing this service
    pub fn annotations(&self) -> &AnnotationStore {
        &self.annotations
    }

    /// Derive the current view without changing anything
    pub async fn snapshot(&self) -> ListSnapshot {
        let favorites = self.annotations.favorites().await;
        self.state.lock().await.snapshot(&favorites)
    }

    // ========================
    // Filtering and paging
    // ========================

    pub async fn apply_filter(
        &self,
        filter: ServerFilter,
        class: CharacterClass,
    ) -> ListSnapshot {
        let spec = self.state.lock().await.apply_filter(filter, class);
        self.run_fetch(spec).await
    }

    pub async fn clear_filters(&self) -> ListSnapshot {
        let spec = self.state.lock().await.clear_filters();
        self.run_fetch(spec).await
    }

    /// Dismiss one server-side filter chip
    pub async fn remove_filter_field(&self, field: FilterField) -> ListSnapshot {
        let spec = self.state.lock().await.remove_filter_field(field);
        self.run_fetch(spec).await
    }

    /// Dismiss the character-class chip
    pub async fn reset_class(&self) -> ListSnapshot {
        let spec = self.state.lock().await.reset_class();
        self.run_fetch(spec).await
    }

    /// Fetch the next page when the state machine allows it; otherwise
    /// the current view is returned unchanged
    pub async fn load_more(&self) -> ListSnapshot {
        let spec = self.state.lock().await.load_more();
        match spec {
            Some(spec) => self.run_fetch(spec).await,
            None => self.snapshot().await,
        }
    }

    /// Run one tagged fetch to completion and resolve it.
    ///
    /// The state lock is not held across the network call, so a second
    /// operation can supersede this one; resolution then drops it.
    async fn run_fetch(&self, spec: FetchSpec) -> ListSnapshot {
        let request = PageRequest {
            page: spec.page,
            filter: spec.filter.clone(),
        };
        let outcome = self.catalog.fetch_page(&request).await;

        let favorites = self.annotations.favorites().await;
        let mut state = self.state.lock().await;
        state.resolve_fetch(&spec, outcome);
        state.snapshot(&favorites)
    }

    // ========================
    // Local view operations
    // ========================

    pub async fn set_search(&self, text: &str) -> ListSnapshot {
        let favorites = self.annotations.favorites().await;
        let mut state = self.state.lock().await;
        state.set_search(text);
        state.snapshot(&favorites)
    }

    pub async fn set_sort(&self, order: SortOrder) -> ListSnapshot {
        let favorites = self.annotations.favorites().await;
        let mut state = self.state.lock().await;
        state.set_sort(order);
        state.snapshot(&favorites)
    }

    pub async fn toggle_sort(&self) -> ListSnapshot {
        let favorites = self.annotations.favorites().await;
        let mut state = self.state.lock().await;
        state.toggle_sort();
        state.snapshot(&favorites)
    }

    /// Hide `id` for the rest of the session
    pub async fn soft_delete(&self, id: &str) -> ListSnapshot {
        let favorites = self.annotations.favorites().await;
        let mut state = self.state.lock().await;
        state.soft_delete(id);
        state.snapshot(&favorites)
    }

    // ========================
    // Annotations
    // ========================

    /// Toggle a favorite and return the re-partitioned view
    pub async fn toggle_favorite(&self, id: &str) -> DomainResult<ListSnapshot> {
        self.annotations.toggle_favorite(id).await?;
        Ok(self.snapshot().await)
    }

    pub async fn add_comment(
        &self,
        character_id: &str,
        text: &str,
    ) -> DomainResult<Option<Comment>> {
        self.annotations.add_comment(character_id, text).await
    }

    pub async fn delete_comment(&self, character_id: &str, comment_id: &str) -> DomainResult<()> {
        self.annotations.delete_comment(character_id, comment_id).await
    }

    // ========================
    // Detail
    // ========================

    /// Resolve a character, mark it selected, and project it with its
    /// annotations. `None` when the catalog has no such id.
    pub async fn open_detail(&self, id: &str) -> DomainResult<Option<DetailProjection>> {
        let Some(character) = self.catalog.fetch_character(id).await? else {
            return Ok(None);
        };

        self.state.lock().await.select(Some(id));
        Ok(Some(DetailProjection {
            is_favorite: self.annotations.is_favorite(id).await,
            comments: self.annotations.comments(id).await,
            character,
        }))
    }

    pub async fn close_detail(&self) {
        self.state.lock().await.select(None);
    }
}
