//! Remote Catalog Boundary
//!
//! The interface the list state machine fetches through. The remote
//! source is treated as unreliable: it may error or be slow, and every
//! failure surfaces as `DomainError::Remote` for the caller to render.

use async_trait::async_trait;

use crate::domain::{Character, DomainResult, ServerFilter};

/// One page request against the remote catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageRequest {
    /// 1-based page number
    pub page: u32,
    pub filter: ServerFilter,
}

/// One page of results plus whether another page exists
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterPage {
    pub results: Vec<Character>,
    pub has_next: bool,
}

/// Paged query service over the remote character catalog
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch one page of characters under a server-side filter
    async fn fetch_page(&self, request: &PageRequest) -> DomainResult<CharacterPage>;

    /// Fetch a single character by id; `None` when the catalog has no match
    async fn fetch_character(&self, id: &str) -> DomainResult<Option<Character>>;
}
