//! Cached Catalog Wrapper
//!
//! In-memory cache keyed by page+filter, plus an id-keyed character cache
//! fed by every fetched page so the detail view can resolve records the
//! list already holds without another round trip.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::client::{CatalogClient, CharacterPage, PageRequest};
use crate::domain::{Character, DomainResult};

/// Caching decorator over any catalog client
pub struct CachedCatalog<C> {
    inner: C,
    pages: RwLock<HashMap<PageRequest, CharacterPage>>,
    characters: RwLock<HashMap<String, Character>>,
}

impl<C: CatalogClient> CachedCatalog<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            pages: RwLock::new(HashMap::new()),
            characters: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl<C: CatalogClient> CatalogClient for CachedCatalog<C> {
    async fn fetch_page(&self, request: &PageRequest) -> DomainResult<CharacterPage> {
        if let Some(page) = self.pages.read().await.get(request) {
            log::debug!("page cache hit for page {}", request.page);
            return Ok(page.clone());
        }

        let page = self.inner.fetch_page(request).await?;

        {
            let mut characters = self.characters.write().await;
            for character in &page.results {
                characters.insert(character.id.clone(), character.clone());
            }
        }
        self.pages.write().await.insert(request.clone(), page.clone());

        Ok(page)
    }

    async fn fetch_character(&self, id: &str) -> DomainResult<Option<Character>> {
        if let Some(found) = self.characters.read().await.get(id) {
            log::debug!("character cache hit for {}", id);
            return Ok(Some(found.clone()));
        }

        let fetched = self.inner.fetch_character(id).await?;
        if let Some(character) = &fetched {
            self.characters
                .write()
                .await
                .insert(character.id.clone(), character.clone());
        }

        Ok(fetched)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::domain::ServerFilter;

    /// Counts round trips so tests can observe cache hits
    struct CountingClient {
        page_calls: AtomicUsize,
        character_calls: AtomicUsize,
    }

    impl CountingClient {
        fn new() -> Self {
            Self {
                page_calls: AtomicUsize::new(0),
                character_calls: AtomicUsize::new(0),
            }
        }
    }

    fn character(id: &str, name: &str) -> Character {
        Character {
            id: id.to_string(),
            name: name.to_string(),
            status: Default::default(),
            species: "Human".to_string(),
            type_: None,
            gender: Default::default(),
            origin: Default::default(),
            location: Default::default(),
            image: String::new(),
        }
    }

    #[async_trait]
    impl CatalogClient for CountingClient {
        async fn fetch_page(&self, _request: &PageRequest) -> DomainResult<CharacterPage> {
            self.page_calls.fetch_add(1, Ordering::SeqCst);
            Ok(CharacterPage {
                results: vec![character("1", "Rick Sanchez")],
                has_next: false,
            })
        }

        async fn fetch_character(&self, id: &str) -> DomainResult<Option<Character>> {
            self.character_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(character(id, "Fetched")))
        }
    }

    #[tokio::test]
    async fn test_repeat_page_request_is_served_from_cache() {
        let cached = CachedCatalog::new(CountingClient::new());
        let request = PageRequest {
            page: 1,
            filter: ServerFilter::default(),
        };

        let first = cached.fetch_page(&request).await.expect("fetch");
        let second = cached.fetch_page(&request).await.expect("fetch");

        assert_eq!(first, second);
        assert_eq!(cached.inner.page_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_different_filters_are_separate_cache_keys() {
        let cached = CachedCatalog::new(CountingClient::new());

        let plain = PageRequest {
            page: 1,
            filter: ServerFilter::default(),
        };
        let filtered = PageRequest {
            page: 1,
            filter: ServerFilter {
                species: Some("Human".to_string()),
                ..Default::default()
            },
        };

        cached.fetch_page(&plain).await.expect("fetch");
        cached.fetch_page(&filtered).await.expect("fetch");

        assert_eq!(cached.inner.page_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_detail_resolves_from_fetched_pages() {
        let cached = CachedCatalog::new(CountingClient::new());
        let request = PageRequest {
            page: 1,
            filter: ServerFilter::default(),
        };

        cached.fetch_page(&request).await.expect("fetch");
        let found = cached.fetch_character("1").await.expect("fetch").expect("some");

        assert_eq!(found.name, "Rick Sanchez");
        assert_eq!(cached.inner.character_calls.load(Ordering::SeqCst), 0);
    }
}
