//! Remote Catalog Layer
//!
//! The paged query boundary the list consumes, its GraphQL
//! implementation, and the in-memory query cache.

mod cache;
mod client;
mod graphql;

pub use cache::CachedCatalog;
pub use client::{CatalogClient, CharacterPage, PageRequest};
pub use graphql::GraphQlCatalog;
