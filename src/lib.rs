//! Character Catalog Core
//!
//! Browsing client core for a paginated character catalog served over
//! GraphQL. Layered architecture:
//! - domain: Core entities and business rules
//! - repository: Data access abstractions and implementations
//! - remote: Catalog client boundary, GraphQL transport, query cache
//! - list: List state machine and derived view
//! - annotations/sync: Durable favorites and comments, converging across
//!   concurrently open instances
//! - service: App-facing facade

pub mod annotations;
pub mod config;
pub mod detail;
pub mod domain;
pub mod list;
pub mod remote;
pub mod repository;
pub mod service;
pub mod sync;

use std::sync::Arc;

pub use annotations::AnnotationStore;
pub use config::{CatalogConfig, DEFAULT_ENDPOINT};
pub use detail::DetailProjection;
pub use domain::{
    Character, CharacterClass, Comment, DomainError, DomainResult, FilterField, Gender, Place,
    ServerFilter, SortOrder, Status,
};
pub use list::{FilterChip, ListSnapshot, ListState, LoadPhase};
pub use service::CatalogService;
pub use sync::{AnnotationEvent, SyncChannel};

use remote::{CachedCatalog, GraphQlCatalog};
use repository::{init_db, init_memory_db, AnnotationRepository};

/// Construct the full stack from a configuration: durable store, synced
/// annotation store, cached GraphQL catalog, and the service over them.
///
/// The sync listener task is spawned here, so a second `bootstrap` over
/// the same database and channel yields an instance that converges with
/// this one without polling.
pub async fn bootstrap(
    config: &CatalogConfig,
    channel: SyncChannel,
) -> DomainResult<CatalogService> {
    let db = match &config.db_path {
        Some(path) => init_db(path)?,
        None => init_memory_db()?,
    };

    let backend = Arc::new(AnnotationRepository::new(db));
    let annotations = AnnotationStore::open(backend, channel).await?;
    annotations.spawn_sync();

    let catalog = CachedCatalog::new(GraphQlCatalog::new(config.endpoint.clone()));
    log::info!("catalog core ready against {}", config.endpoint);

    Ok(CatalogService::new(Arc::new(catalog), annotations))
}
