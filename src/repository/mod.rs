//! Repository Layer
//!
//! Data access abstractions and implementations for annotation storage.

mod annotation_repo;
mod db;
mod traits;


pub use annotation_repo::AnnotationRepository;
pub use db::{init_db, init_memory_db, DbHandle};
pub use traits::{AnnotationBackend, CommentMap};
