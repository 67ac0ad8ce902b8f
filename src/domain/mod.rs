//! Domain Layer
//!
//! Contains all domain entities and core abstractions.
//! This layer does no I/O; everything above it depends on it.

mod character;
mod comment;
mod error;
mod filter;

pub use character::{Character, Gender, Place, Status};
pub use comment::Comment;
pub use error::{DomainError, DomainResult};
pub use filter::{CharacterClass, FilterField, ServerFilter, SortOrder};
