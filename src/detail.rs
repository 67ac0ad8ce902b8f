//! Detail View Model
//!
//! Read-only projection of a single character together with its
//! annotations. The projection carries no behavior; favorite toggles and
//! comment appends go through the service, which rebuilds the projection.

use serde::Serialize;

use crate::domain::{Character, Comment};

/// Everything the detail view renders for one character
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailProjection {
    pub character: Character,
    pub is_favorite: bool,
    /// Comment thread in append order
    pub comments: Vec<Comment>,
}
