//! Derived List View
//!
//! The render-ready projection of the list state: soft-deletes dropped,
//! class filter applied, name search applied, sorted, and partitioned
//! into starred and others. A snapshot is a plain value; presentation
//! decides labels and layout.

use serde::Serialize;

use super::state::LoadPhase;
use crate::domain::{Character, CharacterClass, FilterField};

/// One active-filter chip, dismissable by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FilterChip {
    /// The character-class filter, when not `all`
    Class(CharacterClass),
    /// One applied server-side field
    Field { field: FilterField, value: String },
}

/// The derived view of the list.
///
/// `starred` and `others` partition the filtered/searched set exactly:
/// every surviving row appears in exactly one of them. Counts shown to
/// the user are the partition lengths themselves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListSnapshot {
    pub phase: LoadPhase,
    /// Favorite rows; hidden entirely under the `others` class filter
    pub starred: Vec<Character>,
    /// Everything not excluded above and not starred
    pub others: Vec<Character>,
    /// Whether the starred section is rendered at all
    pub show_starred: bool,
    /// Load More is offered only when another page exists, no search is
    /// active, and no fetch is outstanding
    pub can_load_more: bool,
    pub chips: Vec<FilterChip>,
}

impl ListSnapshot {
    /// Total rows surviving the derivation pipeline
    pub fn len(&self) -> usize {
        self.starred.len() + self.others.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starred.is_empty() && self.others.is_empty()
    }
}
