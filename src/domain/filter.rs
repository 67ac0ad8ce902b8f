//! Filter and Sort Value Types
//!
//! The server-side filter fields, the client-evaluated character-class
//! filter, and the list sort order.

use serde::{Deserialize, Serialize};

/// Server-side filter; unset fields place no constraint.
///
/// Changing any field invalidates previously accumulated pages, so the
/// list always refetches page 1 when one of these moves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ServerFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

impl ServerFilter {
    /// True when no field places a constraint
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.species.is_none() && self.gender.is_none()
    }

    /// Remove one field, leaving the rest untouched
    pub fn remove(&mut self, field: FilterField) {
        match field {
            FilterField::Status => self.status = None,
            FilterField::Species => self.species = None,
            FilterField::Gender => self.gender = None,
        }
    }
}

/// One server-side filter key (used for chip dismissal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterField {
    Status,
    Species,
    Gender,
}

/// Client-evaluated partition filter, independent of the server-side fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterClass {
    #[default]
    All,
    /// Only favorites
    Starred,
    /// Everything except favorites
    Others,
}

/// List sort order.
///
/// Comparison is byte-wise on `name` (case-sensitive) and stable for
/// equal names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}
