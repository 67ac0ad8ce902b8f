//! Character Entity
//!
//! A catalog record owned by the remote source. Never mutated locally;
//! its lifetime is the lifetime of the query cache entry it arrived in.

use serde::{Deserialize, Serialize};

/// Life status reported by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String")]
pub enum Status {
    Alive,
    Dead,
    /// Catalog reports the literal string "unknown"
    #[default]
    #[serde(rename = "unknown")]
    Unknown,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Alive => "Alive",
            Status::Dead => "Dead",
            Status::Unknown => "unknown",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "Alive" => Status::Alive,
            "Dead" => Status::Dead,
            _ => Status::Unknown,
        }
    }
}

impl From<String> for Status {
    fn from(s: String) -> Self {
        Status::from_str(&s)
    }
}

/// Gender reported by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String")]
pub enum Gender {
    Female,
    Male,
    Genderless,
    #[default]
    #[serde(rename = "unknown")]
    Unknown,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Female => "Female",
            Gender::Male => "Male",
            Gender::Genderless => "Genderless",
            Gender::Unknown => "unknown",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "Female" => Gender::Female,
            "Male" => Gender::Male,
            "Genderless" => Gender::Genderless,
            _ => Gender::Unknown,
        }
    }
}

impl From<String> for Gender {
    fn from(s: String) -> Self {
        Gender::from_str(&s)
    }
}

/// Origin or location reference embedded in a character record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Place {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A character record from the remote catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Opaque stable identifier assigned by the catalog
    pub id: String,
    /// Display name; the target of client-side search and sorting
    pub name: String,
    pub status: Status,
    /// Free-text species label
    pub species: String,
    /// Optional free-text subtype
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    pub gender: Gender,
    #[serde(default)]
    pub origin: Place,
    #[serde(default)]
    pub location: Place,
    /// Portrait image URL
    pub image: String,
}
