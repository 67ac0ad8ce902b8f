//! Configuration
//!
//! Catalog endpoint and annotation database location, loaded from a JSON
//! file when one exists and falling back to defaults otherwise.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult};

/// Public character catalog queried when no endpoint is configured
pub const DEFAULT_ENDPOINT: &str = "https://rickandmortyapi.com/graphql";

/// Runtime configuration for the catalog core
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// GraphQL endpoint of the character catalog
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Annotation database file; `None` keeps annotations in memory
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            db_path: None,
        }
    }
}

impl CatalogConfig {
    /// Load from a JSON file; a missing file yields the defaults
    pub fn load(path: &Path) -> DomainResult<Self> {
        if !path.exists() {
            log::info!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|e| DomainError::Internal(format!("read config: {}", e)))?;
        serde_json::from_str(&raw)
            .map_err(|e| DomainError::InvalidInput(format!("parse config: {}", e)))
    }

    /// Write the configuration as pretty-printed JSON
    pub fn save(&self, path: &Path) -> DomainResult<()> {
        let raw = serde_json::to_string_pretty(self)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        std::fs::write(path, raw)
            .map_err(|e| DomainError::Internal(format!("write config: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CatalogConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert!(config.db_path.is_none());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let loaded = CatalogConfig::load(&dir.path().join("absent.json")).expect("load");
        assert_eq!(loaded, CatalogConfig::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");

        let config = CatalogConfig {
            endpoint: "https://example.test/graphql".to_string(),
            db_path: Some(PathBuf::from("/tmp/annotations.db")),
        };
        config.save(&path).expect("save");

        assert_eq!(CatalogConfig::load(&path).expect("load"), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{}").expect("write");

        let loaded = CatalogConfig::load(&path).expect("load");
        assert_eq!(loaded.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_malformed_file_is_invalid_input() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").expect("write");

        let err = CatalogConfig::load(&path).expect_err("must fail");
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }
}
