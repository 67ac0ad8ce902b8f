//! Annotation Repository Implementation
//!
//! SQLite-backed persistence for favorites and comment threads, stored as
//! two independent serialized records in a key-value table. Each write
//! replaces the whole record in one statement, so readers never see a
//! partial set.

use std::collections::BTreeSet;

use async_trait::async_trait;
use rusqlite::OptionalExtension;
use serde::de::DeserializeOwned;

use super::db::DbHandle;
use super::traits::{AnnotationBackend, CommentMap};
use crate::domain::{DomainError, DomainResult};

/// Storage key for the favorites record
const KEY_FAVORITES: &str = "favorites";
/// Storage key for the comments record
const KEY_COMMENTS: &str = "comments";

/// SQLite implementation of annotation persistence
pub struct AnnotationRepository {
    conn: DbHandle,
}

impl AnnotationRepository {
    pub fn new(conn: DbHandle) -> Self {
        Self { conn }
    }

    async fn read_record(&self, key: &str) -> DomainResult<Option<String>> {
        let conn = self.conn.lock().await;

        conn.query_row(
            "SELECT value FROM annotations WHERE key = ?1",
            [key],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| DomainError::Internal(e.to_string()))
    }

    async fn write_record(&self, key: &str, value: &str) -> DomainResult<()> {
        let conn = self.conn.lock().await;

        conn.execute(
            "INSERT INTO annotations (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            rusqlite::params![key, value],
        )
        .map_err(|e| DomainError::Internal(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl AnnotationBackend for AnnotationRepository {
    async fn load_favorites(&self) -> DomainResult<BTreeSet<String>> {
        let raw = self.read_record(KEY_FAVORITES).await?;
        Ok(decode_or_default(KEY_FAVORITES, raw))
    }

    async fn save_favorites(&self, favorites: &BTreeSet<String>) -> DomainResult<()> {
        let data =
            serde_json::to_string(favorites).map_err(|e| DomainError::Internal(e.to_string()))?;
        self.write_record(KEY_FAVORITES, &data).await
    }

    async fn load_comments(&self) -> DomainResult<CommentMap> {
        let raw = self.read_record(KEY_COMMENTS).await?;
        Ok(decode_or_default(KEY_COMMENTS, raw))
    }

    async fn save_comments(&self, comments: &CommentMap) -> DomainResult<()> {
        let data =
            serde_json::to_string(comments).map_err(|e| DomainError::Internal(e.to_string()))?;
        self.write_record(KEY_COMMENTS, &data).await
    }
}

/// Decode a stored record, recovering to the empty default on malformed data
fn decode_or_default<T: DeserializeOwned + Default>(key: &str, raw: Option<String>) -> T {
    match raw {
        None => T::default(),
        Some(data) => match serde_json::from_str(&data) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("malformed {} record, recovering as empty: {}", key, e);
                T::default()
            }
        },
    }
}
