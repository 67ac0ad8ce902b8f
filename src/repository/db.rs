//! Database Connection and Setup
//!
//! Manages the SQLite connection and migrations for annotation storage.
//! Every live instance of the app attaches to the same database file; the
//! connection is the durable store all open views share.

use std::path::Path;
use std::sync::Arc;

use rusqlite::Connection;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult};

/// Shared handle to the annotation database
pub type DbHandle = Arc<Mutex<Connection>>;

/// Open (or create) the database at `path` and run migrations
pub fn init_db(path: &Path) -> DomainResult<DbHandle> {
    let conn = Connection::open(path).map_err(|e| DomainError::Internal(e.to_string()))?;
    run_migrations(&conn)?;
    log::info!("annotation db ready at {}", path.display());
    Ok(Arc::new(Mutex::new(conn)))
}

/// In-memory database for tests and ephemeral sessions
pub fn init_memory_db() -> DomainResult<DbHandle> {
    let conn = Connection::open_in_memory().map_err(|e| DomainError::Internal(e.to_string()))?;
    run_migrations(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

/// Run database migrations (idempotent)
fn run_migrations(conn: &Connection) -> DomainResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS annotations (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )
    .map_err(|e| DomainError::Internal(e.to_string()))?;

    Ok(())
}
