//! # libris-db
//!
//! libSQL database operations for Libris circulation state.
//!
//! Handles all relational state: borrow requests, donation requests, and the
//! append-only audit trail. The `CirculationService` in [`service`] layers
//! the lifecycle engine, compare-and-swap persistence, audit, and the JSONL
//! ledger on top of the raw [`LibrisDb`] handle.

pub mod error;
pub mod helpers;
pub mod in_flight;
pub mod ledger;
mod migrations;
pub mod repos;
pub mod service;

mod test_support;

use error::StoreError;
use libsql::Builder;

/// Central database handle for all Libris state operations.
///
/// Wraps a libSQL database and connection, and provides ID generation.
/// Repository methods live on `CirculationService`.
pub struct LibrisDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl LibrisDb {
    /// Open a local database at the given path (`":memory:"` for tests).
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the database cannot be opened or migrations
    /// fail.
    pub async fn open_local(path: &str) -> Result<Self, StoreError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| StoreError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let libris_db = Self { db, conn };
        libris_db.run_migrations().await?;
        Ok(libris_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g. `"brw-a3f8b2c1"`.
    ///
    /// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the
    /// prefix.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, StoreError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(StoreError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}
