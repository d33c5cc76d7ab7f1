//! Connection management.
//!
//! One SQLite connection behind a mutex. Every write operation runs inside
//! a `BEGIN IMMEDIATE` transaction, so each public engine operation is one
//! atomic unit: concurrent callers serialize on the write lock and the
//! loser of a state-machine race re-reads committed state and fails its
//! guard instead of double-applying.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, TransactionBehavior};
use tracing::debug;

use lancer_core::errors::{MarketError, MarketResult, StorageError};

use crate::migrations;

/// Owns the database connection and runs migrations on open.
pub struct ConnectionManager {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl ConnectionManager {
    /// Open a file-backed database, applying pragmas and migrations.
    pub fn open(path: &Path, busy_timeout_ms: u32) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(StorageError::sqlite)?;
        Self::configure(&conn, busy_timeout_ms)?;
        migrations::run_migrations(&conn)?;
        debug!(path = %path.display(), "opened market database");
        Ok(Self { conn: Mutex::new(conn), path: Some(path.to_path_buf()) })
    }

    /// Open an in-memory database (tests, ephemeral runs).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(StorageError::sqlite)?;
        Self::configure(&conn, 5_000)?;
        migrations::run_migrations(&conn)?;
        Ok(Self { conn: Mutex::new(conn), path: None })
    }

    fn configure(conn: &Connection, busy_timeout_ms: u32) -> Result<(), StorageError> {
        conn.execute_batch(&format!(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = {busy_timeout_ms};"
        ))
        .map_err(StorageError::sqlite)
    }

    /// Database file path (None for in-memory).
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        // A poisoned lock means a panicking reader; the connection itself
        // is still usable and any open transaction has rolled back.
        match self.conn.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Run a read-only closure against the connection.
    pub fn with_read<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        let conn = self.lock();
        f(&conn)
    }

    /// Run a closure inside a `BEGIN IMMEDIATE` transaction.
    ///
    /// Commits on `Ok`, rolls back on any error, including domain errors,
    /// so a failed guard never leaves partial writes behind.
    pub fn with_tx<F, T>(&self, f: F) -> MarketResult<T>
    where
        F: FnOnce(&Connection) -> MarketResult<T>,
    {
        let mut conn = self.lock();
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| MarketError::Storage(StorageError::sqlite(e)))?;
        let out = f(&tx)?;
        tx.commit()
            .map_err(|e| MarketError::Storage(StorageError::sqlite(e)))?;
        Ok(out)
    }
}
