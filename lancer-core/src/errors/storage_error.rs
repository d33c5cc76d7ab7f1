//! Storage-layer errors for SQLite operations.

/// Errors that can occur in the storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("Migration failed at version {version}: {message}")]
    MigrationFailed { version: u32, message: String },

    #[error("Corrupt row in {table}: {message}")]
    CorruptRow { table: String, message: String },
}

impl StorageError {
    /// Wrap a raw rusqlite error message.
    pub fn sqlite(e: impl std::fmt::Display) -> Self {
        Self::SqliteError { message: e.to_string() }
    }

    /// A row that decoded into an invalid domain value.
    pub fn corrupt(table: &str, message: impl Into<String>) -> Self {
        Self::CorruptRow { table: table.to_string(), message: message.into() }
    }
}
