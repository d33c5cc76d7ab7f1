//! v003: reviews.

use rusqlite::Connection;

use lancer_core::errors::StorageError;

pub fn migrate(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "CREATE TABLE reviews (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            reviewer_id  INTEGER NOT NULL REFERENCES users(id),
            reviewee_id  INTEGER NOT NULL REFERENCES users(id),
            project_id   INTEGER REFERENCES projects(id),
            rating       INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
            comment      TEXT,
            created_at   TEXT NOT NULL
        );
        CREATE INDEX idx_reviews_reviewee ON reviews(reviewee_id);",
    )
    .map_err(StorageError::sqlite)
}
