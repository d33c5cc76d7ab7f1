//! reviews table queries.

use rusqlite::{params, Connection, Row};

use lancer_core::errors::StorageError;
use lancer_core::types::review::Review;
use lancer_core::{ProjectId, ReviewId, UserId};

use super::{decode_timestamp, now_rfc3339};

const COLUMNS: &str = "id, reviewer_id, reviewee_id, project_id, rating, comment, created_at";

fn decode(row: &Row<'_>) -> Result<Review, StorageError> {
    let created_raw: String = row.get(6).map_err(StorageError::sqlite)?;
    Ok(Review {
        id: ReviewId(row.get(0).map_err(StorageError::sqlite)?),
        reviewer: UserId(row.get(1).map_err(StorageError::sqlite)?),
        reviewee: UserId(row.get(2).map_err(StorageError::sqlite)?),
        project: row
            .get::<_, Option<i64>>(3)
            .map_err(StorageError::sqlite)?
            .map(ProjectId),
        rating: row.get(4).map_err(StorageError::sqlite)?,
        comment: row.get(5).map_err(StorageError::sqlite)?,
        created_at: decode_timestamp("reviews", &created_raw)?,
    })
}

pub fn insert(
    conn: &Connection,
    reviewer: UserId,
    reviewee: UserId,
    project: Option<ProjectId>,
    rating: u8,
    comment: Option<&str>,
) -> Result<ReviewId, StorageError> {
    conn.prepare_cached(
        "INSERT INTO reviews (reviewer_id, reviewee_id, project_id, rating, comment, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .and_then(|mut stmt| {
        stmt.execute(params![
            reviewer.raw(),
            reviewee.raw(),
            project.map(|p| p.raw()),
            rating,
            comment,
            now_rfc3339(),
        ])
    })
    .map_err(StorageError::sqlite)?;
    Ok(ReviewId(conn.last_insert_rowid()))
}

/// Reviews received by a user, newest-first.
pub fn list_for_reviewee(conn: &Connection, reviewee: UserId) -> Result<Vec<Review>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {COLUMNS} FROM reviews WHERE reviewee_id = ?1 ORDER BY id DESC"
        ))
        .map_err(StorageError::sqlite)?;
    let mut rows = stmt.query(params![reviewee.raw()]).map_err(StorageError::sqlite)?;
    let mut out = Vec::new();
    while let Some(row) = rows.next().map_err(StorageError::sqlite)? {
        out.push(decode(row)?);
    }
    Ok(out)
}

/// Mean rating, `None` when the user has no reviews.
pub fn average_rating(conn: &Connection, reviewee: UserId) -> Result<Option<f64>, StorageError> {
    conn.query_row(
        "SELECT AVG(rating) FROM reviews WHERE reviewee_id = ?1",
        params![reviewee.raw()],
        |row| row.get(0),
    )
    .map_err(StorageError::sqlite)
}
