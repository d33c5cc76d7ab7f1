//! notifications table queries.

use rusqlite::{params, Connection, Row};

use lancer_core::errors::StorageError;
use lancer_core::types::notification::Notification;
use lancer_core::{NotificationId, UserId};

use super::{decode_timestamp, now_rfc3339};

const COLUMNS: &str = "id, user_id, title, body, kind, link, is_read, created_at";

fn decode(row: &Row<'_>) -> Result<Notification, StorageError> {
    let created_raw: String = row.get(7).map_err(StorageError::sqlite)?;
    Ok(Notification {
        id: NotificationId(row.get(0).map_err(StorageError::sqlite)?),
        user: UserId(row.get(1).map_err(StorageError::sqlite)?),
        title: row.get(2).map_err(StorageError::sqlite)?,
        body: row.get(3).map_err(StorageError::sqlite)?,
        kind: row.get(4).map_err(StorageError::sqlite)?,
        link: row.get(5).map_err(StorageError::sqlite)?,
        is_read: row.get(6).map_err(StorageError::sqlite)?,
        created_at: decode_timestamp("notifications", &created_raw)?,
    })
}

pub fn insert(
    conn: &Connection,
    user: UserId,
    title: &str,
    body: &str,
    kind: &str,
    link: Option<&str>,
) -> Result<NotificationId, StorageError> {
    conn.prepare_cached(
        "INSERT INTO notifications (user_id, title, body, kind, link, is_read, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)",
    )
    .and_then(|mut stmt| {
        stmt.execute(params![user.raw(), title, body, kind, link, now_rfc3339()])
    })
    .map_err(StorageError::sqlite)?;
    Ok(NotificationId(conn.last_insert_rowid()))
}

/// Notifications for a user, newest-first.
pub fn list_for_user(conn: &Connection, user: UserId) -> Result<Vec<Notification>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {COLUMNS} FROM notifications WHERE user_id = ?1 ORDER BY id DESC"
        ))
        .map_err(StorageError::sqlite)?;
    let mut rows = stmt.query(params![user.raw()]).map_err(StorageError::sqlite)?;
    let mut out = Vec::new();
    while let Some(row) = rows.next().map_err(StorageError::sqlite)? {
        out.push(decode(row)?);
    }
    Ok(out)
}

pub fn unread_count(conn: &Connection, user: UserId) -> Result<u64, StorageError> {
    conn.query_row(
        "SELECT COUNT(*) FROM notifications WHERE user_id = ?1 AND is_read = 0",
        params![user.raw()],
        |row| row.get::<_, i64>(0),
    )
    .map(|n| n as u64)
    .map_err(StorageError::sqlite)
}

pub fn mark_read(conn: &Connection, id: NotificationId) -> Result<(), StorageError> {
    conn.prepare_cached("UPDATE notifications SET is_read = 1 WHERE id = ?1")
        .and_then(|mut stmt| stmt.execute(params![id.raw()]))
        .map_err(StorageError::sqlite)?;
    Ok(())
}

pub fn mark_all_read(conn: &Connection, user: UserId) -> Result<usize, StorageError> {
    conn.prepare_cached("UPDATE notifications SET is_read = 1 WHERE user_id = ?1 AND is_read = 0")
        .and_then(|mut stmt| stmt.execute(params![user.raw()]))
        .map_err(StorageError::sqlite)
}
