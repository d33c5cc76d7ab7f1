//! milestones table queries.

use rusqlite::{params, Connection, Row};

use lancer_core::errors::StorageError;
use lancer_core::types::milestone::{Milestone, MilestoneStatus};
use lancer_core::types::money::Money;
use lancer_core::{MilestoneId, ProjectId};

use super::{decode_money, decode_timestamp, now_rfc3339};

const COLUMNS: &str =
    "id, project_id, title, amount_cents, order_index, status, client_feedback, created_at";

fn decode(row: &Row<'_>) -> Result<Milestone, StorageError> {
    let status_raw: String = row.get(5).map_err(StorageError::sqlite)?;
    let status = MilestoneStatus::parse(&status_raw).ok_or_else(|| {
        StorageError::corrupt("milestones", format!("unknown status {status_raw:?}"))
    })?;
    let created_raw: String = row.get(7).map_err(StorageError::sqlite)?;
    Ok(Milestone {
        id: MilestoneId(row.get(0).map_err(StorageError::sqlite)?),
        project: ProjectId(row.get(1).map_err(StorageError::sqlite)?),
        title: row.get(2).map_err(StorageError::sqlite)?,
        amount: decode_money("milestones", row.get(3).map_err(StorageError::sqlite)?)?,
        order_index: row.get(4).map_err(StorageError::sqlite)?,
        status,
        client_feedback: row.get(6).map_err(StorageError::sqlite)?,
        created_at: decode_timestamp("milestones", &created_raw)?,
    })
}

/// Insert a milestone with the given 1-based order index, status PENDING.
pub fn insert(
    conn: &Connection,
    project: ProjectId,
    title: &str,
    amount: Money,
    order_index: u32,
) -> Result<MilestoneId, StorageError> {
    conn.prepare_cached(
        "INSERT INTO milestones (project_id, title, amount_cents, order_index, status, created_at)
         VALUES (?1, ?2, ?3, ?4, 'PENDING', ?5)",
    )
    .and_then(|mut stmt| {
        stmt.execute(params![
            project.raw(),
            title,
            amount.cents(),
            order_index,
            now_rfc3339(),
        ])
    })
    .map_err(StorageError::sqlite)?;
    Ok(MilestoneId(conn.last_insert_rowid()))
}

pub fn get(conn: &Connection, id: MilestoneId) -> Result<Option<Milestone>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!("SELECT {COLUMNS} FROM milestones WHERE id = ?1"))
        .map_err(StorageError::sqlite)?;
    let mut rows = stmt.query(params![id.raw()]).map_err(StorageError::sqlite)?;
    match rows.next().map_err(StorageError::sqlite)? {
        Some(row) => Ok(Some(decode(row)?)),
        None => Ok(None),
    }
}

pub fn count_for_project(conn: &Connection, project: ProjectId) -> Result<u32, StorageError> {
    conn.query_row(
        "SELECT COUNT(*) FROM milestones WHERE project_id = ?1",
        params![project.raw()],
        |row| row.get::<_, i64>(0),
    )
    .map(|n| n as u32)
    .map_err(StorageError::sqlite)
}

/// Milestones not yet approved; zero means the project can complete.
pub fn count_unapproved(conn: &Connection, project: ProjectId) -> Result<u32, StorageError> {
    conn.query_row(
        "SELECT COUNT(*) FROM milestones WHERE project_id = ?1 AND status != 'APPROVED'",
        params![project.raw()],
        |row| row.get::<_, i64>(0),
    )
    .map(|n| n as u32)
    .map_err(StorageError::sqlite)
}

pub fn set_status(
    conn: &Connection,
    id: MilestoneId,
    status: MilestoneStatus,
) -> Result<(), StorageError> {
    conn.prepare_cached("UPDATE milestones SET status = ?1 WHERE id = ?2")
        .and_then(|mut stmt| stmt.execute(params![status.as_str(), id.raw()]))
        .map_err(StorageError::sqlite)?;
    Ok(())
}

/// Reject with client feedback in one write.
pub fn set_rejected(
    conn: &Connection,
    id: MilestoneId,
    feedback: &str,
) -> Result<(), StorageError> {
    conn.prepare_cached(
        "UPDATE milestones SET status = 'REJECTED', client_feedback = ?1 WHERE id = ?2",
    )
    .and_then(|mut stmt| stmt.execute(params![feedback, id.raw()]))
    .map_err(StorageError::sqlite)?;
    Ok(())
}

/// Milestones for a project in order-index order.
pub fn list_by_project(
    conn: &Connection,
    project: ProjectId,
) -> Result<Vec<Milestone>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {COLUMNS} FROM milestones WHERE project_id = ?1 ORDER BY order_index"
        ))
        .map_err(StorageError::sqlite)?;
    let mut rows = stmt.query(params![project.raw()]).map_err(StorageError::sqlite)?;
    let mut out = Vec::new();
    while let Some(row) = rows.next().map_err(StorageError::sqlite)? {
        out.push(decode(row)?);
    }
    Ok(out)
}
