//! bids table queries.

use rusqlite::{params, Connection, Row};

use lancer_core::errors::StorageError;
use lancer_core::types::bid::{Bid, BidStatus, NewBid};
use lancer_core::{BidId, ProjectId, UserId};

use super::{decode_money, decode_timestamp, now_rfc3339};

const COLUMNS: &str =
    "id, project_id, freelancer_id, amount_cents, delivery_days, proposal, status, created_at";

fn decode(row: &Row<'_>) -> Result<Bid, StorageError> {
    let status_raw: String = row.get(6).map_err(StorageError::sqlite)?;
    let status = BidStatus::parse(&status_raw)
        .ok_or_else(|| StorageError::corrupt("bids", format!("unknown status {status_raw:?}")))?;
    let created_raw: String = row.get(7).map_err(StorageError::sqlite)?;
    Ok(Bid {
        id: BidId(row.get(0).map_err(StorageError::sqlite)?),
        project: ProjectId(row.get(1).map_err(StorageError::sqlite)?),
        freelancer: UserId(row.get(2).map_err(StorageError::sqlite)?),
        amount: decode_money("bids", row.get(3).map_err(StorageError::sqlite)?)?,
        delivery_days: row.get(4).map_err(StorageError::sqlite)?,
        proposal: row.get(5).map_err(StorageError::sqlite)?,
        status,
        created_at: decode_timestamp("bids", &created_raw)?,
    })
}

fn query_rows(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<Bid>, StorageError> {
    let mut stmt = conn.prepare_cached(sql).map_err(StorageError::sqlite)?;
    let mut rows = stmt.query(params).map_err(StorageError::sqlite)?;
    let mut out = Vec::new();
    while let Some(row) = rows.next().map_err(StorageError::sqlite)? {
        out.push(decode(row)?);
    }
    Ok(out)
}

/// Insert a bid with status PENDING.
pub fn insert(conn: &Connection, bid: &NewBid) -> Result<BidId, StorageError> {
    conn.prepare_cached(
        "INSERT INTO bids (project_id, freelancer_id, amount_cents, delivery_days,
                           proposal, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, 'PENDING', ?6)",
    )
    .and_then(|mut stmt| {
        stmt.execute(params![
            bid.project.raw(),
            bid.freelancer.raw(),
            bid.amount.cents(),
            bid.delivery_days,
            bid.proposal,
            now_rfc3339(),
        ])
    })
    .map_err(StorageError::sqlite)?;
    Ok(BidId(conn.last_insert_rowid()))
}

pub fn get(conn: &Connection, id: BidId) -> Result<Option<Bid>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!("SELECT {COLUMNS} FROM bids WHERE id = ?1"))
        .map_err(StorageError::sqlite)?;
    let mut rows = stmt.query(params![id.raw()]).map_err(StorageError::sqlite)?;
    match rows.next().map_err(StorageError::sqlite)? {
        Some(row) => Ok(Some(decode(row)?)),
        None => Ok(None),
    }
}

/// Whether a non-withdrawn bid exists for (project, freelancer).
pub fn exists_open(
    conn: &Connection,
    project: ProjectId,
    freelancer: UserId,
) -> Result<bool, StorageError> {
    conn.prepare_cached(
        "SELECT 1 FROM bids
         WHERE project_id = ?1 AND freelancer_id = ?2 AND status != 'WITHDRAWN'",
    )
    .and_then(|mut stmt| stmt.exists(params![project.raw(), freelancer.raw()]))
    .map_err(StorageError::sqlite)
}

pub fn set_status(conn: &Connection, id: BidId, status: BidStatus) -> Result<(), StorageError> {
    conn.prepare_cached("UPDATE bids SET status = ?1 WHERE id = ?2")
        .and_then(|mut stmt| stmt.execute(params![status.as_str(), id.raw()]))
        .map_err(StorageError::sqlite)?;
    Ok(())
}

/// All bids on a project, insertion order.
pub fn list_by_project(conn: &Connection, project: ProjectId) -> Result<Vec<Bid>, StorageError> {
    query_rows(
        conn,
        &format!("SELECT {COLUMNS} FROM bids WHERE project_id = ?1 ORDER BY id"),
        params![project.raw()],
    )
}

pub fn list_by_freelancer(
    conn: &Connection,
    freelancer: UserId,
) -> Result<Vec<Bid>, StorageError> {
    query_rows(
        conn,
        &format!("SELECT {COLUMNS} FROM bids WHERE freelancer_id = ?1 ORDER BY id"),
        params![freelancer.raw()],
    )
}

/// Bids placed by a freelancer at or after `since` (RFC 3339). Backs the
/// free-tier monthly quota, which has no subscription row to count on.
pub fn count_for_freelancer_since(
    conn: &Connection,
    freelancer: UserId,
    since: &str,
) -> Result<u32, StorageError> {
    conn.query_row(
        "SELECT COUNT(*) FROM bids WHERE freelancer_id = ?1 AND created_at >= ?2",
        params![freelancer.raw(), since],
        |row| row.get::<_, i64>(0),
    )
    .map(|n| n as u32)
    .map_err(StorageError::sqlite)
}

pub fn count_for_project(conn: &Connection, project: ProjectId) -> Result<u64, StorageError> {
    conn.query_row(
        "SELECT COUNT(*) FROM bids WHERE project_id = ?1",
        params![project.raw()],
        |row| row.get::<_, i64>(0),
    )
    .map(|n| n as u64)
    .map_err(StorageError::sqlite)
}
