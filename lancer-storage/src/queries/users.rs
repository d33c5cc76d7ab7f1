//! users table queries.

use rusqlite::{params, Connection, OptionalExtension, Row};

use lancer_core::errors::StorageError;
use lancer_core::types::money::Money;
use lancer_core::types::user::{NewUser, Role, User, INITIAL_PERFORMANCE_SCORE};
use lancer_core::UserId;

use super::{decode_money, decode_timestamp, now_rfc3339};

const COLUMNS: &str = "id, username, email, role, full_name, skills, category, location,
                       hourly_rate_cents, wallet_balance_cents, performance_score,
                       completed_projects, is_active, is_verified, created_at, updated_at";

fn decode(row: &Row<'_>) -> Result<User, StorageError> {
    let role_raw: String = row.get(3).map_err(StorageError::sqlite)?;
    let role = Role::parse(&role_raw)
        .ok_or_else(|| StorageError::corrupt("users", format!("unknown role {role_raw:?}")))?;
    let created_raw: String = row.get(14).map_err(StorageError::sqlite)?;
    let updated_raw: String = row.get(15).map_err(StorageError::sqlite)?;
    Ok(User {
        id: UserId(row.get(0).map_err(StorageError::sqlite)?),
        username: row.get(1).map_err(StorageError::sqlite)?,
        email: row.get(2).map_err(StorageError::sqlite)?,
        role,
        full_name: row.get(4).map_err(StorageError::sqlite)?,
        skills: row.get(5).map_err(StorageError::sqlite)?,
        category: row.get(6).map_err(StorageError::sqlite)?,
        location: row.get(7).map_err(StorageError::sqlite)?,
        hourly_rate: decode_money("users", row.get(8).map_err(StorageError::sqlite)?)?,
        wallet_balance: decode_money("users", row.get(9).map_err(StorageError::sqlite)?)?,
        performance_score: row.get(10).map_err(StorageError::sqlite)?,
        completed_projects: row.get(11).map_err(StorageError::sqlite)?,
        is_active: row.get(12).map_err(StorageError::sqlite)?,
        is_verified: row.get(13).map_err(StorageError::sqlite)?,
        created_at: decode_timestamp("users", &created_raw)?,
        updated_at: decode_timestamp("users", &updated_raw)?,
    })
}

fn query_rows(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<User>, StorageError> {
    let mut stmt = conn.prepare_cached(sql).map_err(StorageError::sqlite)?;
    let mut rows = stmt.query(params).map_err(StorageError::sqlite)?;
    let mut out = Vec::new();
    while let Some(row) = rows.next().map_err(StorageError::sqlite)? {
        out.push(decode(row)?);
    }
    Ok(out)
}

/// Insert a new user; wallet starts at zero, performance at 5.0.
pub fn insert(conn: &Connection, user: &NewUser) -> Result<UserId, StorageError> {
    let now = now_rfc3339();
    conn.prepare_cached(
        "INSERT INTO users (username, email, role, full_name, skills, category, location,
                            hourly_rate_cents, wallet_balance_cents, performance_score,
                            completed_projects, is_active, is_verified, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 0, ?9, 0, 1, 0, ?10, ?10)",
    )
    .and_then(|mut stmt| {
        stmt.execute(params![
            user.username,
            user.email,
            user.role.as_str(),
            user.full_name,
            user.skills,
            user.category,
            user.location,
            user.hourly_rate.cents(),
            INITIAL_PERFORMANCE_SCORE,
            now,
        ])
    })
    .map_err(StorageError::sqlite)?;
    Ok(UserId(conn.last_insert_rowid()))
}

pub fn exists_username(conn: &Connection, username: &str) -> Result<bool, StorageError> {
    conn.prepare_cached("SELECT 1 FROM users WHERE username = ?1")
        .and_then(|mut stmt| stmt.exists(params![username]))
        .map_err(StorageError::sqlite)
}

pub fn exists_email(conn: &Connection, email: &str) -> Result<bool, StorageError> {
    conn.prepare_cached("SELECT 1 FROM users WHERE email = ?1")
        .and_then(|mut stmt| stmt.exists(params![email]))
        .map_err(StorageError::sqlite)
}

pub fn get(conn: &Connection, id: UserId) -> Result<Option<User>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!("SELECT {COLUMNS} FROM users WHERE id = ?1"))
        .map_err(StorageError::sqlite)?;
    let mut rows = stmt.query(params![id.raw()]).map_err(StorageError::sqlite)?;
    match rows.next().map_err(StorageError::sqlite)? {
        Some(row) => Ok(Some(decode(row)?)),
        None => Ok(None),
    }
}

pub fn get_by_username(conn: &Connection, username: &str) -> Result<Option<User>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!("SELECT {COLUMNS} FROM users WHERE username = ?1"))
        .map_err(StorageError::sqlite)?;
    let mut rows = stmt.query(params![username]).map_err(StorageError::sqlite)?;
    match rows.next().map_err(StorageError::sqlite)? {
        Some(row) => Ok(Some(decode(row)?)),
        None => Ok(None),
    }
}

pub fn list_by_role(conn: &Connection, role: Role) -> Result<Vec<User>, StorageError> {
    query_rows(
        conn,
        &format!("SELECT {COLUMNS} FROM users WHERE role = ?1 ORDER BY id"),
        params![role.as_str()],
    )
}

/// Active freelancers, the candidate pool for project-match fan-out.
pub fn list_active_freelancers(conn: &Connection) -> Result<Vec<User>, StorageError> {
    query_rows(
        conn,
        &format!("SELECT {COLUMNS} FROM users WHERE role = 'FREELANCER' AND is_active = 1 ORDER BY id"),
        [],
    )
}

/// Balance write. Callers are the ledger, nothing else.
pub fn set_wallet_balance(
    conn: &Connection,
    id: UserId,
    balance: Money,
) -> Result<(), StorageError> {
    let changed = conn
        .prepare_cached("UPDATE users SET wallet_balance_cents = ?1, updated_at = ?2 WHERE id = ?3")
        .and_then(|mut stmt| stmt.execute(params![balance.cents(), now_rfc3339(), id.raw()]))
        .map_err(StorageError::sqlite)?;
    if changed == 0 {
        return Err(StorageError::corrupt("users", format!("no such user {id}")));
    }
    Ok(())
}

pub fn set_performance_score(
    conn: &Connection,
    id: UserId,
    score: f64,
) -> Result<(), StorageError> {
    conn.prepare_cached("UPDATE users SET performance_score = ?1, updated_at = ?2 WHERE id = ?3")
        .and_then(|mut stmt| stmt.execute(params![score, now_rfc3339(), id.raw()]))
        .map_err(StorageError::sqlite)?;
    Ok(())
}

pub fn increment_completed_projects(conn: &Connection, id: UserId) -> Result<(), StorageError> {
    conn.prepare_cached(
        "UPDATE users SET completed_projects = completed_projects + 1, updated_at = ?1
         WHERE id = ?2",
    )
    .and_then(|mut stmt| stmt.execute(params![now_rfc3339(), id.raw()]))
    .map_err(StorageError::sqlite)?;
    Ok(())
}

pub fn set_active(conn: &Connection, id: UserId, active: bool) -> Result<(), StorageError> {
    conn.prepare_cached("UPDATE users SET is_active = ?1, updated_at = ?2 WHERE id = ?3")
        .and_then(|mut stmt| stmt.execute(params![active, now_rfc3339(), id.raw()]))
        .map_err(StorageError::sqlite)?;
    Ok(())
}

pub fn count_by_role(conn: &Connection, role: Role) -> Result<u64, StorageError> {
    conn.query_row(
        "SELECT COUNT(*) FROM users WHERE role = ?1",
        params![role.as_str()],
        |row| row.get::<_, i64>(0),
    )
    .optional()
    .map_err(StorageError::sqlite)
    .map(|n| n.unwrap_or(0) as u64)
}
