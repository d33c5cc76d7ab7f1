//! projects table queries.

use rusqlite::{params, Connection, Row};

use lancer_core::errors::StorageError;
use lancer_core::types::project::{NewProject, Project, ProjectStatus};
use lancer_core::{ProjectId, UserId};

use super::{decode_date, decode_money, decode_timestamp, now_rfc3339};

const COLUMNS: &str = "id, client_id, title, description, category, skills_required,
                       budget_min_cents, budget_max_cents, deadline, status,
                       assigned_freelancer_id, created_at";

fn decode(row: &Row<'_>) -> Result<Project, StorageError> {
    let status_raw: String = row.get(9).map_err(StorageError::sqlite)?;
    let status = ProjectStatus::parse(&status_raw).ok_or_else(|| {
        StorageError::corrupt("projects", format!("unknown status {status_raw:?}"))
    })?;
    let deadline_raw: Option<String> = row.get(8).map_err(StorageError::sqlite)?;
    let created_raw: String = row.get(11).map_err(StorageError::sqlite)?;
    Ok(Project {
        id: ProjectId(row.get(0).map_err(StorageError::sqlite)?),
        client: UserId(row.get(1).map_err(StorageError::sqlite)?),
        title: row.get(2).map_err(StorageError::sqlite)?,
        description: row.get(3).map_err(StorageError::sqlite)?,
        category: row.get(4).map_err(StorageError::sqlite)?,
        skills_required: row.get(5).map_err(StorageError::sqlite)?,
        budget_min: decode_money("projects", row.get(6).map_err(StorageError::sqlite)?)?,
        budget_max: decode_money("projects", row.get(7).map_err(StorageError::sqlite)?)?,
        deadline: deadline_raw.map(|d| decode_date("projects", &d)).transpose()?,
        status,
        assigned_freelancer: row
            .get::<_, Option<i64>>(10)
            .map_err(StorageError::sqlite)?
            .map(UserId),
        created_at: decode_timestamp("projects", &created_raw)?,
    })
}

fn query_rows(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<Project>, StorageError> {
    let mut stmt = conn.prepare_cached(sql).map_err(StorageError::sqlite)?;
    let mut rows = stmt.query(params).map_err(StorageError::sqlite)?;
    let mut out = Vec::new();
    while let Some(row) = rows.next().map_err(StorageError::sqlite)? {
        out.push(decode(row)?);
    }
    Ok(out)
}

/// Insert a project with status OPEN, owned by `client`.
pub fn insert(
    conn: &Connection,
    client: UserId,
    project: &NewProject,
) -> Result<ProjectId, StorageError> {
    conn.prepare_cached(
        "INSERT INTO projects (client_id, title, description, category, skills_required,
                               budget_min_cents, budget_max_cents, deadline, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 'OPEN', ?9)",
    )
    .and_then(|mut stmt| {
        stmt.execute(params![
            client.raw(),
            project.title,
            project.description,
            project.category,
            project.skills_required,
            project.budget_min.cents(),
            project.budget_max.cents(),
            project.deadline.map(|d| d.to_string()),
            now_rfc3339(),
        ])
    })
    .map_err(StorageError::sqlite)?;
    Ok(ProjectId(conn.last_insert_rowid()))
}

pub fn get(conn: &Connection, id: ProjectId) -> Result<Option<Project>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!("SELECT {COLUMNS} FROM projects WHERE id = ?1"))
        .map_err(StorageError::sqlite)?;
    let mut rows = stmt.query(params![id.raw()]).map_err(StorageError::sqlite)?;
    match rows.next().map_err(StorageError::sqlite)? {
        Some(row) => Ok(Some(decode(row)?)),
        None => Ok(None),
    }
}

pub fn set_status(
    conn: &Connection,
    id: ProjectId,
    status: ProjectStatus,
) -> Result<(), StorageError> {
    conn.prepare_cached("UPDATE projects SET status = ?1 WHERE id = ?2")
        .and_then(|mut stmt| stmt.execute(params![status.as_str(), id.raw()]))
        .map_err(StorageError::sqlite)?;
    Ok(())
}

/// Assign a freelancer and move the project to IN_PROGRESS in one write.
pub fn assign_freelancer(
    conn: &Connection,
    id: ProjectId,
    freelancer: UserId,
) -> Result<(), StorageError> {
    conn.prepare_cached(
        "UPDATE projects SET assigned_freelancer_id = ?1, status = 'IN_PROGRESS' WHERE id = ?2",
    )
    .and_then(|mut stmt| stmt.execute(params![freelancer.raw(), id.raw()]))
    .map_err(StorageError::sqlite)?;
    Ok(())
}

pub fn list_by_status(
    conn: &Connection,
    status: ProjectStatus,
) -> Result<Vec<Project>, StorageError> {
    query_rows(
        conn,
        &format!("SELECT {COLUMNS} FROM projects WHERE status = ?1 ORDER BY id DESC"),
        params![status.as_str()],
    )
}

pub fn list_by_client(conn: &Connection, client: UserId) -> Result<Vec<Project>, StorageError> {
    query_rows(
        conn,
        &format!("SELECT {COLUMNS} FROM projects WHERE client_id = ?1 ORDER BY id DESC"),
        params![client.raw()],
    )
}

pub fn list_by_freelancer(
    conn: &Connection,
    freelancer: UserId,
) -> Result<Vec<Project>, StorageError> {
    query_rows(
        conn,
        &format!(
            "SELECT {COLUMNS} FROM projects WHERE assigned_freelancer_id = ?1 ORDER BY id DESC"
        ),
        params![freelancer.raw()],
    )
}

pub fn count_by_status(conn: &Connection, status: ProjectStatus) -> Result<u64, StorageError> {
    conn.query_row(
        "SELECT COUNT(*) FROM projects WHERE status = ?1",
        params![status.as_str()],
        |row| row.get::<_, i64>(0),
    )
    .map(|n| n as u64)
    .map_err(StorageError::sqlite)
}

pub fn count_total(conn: &Connection) -> Result<u64, StorageError> {
    conn.query_row("SELECT COUNT(*) FROM projects", [], |row| row.get::<_, i64>(0))
        .map(|n| n as u64)
        .map_err(StorageError::sqlite)
}
