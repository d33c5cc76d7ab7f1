//! subscriptions table queries.

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};

use lancer_core::errors::StorageError;
use lancer_core::types::money::Money;
use lancer_core::types::subscription::{Subscription, SubscriptionStatus};
use lancer_core::{SubscriptionId, SubscriptionPlan, UserId};

use super::{decode_date, decode_money, decode_timestamp, now_rfc3339};

const COLUMNS: &str = "id, user_id, plan, status, payment_method, amount_paid_cents, auto_renew,
                       start_date, next_billing_date, bids_used_this_cycle, invoice_number,
                       transaction_id, created_at";

fn decode(row: &Row<'_>) -> Result<Subscription, StorageError> {
    let plan_raw: String = row.get(2).map_err(StorageError::sqlite)?;
    let plan = SubscriptionPlan::parse(&plan_raw).ok_or_else(|| {
        StorageError::corrupt("subscriptions", format!("unknown plan {plan_raw:?}"))
    })?;
    let status_raw: String = row.get(3).map_err(StorageError::sqlite)?;
    let status = SubscriptionStatus::parse(&status_raw).ok_or_else(|| {
        StorageError::corrupt("subscriptions", format!("unknown status {status_raw:?}"))
    })?;
    let start_raw: String = row.get(7).map_err(StorageError::sqlite)?;
    let billing_raw: String = row.get(8).map_err(StorageError::sqlite)?;
    let created_raw: String = row.get(12).map_err(StorageError::sqlite)?;
    Ok(Subscription {
        id: SubscriptionId(row.get(0).map_err(StorageError::sqlite)?),
        user: UserId(row.get(1).map_err(StorageError::sqlite)?),
        plan,
        status,
        payment_method: row.get(4).map_err(StorageError::sqlite)?,
        amount_paid: decode_money("subscriptions", row.get(5).map_err(StorageError::sqlite)?)?,
        auto_renew: row.get(6).map_err(StorageError::sqlite)?,
        start_date: decode_date("subscriptions", &start_raw)?,
        next_billing_date: decode_date("subscriptions", &billing_raw)?,
        bids_used_this_cycle: row.get(9).map_err(StorageError::sqlite)?,
        invoice_number: row.get(10).map_err(StorageError::sqlite)?,
        transaction_id: row.get(11).map_err(StorageError::sqlite)?,
        created_at: decode_timestamp("subscriptions", &created_raw)?,
    })
}

fn query_rows(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<Subscription>, StorageError> {
    let mut stmt = conn.prepare_cached(sql).map_err(StorageError::sqlite)?;
    let mut rows = stmt.query(params).map_err(StorageError::sqlite)?;
    let mut out = Vec::new();
    while let Some(row) = rows.next().map_err(StorageError::sqlite)? {
        out.push(decode(row)?);
    }
    Ok(out)
}

/// Fields of a subscription record at creation time.
pub struct NewSubscription<'a> {
    pub user: UserId,
    pub plan: SubscriptionPlan,
    pub payment_method: Option<&'a str>,
    pub amount_paid: Money,
    pub auto_renew: bool,
    pub start_date: NaiveDate,
    pub next_billing_date: NaiveDate,
    pub invoice_number: &'a str,
    pub transaction_id: &'a str,
}

/// Insert an ACTIVE subscription with a fresh usage counter.
pub fn insert(conn: &Connection, sub: &NewSubscription<'_>) -> Result<SubscriptionId, StorageError> {
    conn.prepare_cached(
        "INSERT INTO subscriptions (user_id, plan, status, payment_method, amount_paid_cents,
                                    auto_renew, start_date, next_billing_date,
                                    bids_used_this_cycle, invoice_number, transaction_id,
                                    created_at)
         VALUES (?1, ?2, 'ACTIVE', ?3, ?4, ?5, ?6, ?7, 0, ?8, ?9, ?10)",
    )
    .and_then(|mut stmt| {
        stmt.execute(params![
            sub.user.raw(),
            sub.plan.as_str(),
            sub.payment_method,
            sub.amount_paid.cents(),
            sub.auto_renew,
            sub.start_date.to_string(),
            sub.next_billing_date.to_string(),
            sub.invoice_number,
            sub.transaction_id,
            now_rfc3339(),
        ])
    })
    .map_err(StorageError::sqlite)?;
    Ok(SubscriptionId(conn.last_insert_rowid()))
}

pub fn get(conn: &Connection, id: SubscriptionId) -> Result<Option<Subscription>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!("SELECT {COLUMNS} FROM subscriptions WHERE id = ?1"))
        .map_err(StorageError::sqlite)?;
    let mut rows = stmt.query(params![id.raw()]).map_err(StorageError::sqlite)?;
    match rows.next().map_err(StorageError::sqlite)? {
        Some(row) => Ok(Some(decode(row)?)),
        None => Ok(None),
    }
}

/// The user's ACTIVE subscription, if any. The partial unique index
/// guarantees at most one row.
pub fn find_active(conn: &Connection, user: UserId) -> Result<Option<Subscription>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {COLUMNS} FROM subscriptions WHERE user_id = ?1 AND status = 'ACTIVE'"
        ))
        .map_err(StorageError::sqlite)?;
    let mut rows = stmt.query(params![user.raw()]).map_err(StorageError::sqlite)?;
    match rows.next().map_err(StorageError::sqlite)? {
        Some(row) => Ok(Some(decode(row)?)),
        None => Ok(None),
    }
}

/// Cancel the user's active subscription (status + auto-renew off).
/// Returns how many rows changed (0 or 1).
pub fn cancel_active(conn: &Connection, user: UserId) -> Result<usize, StorageError> {
    conn.prepare_cached(
        "UPDATE subscriptions SET status = 'CANCELLED', auto_renew = 0
         WHERE user_id = ?1 AND status = 'ACTIVE'",
    )
    .and_then(|mut stmt| stmt.execute(params![user.raw()]))
    .map_err(StorageError::sqlite)
}

/// Consume one bid from the cycle allowance.
pub fn increment_bids_used(conn: &Connection, id: SubscriptionId) -> Result<(), StorageError> {
    conn.prepare_cached(
        "UPDATE subscriptions SET bids_used_this_cycle = bids_used_this_cycle + 1 WHERE id = ?1",
    )
    .and_then(|mut stmt| stmt.execute(params![id.raw()]))
    .map_err(StorageError::sqlite)?;
    Ok(())
}

pub fn count_by_status(
    conn: &Connection,
    status: SubscriptionStatus,
) -> Result<u64, StorageError> {
    conn.query_row(
        "SELECT COUNT(*) FROM subscriptions WHERE status = ?1",
        params![status.as_str()],
        |row| row.get::<_, i64>(0),
    )
    .map(|n| n as u64)
    .map_err(StorageError::sqlite)
}

pub fn count_active_by_plan(
    conn: &Connection,
    plan: SubscriptionPlan,
) -> Result<u64, StorageError> {
    conn.query_row(
        "SELECT COUNT(*) FROM subscriptions WHERE plan = ?1 AND status = 'ACTIVE'",
        params![plan.as_str()],
        |row| row.get::<_, i64>(0),
    )
    .map(|n| n as u64)
    .map_err(StorageError::sqlite)
}

/// Sum of amount paid across ACTIVE subscriptions, in minor units.
pub fn sum_active_revenue(conn: &Connection) -> Result<i64, StorageError> {
    conn.query_row(
        "SELECT COALESCE(SUM(amount_paid_cents), 0) FROM subscriptions WHERE status = 'ACTIVE'",
        [],
        |row| row.get(0),
    )
    .map_err(StorageError::sqlite)
}

pub fn list_all(conn: &Connection) -> Result<Vec<Subscription>, StorageError> {
    query_rows(
        conn,
        &format!("SELECT {COLUMNS} FROM subscriptions ORDER BY id DESC"),
        [],
    )
}

pub fn list_by_status(
    conn: &Connection,
    status: SubscriptionStatus,
) -> Result<Vec<Subscription>, StorageError> {
    query_rows(
        conn,
        &format!("SELECT {COLUMNS} FROM subscriptions WHERE status = ?1 ORDER BY id DESC"),
        params![status.as_str()],
    )
}
