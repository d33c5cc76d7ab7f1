//! wallet_transactions table queries. Append-only: no update, no delete.

use rusqlite::{params, Connection, Row};

use lancer_core::errors::StorageError;
use lancer_core::types::money::Money;
use lancer_core::types::wallet::{TransactionKind, WalletTransaction};
use lancer_core::UserId;

use super::{decode_money, decode_timestamp, now_rfc3339};

const COLUMNS: &str = "id, user_id, amount_cents, kind, description, created_at";

fn decode(row: &Row<'_>) -> Result<WalletTransaction, StorageError> {
    let kind_raw: String = row.get(3).map_err(StorageError::sqlite)?;
    let kind = TransactionKind::parse(&kind_raw).ok_or_else(|| {
        StorageError::corrupt("wallet_transactions", format!("unknown kind {kind_raw:?}"))
    })?;
    let created_raw: String = row.get(5).map_err(StorageError::sqlite)?;
    Ok(WalletTransaction {
        id: row.get(0).map_err(StorageError::sqlite)?,
        user: UserId(row.get(1).map_err(StorageError::sqlite)?),
        amount: decode_money("wallet_transactions", row.get(2).map_err(StorageError::sqlite)?)?,
        kind,
        description: row.get(4).map_err(StorageError::sqlite)?,
        created_at: decode_timestamp("wallet_transactions", &created_raw)?,
    })
}

/// Append one trail entry.
pub fn append(
    conn: &Connection,
    user: UserId,
    amount: Money,
    kind: TransactionKind,
    description: &str,
) -> Result<i64, StorageError> {
    conn.prepare_cached(
        "INSERT INTO wallet_transactions (user_id, amount_cents, kind, description, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .and_then(|mut stmt| {
        stmt.execute(params![
            user.raw(),
            amount.cents(),
            kind.as_str(),
            description,
            now_rfc3339(),
        ])
    })
    .map_err(StorageError::sqlite)?;
    Ok(conn.last_insert_rowid())
}

/// Transaction history for a user, newest-first.
pub fn history(conn: &Connection, user: UserId) -> Result<Vec<WalletTransaction>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {COLUMNS} FROM wallet_transactions WHERE user_id = ?1 ORDER BY id DESC"
        ))
        .map_err(StorageError::sqlite)?;
    let mut rows = stmt.query(params![user.raw()]).map_err(StorageError::sqlite)?;
    let mut out = Vec::new();
    while let Some(row) = rows.next().map_err(StorageError::sqlite)? {
        out.push(decode(row)?);
    }
    Ok(out)
}

/// Signed sum of balance-moving entries (CREDIT positive, DEBIT negative;
/// record-only kinds contribute zero). Must always equal the stored balance.
pub fn signed_sum(conn: &Connection, user: UserId) -> Result<i64, StorageError> {
    conn.query_row(
        "SELECT COALESCE(SUM(CASE kind
                                 WHEN 'CREDIT' THEN amount_cents
                                 WHEN 'DEBIT' THEN -amount_cents
                                 ELSE 0
                             END), 0)
         FROM wallet_transactions WHERE user_id = ?1",
        params![user.raw()],
        |row| row.get(0),
    )
    .map_err(StorageError::sqlite)
}
