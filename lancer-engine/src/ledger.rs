//! The wallet ledger.
//!
//! The only component that mutates wallet balances. Every balance write is
//! paired with a trail append in the same transaction, so the stored
//! balance is always the signed sum of the user's CREDIT/DEBIT entries.

use std::sync::Arc;

use rusqlite::Connection;
use tracing::debug;

use lancer_core::errors::{MarketError, MarketResult};
use lancer_core::types::wallet::{TransactionKind, WalletTransaction};
use lancer_core::{Money, UserId};
use lancer_storage::queries::{users, wallet};
use lancer_storage::MarketStore;

pub struct Ledger {
    store: Arc<MarketStore>,
}

impl Ledger {
    pub fn new(store: Arc<MarketStore>) -> Self {
        Self { store }
    }

    /// Increase `user`'s balance and append a CREDIT entry.
    pub fn credit(&self, user: UserId, amount: Money, description: &str) -> MarketResult<()> {
        self.store.with_tx(|conn| credit_tx(conn, user, amount, description))
    }

    /// Decrease `user`'s balance and append a DEBIT entry.
    /// Fails with `InsufficientFunds` without touching anything.
    pub fn debit(&self, user: UserId, amount: Money, description: &str) -> MarketResult<()> {
        self.store.with_tx(|conn| debit_tx(conn, user, amount, description))
    }

    /// Transaction history, newest-first.
    pub fn history(&self, user: UserId) -> MarketResult<Vec<WalletTransaction>> {
        self.store.wallet_history(user)
    }

    /// Current wallet balance.
    pub fn balance(&self, user: UserId) -> MarketResult<Money> {
        Ok(self.store.user(user)?.wallet_balance)
    }
}

fn require_positive(amount: Money) -> MarketResult<()> {
    if amount.is_zero() {
        return Err(MarketError::InvalidAmount {
            message: "ledger amounts must be positive".to_string(),
        });
    }
    Ok(())
}

/// Credit within an open transaction.
pub(crate) fn credit_tx(
    conn: &Connection,
    user: UserId,
    amount: Money,
    description: &str,
) -> MarketResult<()> {
    require_positive(amount)?;
    let account = users::get(conn, user)?.ok_or(MarketError::not_found("user", user.raw()))?;
    users::set_wallet_balance(conn, user, account.wallet_balance.add(amount))?;
    wallet::append(conn, user, amount, TransactionKind::Credit, description)?;
    debug!(user = %user, amount = %amount, "wallet credit");
    Ok(())
}

/// Debit within an open transaction. Solvency-checked.
pub(crate) fn debit_tx(
    conn: &Connection,
    user: UserId,
    amount: Money,
    description: &str,
) -> MarketResult<()> {
    require_positive(amount)?;
    let account = users::get(conn, user)?.ok_or(MarketError::not_found("user", user.raw()))?;
    let remaining =
        account.wallet_balance.sub(amount).ok_or(MarketError::InsufficientFunds {
            balance: account.wallet_balance.cents(),
            needed: amount.cents(),
        })?;
    users::set_wallet_balance(conn, user, remaining)?;
    wallet::append(conn, user, amount, TransactionKind::Debit, description)?;
    debug!(user = %user, amount = %amount, "wallet debit");
    Ok(())
}

/// Append a record-only entry (SUBSCRIPTION or COMMISSION). The balance is
/// untouched: subscription charges settle externally and commission is
/// accounted for by never crediting it.
pub(crate) fn record_tx(
    conn: &Connection,
    user: UserId,
    amount: Money,
    kind: TransactionKind,
    description: &str,
) -> MarketResult<()> {
    wallet::append(conn, user, amount, kind, description)?;
    Ok(())
}
