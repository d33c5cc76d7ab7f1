//! Ledger tests: solvency, atomicity, and balance/trail reconciliation.

use lancer_core::errors::MarketError;
use lancer_core::types::user::{NewUser, Role};
use lancer_core::types::wallet::TransactionKind;
use lancer_core::{Money, UserId};
use lancer_engine::Marketplace;

fn market() -> Marketplace {
    Marketplace::open_in_memory().unwrap()
}

fn register(market: &Marketplace, name: &str) -> UserId {
    market
        .users
        .register(&NewUser {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            role: Role::Client,
            full_name: None,
            skills: None,
            category: None,
            location: None,
            hourly_rate: Money::ZERO,
        })
        .unwrap()
        .id
}

fn money(cents: i64) -> Money {
    Money::from_cents(cents).unwrap()
}

#[test]
fn credit_then_debit_moves_balance_and_appends_trail() {
    let market = market();
    let user = register(&market, "alice");

    market.ledger.credit(user, money(10_000), "deposit").unwrap();
    market.ledger.debit(user, money(2_500), "purchase").unwrap();

    assert_eq!(market.ledger.balance(user).unwrap(), money(7_500));

    let history = market.ledger.history(user).unwrap();
    assert_eq!(history.len(), 2);
    // Newest-first.
    assert_eq!(history[0].kind, TransactionKind::Debit);
    assert_eq!(history[0].amount, money(2_500));
    assert_eq!(history[1].kind, TransactionKind::Credit);
}

#[test]
fn debit_beyond_balance_fails_and_leaves_no_trace() {
    let market = market();
    let user = register(&market, "bob");
    market.ledger.credit(user, money(100), "deposit").unwrap();

    let err = market.ledger.debit(user, money(500), "too much").unwrap_err();
    assert!(matches!(
        err,
        MarketError::InsufficientFunds { balance: 100, needed: 500 }
    ));

    // Balance untouched, no DEBIT entry appended.
    assert_eq!(market.ledger.balance(user).unwrap(), money(100));
    assert_eq!(market.ledger.history(user).unwrap().len(), 1);
}

#[test]
fn zero_amounts_are_rejected() {
    let market = market();
    let user = register(&market, "carol");
    assert!(matches!(
        market.ledger.credit(user, Money::ZERO, "nothing"),
        Err(MarketError::InvalidAmount { .. })
    ));
}

#[test]
fn unknown_user_is_not_found() {
    let market = market();
    assert!(matches!(
        market.ledger.credit(UserId(404), money(100), "ghost"),
        Err(MarketError::NotFound { .. })
    ));
}

#[test]
fn balance_always_equals_signed_trail_sum() {
    let market = market();
    let user = register(&market, "dana");

    market.ledger.credit(user, money(5_000), "a").unwrap();
    market.ledger.debit(user, money(1_200), "b").unwrap();
    market.ledger.credit(user, money(250), "c").unwrap();
    market.ledger.debit(user, money(50), "d").unwrap();

    let history = market.ledger.history(user).unwrap();
    let signed: i64 = history
        .iter()
        .map(|tx| tx.kind.sign() * tx.amount.cents())
        .sum();
    assert_eq!(market.ledger.balance(user).unwrap().cents(), signed);
}
