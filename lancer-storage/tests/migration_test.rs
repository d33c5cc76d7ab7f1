//! Migration runner tests: forward-only, versioned, idempotent on reopen.

use rusqlite::Connection;
use tempfile::TempDir;

use lancer_storage::migrations::{current_version, run_migrations, LATEST_VERSION};
use lancer_storage::MarketStore;

#[test]
fn fresh_database_reaches_latest_version() {
    let conn = Connection::open_in_memory().unwrap();
    let applied = run_migrations(&conn).unwrap();
    assert_eq!(applied, LATEST_VERSION);
    assert_eq!(current_version(&conn).unwrap(), LATEST_VERSION);
}

#[test]
fn reopen_applies_nothing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("market.db");

    {
        let store = MarketStore::open(&path).unwrap();
        assert!(store.path().is_some());
    }

    // Second open must find the schema already current.
    let conn = Connection::open(&path).unwrap();
    assert_eq!(current_version(&conn).unwrap(), LATEST_VERSION);
    assert_eq!(run_migrations(&conn).unwrap(), 0);
}

#[test]
fn all_core_tables_exist() {
    let conn = Connection::open_in_memory().unwrap();
    run_migrations(&conn).unwrap();

    for table in [
        "users",
        "projects",
        "bids",
        "milestones",
        "subscriptions",
        "wallet_transactions",
        "notifications",
        "reviews",
    ] {
        let exists: bool = conn
            .prepare("SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1")
            .and_then(|mut stmt| stmt.exists([table]))
            .unwrap();
        assert!(exists, "missing table {table}");
    }
}
