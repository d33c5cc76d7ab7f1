//! # lancer-storage
//!
//! SQLite persistence layer for the Lancer marketplace engine.
//! WAL mode, single serialized write connection, forward-only schema
//! migrations, per-table query modules, and the `MarketStore` facade.

pub mod connection;
pub mod migrations;
pub mod queries;
pub mod store;

pub use connection::ConnectionManager;
pub use store::MarketStore;
