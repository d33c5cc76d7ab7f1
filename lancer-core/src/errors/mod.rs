//! Error types for the marketplace engine.

pub mod market_error;
pub mod storage_error;

pub use market_error::{MarketError, MarketResult};
pub use storage_error::StorageError;
