//! # lancer-core
//!
//! Foundation crate for the Lancer marketplace engine.
//! Defines entity types, stable identifiers, money arithmetic, the
//! subscription plan table, role policy, errors, config, and tracing setup.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod errors;
pub mod plan;
pub mod policy;
pub mod telemetry;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::MarketConfig;
pub use errors::{MarketError, MarketResult};
pub use plan::SubscriptionPlan;
pub use types::identifiers::{
    BidId, MilestoneId, NotificationId, ProjectId, ReviewId, SubscriptionId, UserId,
};
pub use types::money::Money;
