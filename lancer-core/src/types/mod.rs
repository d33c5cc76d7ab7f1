//! Entity types and value objects.

pub mod bid;
pub mod identifiers;
pub mod milestone;
pub mod money;
pub mod notification;
pub mod project;
pub mod review;
pub mod subscription;
pub mod user;
pub mod wallet;

pub use bid::{Bid, BidStatus, NewBid};
pub use milestone::{Milestone, MilestoneStatus};
pub use notification::Notification;
pub use project::{NewProject, Project, ProjectStatus};
pub use review::Review;
pub use subscription::{Subscription, SubscriptionStatus};
pub use user::{NewUser, Role, User};
pub use wallet::{TransactionKind, WalletTransaction};
