//! Stable entity identifiers.
//!
//! Relations between entities are always looked up by id through the store,
//! never traversed via owned references; that keeps the entity graph
//! (Project ↔ Bid ↔ Milestone ↔ User) free of ownership cycles.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub fn raw(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Row id of a user (wallet owner, bidder, or project owner).
    UserId
);
define_id!(
    /// Row id of a project.
    ProjectId
);
define_id!(
    /// Row id of a bid.
    BidId
);
define_id!(
    /// Row id of a milestone.
    MilestoneId
);
define_id!(
    /// Row id of a subscription record.
    SubscriptionId
);
define_id!(
    /// Row id of a notification.
    NotificationId
);
define_id!(
    /// Row id of a review.
    ReviewId
);
