//! Role capability policy.
//!
//! One table instead of role conditionals scattered through the services.
//! Admins get the read-side capabilities plus account administration; they
//! do not post projects or bid.

use crate::types::user::Role;

/// Actions a caller may attempt against the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    PostProject,
    AcceptBid,
    ApproveMilestone,
    SubmitBid,
    SubmitMilestone,
    Subscribe,
    PostReview,
    ManageUsers,
    ViewAnalytics,
}

/// Whether `role` is allowed to perform `capability`.
pub fn allows(role: Role, capability: Capability) -> bool {
    use Capability::*;
    match role {
        Role::Client => matches!(
            capability,
            PostProject | AcceptBid | ApproveMilestone | PostReview
        ),
        Role::Freelancer => matches!(
            capability,
            SubmitBid | SubmitMilestone | Subscribe | PostReview
        ),
        Role::Admin => matches!(capability, ManageUsers | ViewAnalytics),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clients_cannot_bid_freelancers_cannot_accept() {
        assert!(!allows(Role::Client, Capability::SubmitBid));
        assert!(!allows(Role::Freelancer, Capability::AcceptBid));
        assert!(allows(Role::Client, Capability::AcceptBid));
        assert!(allows(Role::Freelancer, Capability::SubmitBid));
    }

    #[test]
    fn admin_is_read_and_account_side_only() {
        assert!(allows(Role::Admin, Capability::ManageUsers));
        assert!(allows(Role::Admin, Capability::ViewAnalytics));
        assert!(!allows(Role::Admin, Capability::PostProject));
        assert!(!allows(Role::Admin, Capability::Subscribe));
    }
}
