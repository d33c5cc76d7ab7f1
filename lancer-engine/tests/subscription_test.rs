//! Subscription billing tests: activation, upgrade, cancellation, quota
//! gating, and commission tiers.

use lancer_core::types::subscription::SubscriptionStatus;
use lancer_core::types::user::{NewUser, Role};
use lancer_core::types::wallet::TransactionKind;
use lancer_core::{Money, SubscriptionPlan, UserId};
use lancer_engine::Marketplace;
use lancer_storage::queries::subscriptions;

fn market() -> Marketplace {
    Marketplace::open_in_memory().unwrap()
}

fn register(market: &Marketplace, name: &str, role: Role) -> UserId {
    market
        .users
        .register(&NewUser {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            role,
            full_name: None,
            skills: None,
            category: None,
            location: None,
            hourly_rate: Money::ZERO,
        })
        .unwrap()
        .id
}

#[test]
fn activation_issues_invoice_and_trail_entry() {
    let market = market();
    let user = register(&market, "dev", Role::Freelancer);

    let sub = market.subscriptions.activate(user, SubscriptionPlan::Growth, Some("card"), true).unwrap();
    assert_eq!(sub.status, SubscriptionStatus::Active);
    assert_eq!(sub.plan, SubscriptionPlan::Growth);
    assert_eq!(sub.amount_paid.cents(), 99_900);
    assert_eq!(sub.bids_used_this_cycle, 0);
    assert!(sub.invoice_number.starts_with("TR-"));
    assert!(sub.transaction_id.starts_with("TXN-"));

    // Record-only entry: the wallet balance is untouched.
    let history = market.ledger.history(user).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].kind, TransactionKind::Subscription);
    assert_eq!(history[0].amount.cents(), 99_900);
    assert_eq!(market.ledger.balance(user).unwrap(), Money::ZERO);
}

#[test]
fn free_plan_activation_leaves_no_trail() {
    let market = market();
    let user = register(&market, "dev", Role::Freelancer);

    let sub = market.subscriptions.activate(user, SubscriptionPlan::Free, None, false).unwrap();
    assert_eq!(sub.amount_paid, Money::ZERO);
    assert!(market.ledger.history(user).unwrap().is_empty());
}

#[test]
fn upgrade_cancels_the_previous_subscription() {
    let market = market();
    let user = register(&market, "dev", Role::Freelancer);

    market.subscriptions.activate(user, SubscriptionPlan::Growth, None, true).unwrap();
    market.subscriptions.activate(user, SubscriptionPlan::Elite, None, true).unwrap();

    let active = market.subscriptions.find_active(user).unwrap().unwrap();
    assert_eq!(active.plan, SubscriptionPlan::Elite);
    assert_eq!(market.subscriptions.count_active().unwrap(), 1);
    assert_eq!(market.subscriptions.count_cancelled().unwrap(), 1);
}

#[test]
fn cancel_is_a_noop_without_an_active_subscription() {
    let market = market();
    let user = register(&market, "dev", Role::Freelancer);

    market.subscriptions.cancel(user).unwrap();
    assert!(market.subscriptions.find_active(user).unwrap().is_none());

    market.subscriptions.activate(user, SubscriptionPlan::Pro, None, true).unwrap();
    market.subscriptions.cancel(user).unwrap();
    assert!(market.subscriptions.find_active(user).unwrap().is_none());
    assert_eq!(market.subscriptions.count_cancelled().unwrap(), 1);
}

#[test]
fn quota_gate_closes_when_the_cycle_allowance_is_spent() {
    let market = market();
    let user = register(&market, "dev", Role::Freelancer);
    let sub = market.subscriptions.activate(user, SubscriptionPlan::Growth, None, true).unwrap();
    assert!(market.subscriptions.can_bid(user).unwrap());

    // Burn the whole GROWTH allowance.
    market
        .store()
        .with_tx(|conn| {
            for _ in 0..50 {
                subscriptions::increment_bids_used(conn, sub.id)?;
            }
            Ok(())
        })
        .unwrap();

    assert!(!market.subscriptions.can_bid(user).unwrap());
}

#[test]
fn elite_is_never_quota_gated() {
    let market = market();
    let user = register(&market, "dev", Role::Freelancer);
    let sub = market.subscriptions.activate(user, SubscriptionPlan::Elite, None, true).unwrap();

    market
        .store()
        .with_tx(|conn| {
            for _ in 0..500 {
                subscriptions::increment_bids_used(conn, sub.id)?;
            }
            Ok(())
        })
        .unwrap();

    assert!(market.subscriptions.can_bid(user).unwrap());
}

#[test]
fn commission_rate_follows_the_active_tier() {
    let market = market();
    let user = register(&market, "dev", Role::Freelancer);

    // No subscription: free-tier rate.
    assert_eq!(market.subscriptions.commission_bps(user).unwrap(), 500);

    market.subscriptions.activate(user, SubscriptionPlan::Elite, None, true).unwrap();
    assert_eq!(market.subscriptions.commission_bps(user).unwrap(), 400);

    market.subscriptions.cancel(user).unwrap();
    assert_eq!(market.subscriptions.commission_bps(user).unwrap(), 500);
}

#[test]
fn revenue_sums_active_paid_plans() {
    let market = market();
    let a = register(&market, "a", Role::Freelancer);
    let b = register(&market, "b", Role::Freelancer);
    let c = register(&market, "c", Role::Freelancer);

    market.subscriptions.activate(a, SubscriptionPlan::Growth, None, true).unwrap();
    market.subscriptions.activate(b, SubscriptionPlan::Growth, None, true).unwrap();
    market.subscriptions.activate(c, SubscriptionPlan::Elite, None, true).unwrap();

    assert_eq!(market.subscriptions.monthly_revenue().unwrap().cents(), 2 * 99_900 + 249_900);
    assert_eq!(market.subscriptions.count_by_plan(SubscriptionPlan::Growth).unwrap(), 2);
    assert_eq!(market.subscriptions.count_by_plan(SubscriptionPlan::Elite).unwrap(), 1);

    // Cancelled plans drop out of revenue.
    market.subscriptions.cancel(a).unwrap();
    assert_eq!(market.subscriptions.monthly_revenue().unwrap().cents(), 99_900 + 249_900);
}
