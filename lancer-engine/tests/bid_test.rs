//! Bid manager tests: duplicate guard, role policy, quota enforcement,
//! and the withdraw flow.

use lancer_core::errors::MarketError;
use lancer_core::types::bid::{BidStatus, NewBid};
use lancer_core::types::project::NewProject;
use lancer_core::types::user::{NewUser, Role};
use lancer_core::{Money, ProjectId, SubscriptionPlan, UserId};
use lancer_engine::Marketplace;

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

fn money(cents: i64) -> Money {
    Money::from_cents(cents).unwrap()
}

fn post(market: &Marketplace, client: UserId, title: &str) -> ProjectId {
    market
        .projects
        .post_project(
            client,
            &NewProject {
                title: title.to_string(),
                description: "work".into(),
                category: None,
                skills_required: None,
                budget_min: money(10_000),
                budget_max: money(50_000),
                deadline: None,
            },
        )
        .unwrap()
        .id
}

fn new_bid(project: ProjectId, freelancer: UserId) -> NewBid {
    NewBid {
        project,
        freelancer,
        amount: money(20_000),
        delivery_days: 14,
        proposal: "I can do this".into(),
    }
}

#[test]
fn submit_then_withdraw() {
    let market = market();
    let client = register(&market, "client", Role::Client);
    let dev = register(&market, "dev", Role::Freelancer);
    let project = post(&market, client, "API");

    let bid = market.bids.submit(&new_bid(project, dev)).unwrap();
    assert_eq!(bid.status, BidStatus::Pending);
    assert_eq!(market.bids.count_for_project(project).unwrap(), 1);

    market.bids.withdraw(bid.id).unwrap();
    assert_eq!(market.bids.find(bid.id).unwrap().status, BidStatus::Withdrawn);
}

#[test]
fn duplicate_open_bid_is_rejected_until_withdrawn() {
    let market = market();
    let client = register(&market, "client", Role::Client);
    let dev = register(&market, "dev", Role::Freelancer);
    let project = post(&market, client, "API");

    let first = market.bids.submit(&new_bid(project, dev)).unwrap();
    assert!(matches!(
        market.bids.submit(&new_bid(project, dev)),
        Err(MarketError::DuplicateBid { .. })
    ));

    // Withdrawing the open bid frees the slot.
    market.bids.withdraw(first.id).unwrap();
    market.bids.submit(&new_bid(project, dev)).unwrap();
    assert_eq!(market.bids.list_by_freelancer(dev).unwrap().len(), 2);
}

#[test]
fn clients_may_not_bid() {
    let market = market();
    let client = register(&market, "client", Role::Client);
    let other = register(&market, "other", Role::Client);
    let project = post(&market, client, "API");

    assert!(matches!(
        market.bids.submit(&new_bid(project, other)),
        Err(MarketError::Forbidden { .. })
    ));
}

#[test]
fn free_tier_sixth_bid_exceeds_quota() {
    let market = market();
    let client = register(&market, "client", Role::Client);
    let dev = register(&market, "dev", Role::Freelancer);

    for i in 0..5 {
        let project = post(&market, client, &format!("project {i}"));
        market.bids.submit(&new_bid(project, dev)).unwrap();
    }
    assert!(!market.subscriptions.can_bid(dev).unwrap());

    let sixth = post(&market, client, "one too many");
    let err = market.bids.submit(&new_bid(sixth, dev)).unwrap_err();
    assert!(matches!(err, MarketError::BidQuotaExceeded { used: 5, quota: 5 }));

    // The rejected attempt left nothing behind.
    assert_eq!(market.bids.count_for_project(sixth).unwrap(), 0);
}

#[test]
fn elite_plan_bids_past_the_free_quota() {
    let market = market();
    let client = register(&market, "client", Role::Client);
    let dev = register(&market, "dev", Role::Freelancer);
    market.subscriptions.activate(dev, SubscriptionPlan::Elite, None, true).unwrap();

    for i in 0..8 {
        let project = post(&market, client, &format!("project {i}"));
        market.bids.submit(&new_bid(project, dev)).unwrap();
    }
    assert!(market.subscriptions.can_bid(dev).unwrap());
}

#[test]
fn paid_bids_consume_the_subscription_allowance() {
    let market = market();
    let client = register(&market, "client", Role::Client);
    let dev = register(&market, "dev", Role::Freelancer);
    market.subscriptions.activate(dev, SubscriptionPlan::Growth, None, true).unwrap();

    for i in 0..3 {
        let project = post(&market, client, &format!("project {i}"));
        market.bids.submit(&new_bid(project, dev)).unwrap();
    }

    let sub = market.subscriptions.find_active(dev).unwrap().unwrap();
    assert_eq!(sub.bids_used_this_cycle, 3);
}

#[test]
fn unknown_project_or_freelancer_is_not_found() {
    let market = market();
    let client = register(&market, "client", Role::Client);
    let dev = register(&market, "dev", Role::Freelancer);
    let project = post(&market, client, "API");

    assert!(matches!(
        market.bids.submit(&new_bid(ProjectId(999), dev)),
        Err(MarketError::NotFound { .. })
    ));
    assert!(matches!(
        market.bids.submit(&new_bid(project, UserId(999))),
        Err(MarketError::NotFound { .. })
    ));
}
