//! `MarketStore` integration tests: typed accessors, schema-level
//! invariants (partial unique indexes), and trail reconciliation queries.

use lancer_core::errors::MarketError;
use lancer_core::types::bid::NewBid;
use lancer_core::types::project::NewProject;
use lancer_core::types::user::{NewUser, Role};
use lancer_core::types::wallet::TransactionKind;
use lancer_core::{Money, SubscriptionPlan, UserId};
use lancer_storage::queries::subscriptions::NewSubscription;
use lancer_storage::queries::{bids, projects, subscriptions, users, wallet};
use lancer_storage::MarketStore;

fn new_user(name: &str, role: Role) -> NewUser {
    NewUser {
        username: name.to_string(),
        email: format!("{name}@example.com"),
        role,
        full_name: None,
        skills: None,
        category: None,
        location: None,
        hourly_rate: Money::ZERO,
    }
}

fn money(cents: i64) -> Money {
    Money::from_cents(cents).unwrap()
}

#[test]
fn fresh_user_has_zero_wallet_and_median_score() {
    let store = MarketStore::open_in_memory().unwrap();
    let id = store
        .with_tx(|conn| Ok(users::insert(conn, &new_user("alice", Role::Client))?))
        .unwrap();

    let user = store.user(id).unwrap();
    assert_eq!(user.wallet_balance, Money::ZERO);
    assert_eq!(user.performance_score, 5.0);
    assert_eq!(user.completed_projects, 0);
    assert!(user.is_active);
}

#[test]
fn unknown_ids_surface_not_found() {
    let store = MarketStore::open_in_memory().unwrap();
    assert!(matches!(store.user(UserId(99)), Err(MarketError::NotFound { .. })));
}

#[test]
fn open_bid_unique_index_blocks_duplicates_but_not_withdrawn() {
    let store = MarketStore::open_in_memory().unwrap();
    let (_client, freelancer, project) = store
        .with_tx(|conn| {
            let client = users::insert(conn, &new_user("client", Role::Client))?;
            let freelancer = users::insert(conn, &new_user("dev", Role::Freelancer))?;
            let project = projects::insert(
                conn,
                client,
                &NewProject {
                    title: "API".into(),
                    description: "build".into(),
                    category: None,
                    skills_required: None,
                    budget_min: money(10_000),
                    budget_max: money(50_000),
                    deadline: None,
                },
            )?;
            Ok((client, freelancer, project))
        })
        .unwrap();

    let bid = NewBid {
        project,
        freelancer,
        amount: money(20_000),
        delivery_days: 10,
        proposal: "plan".into(),
    };

    let first = store.with_tx(|conn| Ok(bids::insert(conn, &bid)?)).unwrap();

    // Same (project, freelancer) while the first is open: the partial
    // unique index rejects the row.
    let dup = store.with_tx(|conn| Ok(bids::insert(conn, &bid)?));
    assert!(dup.is_err());

    // After withdrawing, a new bid is allowed.
    store
        .with_tx(|conn| {
            bids::set_status(conn, first, lancer_core::types::bid::BidStatus::Withdrawn)?;
            Ok(())
        })
        .unwrap();
    store.with_tx(|conn| Ok(bids::insert(conn, &bid)?)).unwrap();
    assert_eq!(store.count_bids_for_project(project).unwrap(), 2);
}

#[test]
fn one_active_subscription_index_holds() {
    let store = MarketStore::open_in_memory().unwrap();
    let user = store
        .with_tx(|conn| Ok(users::insert(conn, &new_user("sub", Role::Freelancer))?))
        .unwrap();

    let start = chrono::Utc::now().date_naive();
    fn annotate<F: for<'a> Fn(&'a str, &'a str) -> NewSubscription<'a>>(f: F) -> F {
        f
    }
    let make = annotate(|invoice: &str, txn: &str| NewSubscription {
        user,
        plan: SubscriptionPlan::Growth,
        payment_method: None,
        amount_paid: money(99_900),
        auto_renew: true,
        start_date: start,
        next_billing_date: start,
        invoice_number: invoice,
        transaction_id: txn,
    });

    store
        .with_tx(|conn| Ok(subscriptions::insert(conn, &make("TR-1", "TXN-1"))?))
        .unwrap();

    // A second ACTIVE row for the same user violates the partial index.
    let second = store.with_tx(|conn| Ok(subscriptions::insert(conn, &make("TR-2", "TXN-2"))?));
    assert!(second.is_err());

    // Cancelling frees the slot.
    store
        .with_tx(|conn| {
            subscriptions::cancel_active(conn, user)?;
            subscriptions::insert(conn, &make("TR-3", "TXN-3"))?;
            Ok(())
        })
        .unwrap();
    assert!(store.active_subscription(user).unwrap().is_some());
}

#[test]
fn signed_sum_ignores_record_only_kinds() {
    let store = MarketStore::open_in_memory().unwrap();
    let user = store
        .with_tx(|conn| Ok(users::insert(conn, &new_user("w", Role::Client))?))
        .unwrap();

    store
        .with_tx(|conn| {
            wallet::append(conn, user, money(1_000), TransactionKind::Credit, "top up")?;
            wallet::append(conn, user, money(300), TransactionKind::Debit, "spend")?;
            wallet::append(conn, user, money(99_900), TransactionKind::Subscription, "plan")?;
            wallet::append(conn, user, money(25), TransactionKind::Commission, "fee")?;
            Ok(())
        })
        .unwrap();

    let sum = store
        .with_read(|conn| wallet::signed_sum(conn, user))
        .unwrap();
    assert_eq!(sum, 700);

    let history = store.wallet_history(user).unwrap();
    assert_eq!(history.len(), 4);
    // Newest-first.
    assert_eq!(history[0].kind, TransactionKind::Commission);
    assert_eq!(history[3].kind, TransactionKind::Credit);
}
