//! User registry, notification fan-out, and review tests.

use lancer_core::errors::MarketError;
use lancer_core::types::project::NewProject;
use lancer_core::types::user::{NewUser, Role};
use lancer_core::{Money, UserId};
use lancer_engine::Marketplace;

fn market() -> Marketplace {
    Marketplace::open_in_memory().unwrap()
}

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

fn register(market: &Marketplace, name: &str, role: Role) -> UserId {
    market.users.register(&new_user(name, role)).unwrap().id
}

fn money(cents: i64) -> Money {
    Money::from_cents(cents).unwrap()
}

#[test]
fn registration_enforces_unique_username_and_email() {
    let market = market();
    market.users.register(&new_user("alice", Role::Client)).unwrap();

    let same_name = market.users.register(&new_user("alice", Role::Freelancer));
    assert!(matches!(
        same_name,
        Err(MarketError::AlreadyExists { field: "username", .. })
    ));

    let mut same_email = new_user("alice2", Role::Freelancer);
    same_email.email = "alice@example.com".into();
    assert!(matches!(
        market.users.register(&same_email),
        Err(MarketError::AlreadyExists { field: "email", .. })
    ));
}

#[test]
fn lookup_by_username_and_role() {
    let market = market();
    register(&market, "client", Role::Client);
    register(&market, "dev1", Role::Freelancer);
    register(&market, "dev2", Role::Freelancer);

    assert!(market.users.find_by_username("dev1").unwrap().is_some());
    assert!(market.users.find_by_username("nobody").unwrap().is_none());
    assert_eq!(market.users.count_by_role(Role::Freelancer).unwrap(), 2);
    assert_eq!(market.users.list_by_role(Role::Client).unwrap().len(), 1);
}

#[test]
fn posting_notifies_matching_active_freelancers_only() {
    let market = market();
    let client = register(&market, "client", Role::Client);

    let mut rustacean = new_user("rustacean", Role::Freelancer);
    rustacean.skills = Some("rust, sqlite".into());
    let rustacean = market.users.register(&rustacean).unwrap().id;

    let mut painter = new_user("painter", Role::Freelancer);
    painter.skills = Some("watercolor".into());
    let painter = market.users.register(&painter).unwrap().id;

    let mut benched = new_user("benched", Role::Freelancer);
    benched.skills = Some("rust".into());
    let benched = market.users.register(&benched).unwrap().id;
    market.users.set_active(benched, false).unwrap();

    market
        .projects
        .post_project(
            client,
            &NewProject {
                title: "Storage engine".into(),
                description: "embedded db work".into(),
                category: None,
                skills_required: Some("rust, btrees".into()),
                budget_min: money(100_000),
                budget_max: money(300_000),
                deadline: None,
            },
        )
        .unwrap();

    assert_eq!(market.store().unread_notifications(rustacean).unwrap(), 1);
    assert_eq!(market.store().unread_notifications(painter).unwrap(), 0);
    assert_eq!(market.store().unread_notifications(benched).unwrap(), 0);

    let inbox = market.store().notifications_for_user(rustacean).unwrap();
    assert_eq!(inbox.len(), 1);
    assert!(inbox[0].body.contains("Storage engine"));
    assert_eq!(inbox[0].link.as_deref(), Some("/freelancer/browse"));

    market.store().mark_notification_read(inbox[0].id).unwrap();
    assert_eq!(market.store().unread_notifications(rustacean).unwrap(), 0);
}

#[test]
fn reviews_average_and_validate_rating() {
    let market = market();
    let client = register(&market, "client", Role::Client);
    let dev = register(&market, "dev", Role::Freelancer);

    assert!(market.reviews.average_rating(dev).unwrap().is_none());

    market.reviews.post(client, dev, None, 5, Some("great work")).unwrap();
    market.reviews.post(client, dev, None, 4, None).unwrap();
    assert_eq!(market.reviews.average_rating(dev).unwrap(), Some(4.5));
    assert_eq!(market.reviews.list_for_user(dev).unwrap().len(), 2);

    assert!(matches!(
        market.reviews.post(client, dev, None, 0, None),
        Err(MarketError::InvalidRating { .. })
    ));
    assert!(matches!(
        market.reviews.post(client, dev, None, 6, None),
        Err(MarketError::InvalidRating { .. })
    ));
}
