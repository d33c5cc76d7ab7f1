//! `MarketStore`, the single owner of the database connection.
//!
//! Engine services compose query-module calls inside `with_tx` closures;
//! read accessors here cover the lookup surface the outer layers need.
//! No code outside this crate touches a raw `Connection` except through
//! these closures.

use std::path::Path;

use lancer_core::config::MarketConfig;
use lancer_core::errors::{MarketError, MarketResult, StorageError};
use lancer_core::types::bid::Bid;
use lancer_core::types::milestone::Milestone;
use lancer_core::types::notification::Notification;
use lancer_core::types::project::{Project, ProjectStatus};
use lancer_core::types::review::Review;
use lancer_core::types::subscription::{Subscription, SubscriptionStatus};
use lancer_core::types::user::{Role, User};
use lancer_core::types::wallet::WalletTransaction;
use lancer_core::{
    BidId, MilestoneId, Money, NotificationId, ProjectId, SubscriptionId, SubscriptionPlan, UserId,
};

use crate::connection::ConnectionManager;
use crate::queries;

pub struct MarketStore {
    db: ConnectionManager,
}

impl MarketStore {
    /// Open a file-backed store at the given path. Runs migrations.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        Ok(Self { db: ConnectionManager::open(path, 5_000)? })
    }

    /// Open per `MarketConfig`: file-backed when a path is configured,
    /// in-memory otherwise.
    pub fn from_config(config: &MarketConfig) -> Result<Self, StorageError> {
        let db = match &config.storage.path {
            Some(path) => {
                ConnectionManager::open(Path::new(path), config.storage.busy_timeout_ms)?
            }
            None => ConnectionManager::open_in_memory()?,
        };
        Ok(Self { db })
    }

    /// Open an in-memory store (tests, ephemeral runs).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(Self { db: ConnectionManager::open_in_memory()? })
    }

    /// Database file path (None for in-memory).
    pub fn path(&self) -> Option<&Path> {
        self.db.path()
    }

    /// Run a closure inside one atomic write transaction.
    pub fn with_tx<F, T>(&self, f: F) -> MarketResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> MarketResult<T>,
    {
        self.db.with_tx(f)
    }

    /// Raw read access. Prefer the typed accessors below.
    pub fn with_read<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&rusqlite::Connection) -> Result<T, StorageError>,
    {
        self.db.with_read(f)
    }

    // ─── Users ───────────────────────────────────────────────

    pub fn user(&self, id: UserId) -> MarketResult<User> {
        self.db
            .with_read(|conn| queries::users::get(conn, id))?
            .ok_or(MarketError::not_found("user", id.raw()))
    }

    pub fn user_by_username(&self, username: &str) -> MarketResult<Option<User>> {
        Ok(self.db.with_read(|conn| queries::users::get_by_username(conn, username))?)
    }

    pub fn users_by_role(&self, role: Role) -> MarketResult<Vec<User>> {
        Ok(self.db.with_read(|conn| queries::users::list_by_role(conn, role))?)
    }

    pub fn count_users_by_role(&self, role: Role) -> MarketResult<u64> {
        Ok(self.db.with_read(|conn| queries::users::count_by_role(conn, role))?)
    }

    // ─── Projects ────────────────────────────────────────────

    pub fn project(&self, id: ProjectId) -> MarketResult<Project> {
        self.db
            .with_read(|conn| queries::projects::get(conn, id))?
            .ok_or(MarketError::not_found("project", id.raw()))
    }

    pub fn projects_by_status(&self, status: ProjectStatus) -> MarketResult<Vec<Project>> {
        Ok(self.db.with_read(|conn| queries::projects::list_by_status(conn, status))?)
    }

    pub fn projects_by_client(&self, client: UserId) -> MarketResult<Vec<Project>> {
        Ok(self.db.with_read(|conn| queries::projects::list_by_client(conn, client))?)
    }

    pub fn projects_by_freelancer(&self, freelancer: UserId) -> MarketResult<Vec<Project>> {
        Ok(self
            .db
            .with_read(|conn| queries::projects::list_by_freelancer(conn, freelancer))?)
    }

    pub fn count_open_projects(&self) -> MarketResult<u64> {
        Ok(self
            .db
            .with_read(|conn| queries::projects::count_by_status(conn, ProjectStatus::Open))?)
    }

    pub fn count_total_projects(&self) -> MarketResult<u64> {
        Ok(self.db.with_read(queries::projects::count_total)?)
    }

    // ─── Bids ────────────────────────────────────────────────

    pub fn bid(&self, id: BidId) -> MarketResult<Bid> {
        self.db
            .with_read(|conn| queries::bids::get(conn, id))?
            .ok_or(MarketError::not_found("bid", id.raw()))
    }

    pub fn bids_by_project(&self, project: ProjectId) -> MarketResult<Vec<Bid>> {
        Ok(self.db.with_read(|conn| queries::bids::list_by_project(conn, project))?)
    }

    pub fn bids_by_freelancer(&self, freelancer: UserId) -> MarketResult<Vec<Bid>> {
        Ok(self.db.with_read(|conn| queries::bids::list_by_freelancer(conn, freelancer))?)
    }

    pub fn count_bids_for_project(&self, project: ProjectId) -> MarketResult<u64> {
        Ok(self.db.with_read(|conn| queries::bids::count_for_project(conn, project))?)
    }

    // ─── Milestones ──────────────────────────────────────────

    pub fn milestone(&self, id: MilestoneId) -> MarketResult<Milestone> {
        self.db
            .with_read(|conn| queries::milestones::get(conn, id))?
            .ok_or(MarketError::not_found("milestone", id.raw()))
    }

    pub fn milestones_by_project(&self, project: ProjectId) -> MarketResult<Vec<Milestone>> {
        Ok(self
            .db
            .with_read(|conn| queries::milestones::list_by_project(conn, project))?)
    }

    // ─── Subscriptions ───────────────────────────────────────

    pub fn subscription(&self, id: SubscriptionId) -> MarketResult<Subscription> {
        self.db
            .with_read(|conn| queries::subscriptions::get(conn, id))?
            .ok_or(MarketError::not_found("subscription", id.raw()))
    }

    pub fn active_subscription(&self, user: UserId) -> MarketResult<Option<Subscription>> {
        Ok(self.db.with_read(|conn| queries::subscriptions::find_active(conn, user))?)
    }

    pub fn count_subscriptions(&self, status: SubscriptionStatus) -> MarketResult<u64> {
        Ok(self
            .db
            .with_read(|conn| queries::subscriptions::count_by_status(conn, status))?)
    }

    pub fn count_active_by_plan(&self, plan: SubscriptionPlan) -> MarketResult<u64> {
        Ok(self
            .db
            .with_read(|conn| queries::subscriptions::count_active_by_plan(conn, plan))?)
    }

    /// Monthly revenue: sum of amount paid across ACTIVE subscriptions.
    pub fn monthly_revenue(&self) -> MarketResult<Money> {
        let cents = self.db.with_read(queries::subscriptions::sum_active_revenue)?;
        Money::from_cents(cents)
            .ok_or_else(|| StorageError::corrupt("subscriptions", "negative revenue sum").into())
    }

    pub fn subscriptions_by_status(
        &self,
        status: SubscriptionStatus,
    ) -> MarketResult<Vec<Subscription>> {
        Ok(self
            .db
            .with_read(|conn| queries::subscriptions::list_by_status(conn, status))?)
    }

    // ─── Wallet ──────────────────────────────────────────────

    pub fn wallet_history(&self, user: UserId) -> MarketResult<Vec<WalletTransaction>> {
        Ok(self.db.with_read(|conn| queries::wallet::history(conn, user))?)
    }

    // ─── Notifications ───────────────────────────────────────

    pub fn notifications_for_user(&self, user: UserId) -> MarketResult<Vec<Notification>> {
        Ok(self.db.with_read(|conn| queries::notifications::list_for_user(conn, user))?)
    }

    pub fn unread_notifications(&self, user: UserId) -> MarketResult<u64> {
        Ok(self.db.with_read(|conn| queries::notifications::unread_count(conn, user))?)
    }

    pub fn mark_notification_read(&self, id: NotificationId) -> MarketResult<()> {
        self.db.with_tx(|conn| Ok(queries::notifications::mark_read(conn, id)?))
    }

    pub fn mark_all_notifications_read(&self, user: UserId) -> MarketResult<usize> {
        self.db.with_tx(|conn| Ok(queries::notifications::mark_all_read(conn, user)?))
    }

    // ─── Reviews ─────────────────────────────────────────────

    pub fn reviews_for_user(&self, reviewee: UserId) -> MarketResult<Vec<Review>> {
        Ok(self.db.with_read(|conn| queries::reviews::list_for_reviewee(conn, reviewee))?)
    }

    pub fn average_rating(&self, reviewee: UserId) -> MarketResult<Option<f64>> {
        Ok(self.db.with_read(|conn| queries::reviews::average_rating(conn, reviewee))?)
    }
}
