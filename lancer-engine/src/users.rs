//! User registration and account administration.

use std::sync::Arc;

use tracing::info;

use lancer_core::errors::{MarketError, MarketResult};
use lancer_core::types::user::{NewUser, Role, User};
use lancer_core::UserId;
use lancer_storage::queries::users;
use lancer_storage::MarketStore;

pub struct UserRegistry {
    store: Arc<MarketStore>,
}

impl UserRegistry {
    pub fn new(store: Arc<MarketStore>) -> Self {
        Self { store }
    }

    /// Register a new account. Username and email must be unique.
    /// Wallet starts at zero, performance at 5.0.
    pub fn register(&self, user: &NewUser) -> MarketResult<User> {
        self.store.with_tx(|conn| {
            if users::exists_username(conn, &user.username)? {
                return Err(MarketError::AlreadyExists {
                    field: "username",
                    value: user.username.clone(),
                });
            }
            if users::exists_email(conn, &user.email)? {
                return Err(MarketError::AlreadyExists {
                    field: "email",
                    value: user.email.clone(),
                });
            }
            let id = users::insert(conn, user)?;
            info!(user = %id, username = %user.username, role = user.role.as_str(),
                  "user registered");
            users::get(conn, id)?.ok_or(MarketError::not_found("user", id.raw()))
        })
    }

    pub fn find(&self, id: UserId) -> MarketResult<User> {
        self.store.user(id)
    }

    pub fn find_by_username(&self, username: &str) -> MarketResult<Option<User>> {
        self.store.user_by_username(username)
    }

    pub fn list_by_role(&self, role: Role) -> MarketResult<Vec<User>> {
        self.store.users_by_role(role)
    }

    pub fn count_by_role(&self, role: Role) -> MarketResult<u64> {
        self.store.count_users_by_role(role)
    }

    /// Enable or disable an account (admin action). Inactive freelancers
    /// drop out of notification fan-out.
    pub fn set_active(&self, id: UserId, active: bool) -> MarketResult<()> {
        self.store.with_tx(|conn| {
            users::get(conn, id)?.ok_or(MarketError::not_found("user", id.raw()))?;
            users::set_active(conn, id, active)?;
            Ok(())
        })
    }
}
