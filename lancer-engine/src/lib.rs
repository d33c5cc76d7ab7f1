//! # lancer-engine
//!
//! Business services for the Lancer marketplace: the wallet ledger,
//! subscription billing, bid management, and the project/milestone
//! orchestrator. Each public operation runs as one atomic storage
//! transaction: it either fully succeeds or leaves no visible change.

pub mod bids;
pub mod ledger;
pub mod notify;
pub mod orchestrator;
pub mod reviews;
pub mod subscription;
pub mod users;

use std::path::Path;
use std::sync::Arc;

use lancer_core::config::MarketConfig;
use lancer_core::errors::StorageError;
use lancer_storage::MarketStore;

pub use bids::BidManager;
pub use ledger::Ledger;
pub use orchestrator::Orchestrator;
pub use reviews::ReviewBook;
pub use subscription::SubscriptionManager;
pub use users::UserRegistry;

/// The wired-up engine: every service sharing one store.
pub struct Marketplace {
    store: Arc<MarketStore>,
    pub users: UserRegistry,
    pub ledger: Ledger,
    pub subscriptions: SubscriptionManager,
    pub bids: BidManager,
    pub projects: Orchestrator,
    pub reviews: ReviewBook,
}

impl Marketplace {
    fn wire(store: MarketStore, config: &MarketConfig) -> Self {
        let store = Arc::new(store);
        let subscriptions =
            SubscriptionManager::new(Arc::clone(&store), config.billing.cycle_months);
        Self {
            users: UserRegistry::new(Arc::clone(&store)),
            ledger: Ledger::new(Arc::clone(&store)),
            bids: BidManager::new(Arc::clone(&store)),
            projects: Orchestrator::new(Arc::clone(&store)),
            reviews: ReviewBook::new(Arc::clone(&store)),
            subscriptions,
            store,
        }
    }

    /// Open per config (file-backed or in-memory).
    pub fn from_config(config: &MarketConfig) -> Result<Self, StorageError> {
        Ok(Self::wire(MarketStore::from_config(config)?, config))
    }

    /// Open a file-backed marketplace with default config.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        Ok(Self::wire(MarketStore::open(path)?, &MarketConfig::default()))
    }

    /// Open an in-memory marketplace (tests, ephemeral runs).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(Self::wire(MarketStore::open_in_memory()?, &MarketConfig::default()))
    }

    /// The shared store, for read accessors.
    pub fn store(&self) -> &MarketStore {
        &self.store
    }
}
