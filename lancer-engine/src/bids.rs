//! Bid submission and withdrawal.

use std::sync::Arc;

use tracing::info;

use lancer_core::errors::{MarketError, MarketResult};
use lancer_core::policy::{allows, Capability};
use lancer_core::types::bid::{Bid, BidStatus, NewBid};
use lancer_core::{BidId, ProjectId, UserId};
use lancer_storage::queries::{bids, projects, users};
use lancer_storage::MarketStore;

use crate::subscription;

pub struct BidManager {
    store: Arc<MarketStore>,
}

impl BidManager {
    pub fn new(store: Arc<MarketStore>) -> Self {
        Self { store }
    }

    /// Submit a bid: duplicate guard, quota gate, and usage increment in
    /// one transaction.
    pub fn submit(&self, bid: &NewBid) -> MarketResult<Bid> {
        self.store.with_tx(|conn| {
            let freelancer = users::get(conn, bid.freelancer)?
                .ok_or(MarketError::not_found("user", bid.freelancer.raw()))?;
            if !allows(freelancer.role, Capability::SubmitBid) {
                return Err(MarketError::Forbidden {
                    role: freelancer.role.as_str(),
                    action: "submit bids",
                });
            }
            projects::get(conn, bid.project)?
                .ok_or(MarketError::not_found("project", bid.project.raw()))?;

            if bids::exists_open(conn, bid.project, bid.freelancer)? {
                return Err(MarketError::DuplicateBid {
                    project: bid.project.raw(),
                    freelancer: bid.freelancer.raw(),
                });
            }

            if let Some((used, quota)) = subscription::quota_usage(conn, bid.freelancer)? {
                return Err(MarketError::BidQuotaExceeded { used, quota });
            }

            let id = bids::insert(conn, bid)?;
            subscription::consume_bid_tx(conn, bid.freelancer)?;

            info!(bid = %id, project = %bid.project, freelancer = %bid.freelancer, "bid submitted");
            bids::get(conn, id)?.ok_or(MarketError::not_found("bid", id.raw()))
        })
    }

    /// Withdraw a pending bid. Resolved bids stay resolved.
    pub fn withdraw(&self, id: BidId) -> MarketResult<()> {
        self.store.with_tx(|conn| {
            let bid = bids::get(conn, id)?.ok_or(MarketError::not_found("bid", id.raw()))?;
            if bid.status != BidStatus::Pending {
                return Err(MarketError::InvalidTransition {
                    entity: "bid",
                    id: id.raw(),
                    from: bid.status.as_str().to_string(),
                    action: "withdraw",
                });
            }
            bids::set_status(conn, id, BidStatus::Withdrawn)?;
            info!(bid = %id, "bid withdrawn");
            Ok(())
        })
    }

    pub fn find(&self, id: BidId) -> MarketResult<Bid> {
        self.store.bid(id)
    }

    pub fn list_by_project(&self, project: ProjectId) -> MarketResult<Vec<Bid>> {
        self.store.bids_by_project(project)
    }

    pub fn list_by_freelancer(&self, freelancer: UserId) -> MarketResult<Vec<Bid>> {
        self.store.bids_by_freelancer(freelancer)
    }

    pub fn count_for_project(&self, project: ProjectId) -> MarketResult<u64> {
        self.store.count_bids_for_project(project)
    }
}
