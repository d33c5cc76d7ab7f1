//! The project/milestone orchestrator.
//!
//! Owns the project and milestone state machines. Milestone approval is
//! the settlement point: client debit, freelancer credit minus commission,
//! and the reputation bump all commit in one transaction with the status
//! change. The guard on SUBMITTED is what makes re-approval harmless.

use std::sync::Arc;

use rusqlite::Connection;
use tracing::info;

use lancer_core::errors::{MarketError, MarketResult};
use lancer_core::policy::{allows, Capability};
use lancer_core::types::bid::BidStatus;
use lancer_core::types::milestone::{Milestone, MilestoneStatus};
use lancer_core::types::project::{NewProject, Project, ProjectStatus};
use lancer_core::types::user::MAX_PERFORMANCE_SCORE;
use lancer_core::types::wallet::TransactionKind;
use lancer_core::{BidId, MilestoneId, Money, ProjectId, UserId};
use lancer_storage::queries::{bids, milestones, projects, users};
use lancer_storage::MarketStore;

use crate::{ledger, notify, subscription};

/// Reputation bump on each approved milestone.
const MILESTONE_SCORE_BUMP: f64 = 0.1;

/// Reputation bump on project completion.
const COMPLETION_SCORE_BUMP: f64 = 0.5;

pub struct Orchestrator {
    store: Arc<MarketStore>,
}

impl Orchestrator {
    pub fn new(store: Arc<MarketStore>) -> Self {
        Self { store }
    }

    /// Post a project as `client`: status OPEN, then notification fan-out
    /// to matched active freelancers.
    pub fn post_project(&self, client: UserId, project: &NewProject) -> MarketResult<Project> {
        self.store.with_tx(|conn| {
            let owner = users::get(conn, client)?
                .ok_or(MarketError::not_found("user", client.raw()))?;
            if !allows(owner.role, Capability::PostProject) {
                return Err(MarketError::Forbidden {
                    role: owner.role.as_str(),
                    action: "post projects",
                });
            }

            let id = projects::insert(conn, client, project)?;
            let created =
                projects::get(conn, id)?.ok_or(MarketError::not_found("project", id.raw()))?;
            notify::notify_matched_freelancers(conn, &created)?;
            info!(project = %id, client = %client, "project posted");
            Ok(created)
        })
    }

    /// Accept a bid on an OPEN project.
    ///
    /// Assigns the freelancer, moves the project to IN_PROGRESS, and
    /// resolves every bid on the project in the same transaction: the
    /// accepted one to ACCEPTED, all other pending ones to REJECTED.
    pub fn accept_bid(&self, project_id: ProjectId, bid_id: BidId) -> MarketResult<Project> {
        self.store.with_tx(|conn| {
            let project = projects::get(conn, project_id)?
                .ok_or(MarketError::not_found("project", project_id.raw()))?;
            if project.status != ProjectStatus::Open {
                return Err(MarketError::InvalidTransition {
                    entity: "project",
                    id: project_id.raw(),
                    from: project.status.as_str().to_string(),
                    action: "accept a bid",
                });
            }

            let accepted = bids::get(conn, bid_id)?
                .ok_or(MarketError::not_found("bid", bid_id.raw()))?;
            if accepted.project != project_id {
                return Err(MarketError::not_found("bid", bid_id.raw()));
            }
            if accepted.status != BidStatus::Pending {
                return Err(MarketError::InvalidTransition {
                    entity: "bid",
                    id: bid_id.raw(),
                    from: accepted.status.as_str().to_string(),
                    action: "accept",
                });
            }

            projects::assign_freelancer(conn, project_id, accepted.freelancer)?;
            for bid in bids::list_by_project(conn, project_id)? {
                let status = if bid.id == bid_id {
                    BidStatus::Accepted
                } else if bid.status == BidStatus::Pending {
                    BidStatus::Rejected
                } else {
                    continue; // withdrawn bids stay withdrawn
                };
                bids::set_status(conn, bid.id, status)?;
            }

            info!(project = %project_id, bid = %bid_id, freelancer = %accepted.freelancer,
                  "bid accepted");
            projects::get(conn, project_id)?
                .ok_or(MarketError::not_found("project", project_id.raw()))
        })
    }

    /// Add a milestone: order index = existing count + 1, status PENDING.
    pub fn add_milestone(
        &self,
        project_id: ProjectId,
        title: &str,
        amount: Money,
    ) -> MarketResult<Milestone> {
        self.store.with_tx(|conn| {
            require_live_project(conn, project_id, "add a milestone")?;
            let order_index = milestones::count_for_project(conn, project_id)? + 1;
            let id = milestones::insert(conn, project_id, title, amount, order_index)?;
            milestones::get(conn, id)?.ok_or(MarketError::not_found("milestone", id.raw()))
        })
    }

    /// Submit a milestone for review. PENDING and REJECTED may enter
    /// SUBMITTED (resubmission after rejection is a real flow); SUBMITTED
    /// and APPROVED may not, and nothing moves once the project is
    /// terminal.
    pub fn submit_milestone(&self, id: MilestoneId) -> MarketResult<()> {
        self.store.with_tx(|conn| {
            let milestone =
                milestones::get(conn, id)?.ok_or(MarketError::not_found("milestone", id.raw()))?;
            require_live_project(conn, milestone.project, "submit a milestone")?;
            match milestone.status {
                MilestoneStatus::Pending | MilestoneStatus::Rejected => {
                    milestones::set_status(conn, id, MilestoneStatus::Submitted)?;
                    Ok(())
                }
                other => Err(MarketError::InvalidTransition {
                    entity: "milestone",
                    id: id.raw(),
                    from: other.as_str().to_string(),
                    action: "submit",
                }),
            }
        })
    }

    /// Approve a SUBMITTED milestone and settle it.
    ///
    /// Settlement: debit the client for the full amount, credit the
    /// freelancer the amount minus commission (at the freelancer's tier),
    /// record the withheld commission in the trail, bump reputation. All
    /// of it commits with the APPROVED status or none of it does: an
    /// `InsufficientFunds` failure leaves the milestone SUBMITTED.
    pub fn approve_milestone(&self, id: MilestoneId) -> MarketResult<()> {
        self.store.with_tx(|conn| {
            let milestone =
                milestones::get(conn, id)?.ok_or(MarketError::not_found("milestone", id.raw()))?;
            if milestone.status != MilestoneStatus::Submitted {
                return Err(MarketError::InvalidTransition {
                    entity: "milestone",
                    id: id.raw(),
                    from: milestone.status.as_str().to_string(),
                    action: "approve",
                });
            }

            let project = require_live_project(conn, milestone.project, "approve a milestone")?;
            let freelancer = project.assigned_freelancer.ok_or(MarketError::InvalidTransition {
                entity: "project",
                id: project.id.raw(),
                from: project.status.as_str().to_string(),
                action: "settle without an assigned freelancer",
            })?;

            milestones::set_status(conn, id, MilestoneStatus::Approved)?;

            if !milestone.amount.is_zero() {
                let description = format!("Milestone payment: {}", milestone.title);
                ledger::debit_tx(conn, project.client, milestone.amount, &description)?;

                let bps = subscription::commission_bps_tx(conn, freelancer)?;
                let fee = milestone.amount.commission(bps);
                let payout = milestone.amount.sub(fee).unwrap_or(Money::ZERO);
                if !payout.is_zero() {
                    ledger::credit_tx(conn, freelancer, payout, &description)?;
                }
                if !fee.is_zero() {
                    ledger::record_tx(
                        conn,
                        freelancer,
                        fee,
                        TransactionKind::Commission,
                        &format!("Commission withheld: {}", milestone.title),
                    )?;
                }
                info!(milestone = %id, project = %project.id, amount = %milestone.amount,
                      payout = %payout, fee = %fee, "milestone settled");
            }

            bump_performance(conn, freelancer, MILESTONE_SCORE_BUMP)?;

            // Last approval completes the project.
            if milestones::count_unapproved(conn, milestone.project)? == 0 {
                complete_tx(conn, milestone.project)?;
            }
            Ok(())
        })
    }

    /// Reject a SUBMITTED milestone with feedback for the freelancer.
    pub fn reject_milestone(&self, id: MilestoneId, feedback: &str) -> MarketResult<()> {
        self.store.with_tx(|conn| {
            let milestone =
                milestones::get(conn, id)?.ok_or(MarketError::not_found("milestone", id.raw()))?;
            require_live_project(conn, milestone.project, "reject a milestone")?;
            if milestone.status != MilestoneStatus::Submitted {
                return Err(MarketError::InvalidTransition {
                    entity: "milestone",
                    id: id.raw(),
                    from: milestone.status.as_str().to_string(),
                    action: "reject",
                });
            }
            milestones::set_rejected(conn, id, feedback)?;
            Ok(())
        })
    }

    /// Explicitly complete a project. Idempotent: completing a COMPLETED
    /// project is a no-op; a CANCELLED one is an error.
    pub fn complete_project(&self, id: ProjectId) -> MarketResult<Project> {
        self.store.with_tx(|conn| {
            complete_tx(conn, id)?;
            projects::get(conn, id)?.ok_or(MarketError::not_found("project", id.raw()))
        })
    }

    /// Cancel a project from OPEN or IN_PROGRESS. Terminal.
    pub fn cancel_project(&self, id: ProjectId) -> MarketResult<()> {
        self.store.with_tx(|conn| {
            let project =
                projects::get(conn, id)?.ok_or(MarketError::not_found("project", id.raw()))?;
            match project.status {
                ProjectStatus::Open | ProjectStatus::InProgress => {
                    projects::set_status(conn, id, ProjectStatus::Cancelled)?;
                    info!(project = %id, "project cancelled");
                    Ok(())
                }
                other => Err(MarketError::InvalidTransition {
                    entity: "project",
                    id: id.raw(),
                    from: other.as_str().to_string(),
                    action: "cancel",
                }),
            }
        })
    }

    pub fn find(&self, id: ProjectId) -> MarketResult<Project> {
        self.store.project(id)
    }

    pub fn milestones(&self, project: ProjectId) -> MarketResult<Vec<Milestone>> {
        self.store.milestones_by_project(project)
    }
}

/// Load a project and refuse the action once it is terminal. Milestones on
/// a cancelled or completed project are frozen: no submission, approval,
/// or settlement.
fn require_live_project(
    conn: &Connection,
    id: ProjectId,
    action: &'static str,
) -> MarketResult<Project> {
    let project = projects::get(conn, id)?.ok_or(MarketError::not_found("project", id.raw()))?;
    if project.status.is_terminal() {
        return Err(MarketError::InvalidTransition {
            entity: "project",
            id: id.raw(),
            from: project.status.as_str().to_string(),
            action,
        });
    }
    Ok(project)
}

/// Completion within an open transaction: set COMPLETED, bump the
/// freelancer's completed-project counter and reputation. No-op when
/// already COMPLETED so repeated calls (or the auto-complete path racing
/// an explicit call) never double-count.
fn complete_tx(conn: &Connection, id: ProjectId) -> MarketResult<()> {
    let project = projects::get(conn, id)?.ok_or(MarketError::not_found("project", id.raw()))?;
    match project.status {
        ProjectStatus::Completed => Ok(()),
        ProjectStatus::Cancelled => Err(MarketError::InvalidTransition {
            entity: "project",
            id: id.raw(),
            from: project.status.as_str().to_string(),
            action: "complete",
        }),
        _ => {
            projects::set_status(conn, id, ProjectStatus::Completed)?;
            if let Some(freelancer) = project.assigned_freelancer {
                users::increment_completed_projects(conn, freelancer)?;
                bump_performance(conn, freelancer, COMPLETION_SCORE_BUMP)?;
            }
            info!(project = %id, "project completed");
            Ok(())
        }
    }
}

/// Raise a freelancer's performance score, capped at the maximum.
fn bump_performance(conn: &Connection, user: UserId, delta: f64) -> MarketResult<()> {
    let account = users::get(conn, user)?.ok_or(MarketError::not_found("user", user.raw()))?;
    let score = (account.performance_score + delta).min(MAX_PERFORMANCE_SCORE);
    users::set_performance_score(conn, user, score)?;
    Ok(())
}
