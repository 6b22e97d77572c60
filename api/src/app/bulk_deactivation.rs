//! Bulk Deactivation Service
//!
//! Deactivates several team members at once and moves their open reviews to
//! the remaining active members.
//!
//! The batch is a sequence of independently committed steps, not one
//! transaction. A PR with nobody left to take it over is reported in
//! `not_reassigned` and the batch carries on; any other failure aborts the
//! batch, and everything committed before it stays committed.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use super::pull_request_service::PullRequestService;
use crate::domain::entities::{PullRequestId, TeamName, UserId};
use crate::domain::ports::{PullRequestRepository, RandomSource, TeamRepository, UserRepository};
use crate::error::{require_non_empty, DomainError, ErrorCode};

/// A PR whose reviewer could not be replaced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotReassigned {
    pub pull_request_id: PullRequestId,
    pub user_id: UserId,
    pub reason: &'static str,
}

/// Summary of a bulk deactivation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkDeactivateResult {
    pub team_name: TeamName,
    pub deactivated_user_ids: Vec<UserId>,
    pub reassigned_count: usize,
    pub not_reassigned: Vec<NotReassigned>,
}

/// Non-fatal outcome of one per-PR reassignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReassignOutcome {
    Reassigned { replaced_by: UserId },
    NotReassigned { reason: ErrorCode },
}

impl ReassignOutcome {
    /// Split a reassignment result into a recordable outcome or a fatal error
    ///
    /// Only `NoCandidate` is downgraded; everything else stays an error.
    pub fn classify<T>(
        result: Result<T, DomainError>,
        replaced_by: impl FnOnce(T) -> UserId,
    ) -> Result<Self, DomainError> {
        match result {
            Ok(value) => Ok(ReassignOutcome::Reassigned {
                replaced_by: replaced_by(value),
            }),
            Err(e) if e.is(ErrorCode::NoCandidate) => Ok(ReassignOutcome::NotReassigned {
                reason: ErrorCode::NoCandidate,
            }),
            Err(e) => Err(e),
        }
    }
}

impl BulkDeactivateResult {
    pub fn new(team_name: TeamName) -> Self {
        Self {
            team_name,
            deactivated_user_ids: Vec::new(),
            reassigned_count: 0,
            not_reassigned: Vec::new(),
        }
    }

    /// Fold one per-PR outcome into the summary
    pub fn record(&mut self, pr_id: PullRequestId, user_id: &UserId, outcome: ReassignOutcome) {
        match outcome {
            ReassignOutcome::Reassigned { .. } => self.reassigned_count += 1,
            ReassignOutcome::NotReassigned { reason } => self.not_reassigned.push(NotReassigned {
                pull_request_id: pr_id,
                user_id: user_id.clone(),
                reason: reason.as_str(),
            }),
        }
    }
}

/// Orchestrates deactivation plus cascading reassignment
pub struct BulkDeactivationService<UR, TR, PRR, RS>
where
    UR: UserRepository,
    TR: TeamRepository,
    PRR: PullRequestRepository,
    RS: RandomSource,
{
    users: Arc<UR>,
    teams: Arc<TR>,
    prs: Arc<PRR>,
    reassigner: Arc<PullRequestService<UR, PRR, RS>>,
}

impl<UR, TR, PRR, RS> BulkDeactivationService<UR, TR, PRR, RS>
where
    UR: UserRepository,
    TR: TeamRepository,
    PRR: PullRequestRepository,
    RS: RandomSource,
{
    pub fn new(
        users: Arc<UR>,
        teams: Arc<TR>,
        prs: Arc<PRR>,
        reassigner: Arc<PullRequestService<UR, PRR, RS>>,
    ) -> Self {
        Self {
            users,
            teams,
            prs,
            reassigner,
        }
    }

    /// Deactivate `user_ids` (in the given order) and reassign their open reviews
    pub async fn deactivate_members(
        &self,
        team_name: &TeamName,
        user_ids: &[UserId],
    ) -> Result<BulkDeactivateResult, DomainError> {
        require_non_empty("team_name", team_name.as_str())?;
        for (i, uid) in user_ids.iter().enumerate() {
            require_non_empty(&format!("user_ids[{}]", i), uid.as_str())?;
        }

        self.teams.find_by_name(team_name).await.inspect_err(|e| {
            tracing::error!(team = %team_name, error = %e, "get team before bulk deactivate");
        })?;

        let mut result = BulkDeactivateResult::new(team_name.clone());
        let mut seen = HashSet::with_capacity(user_ids.len());

        for uid in user_ids.iter().filter(|uid| seen.insert(*uid)) {
            self.users.set_active(uid, false).await.inspect_err(|e| {
                tracing::error!(team = %team_name, user_id = %uid, error = %e, "deactivate user");
            })?;
            result.deactivated_user_ids.push(uid.clone());

            let pr_ids = self.prs.find_open_ids_by_reviewer(uid).await.inspect_err(|e| {
                tracing::error!(user_id = %uid, error = %e, "get open prs for reviewer");
            })?;

            for pr_id in pr_ids {
                let attempt = self.reassigner.reassign_reviewer(&pr_id, uid).await;
                let outcome = ReassignOutcome::classify(attempt, |r| r.replaced_by)
                    .inspect_err(|e| {
                        tracing::error!(
                            team = %team_name,
                            pr_id = %pr_id,
                            user_id = %uid,
                            error = %e,
                            "bulk reassignment aborted"
                        );
                    })?;

                match &outcome {
                    ReassignOutcome::Reassigned { replaced_by } => {
                        tracing::debug!(pr_id = %pr_id, user_id = %uid, replaced_by = %replaced_by, "review moved");
                    }
                    ReassignOutcome::NotReassigned { reason } => {
                        tracing::warn!(pr_id = %pr_id, user_id = %uid, reason = %reason, "reviewer left in place");
                    }
                }
                result.record(pr_id, uid, outcome);
            }
        }

        tracing::info!(
            team = %team_name,
            deactivated = result.deactivated_user_ids.len(),
            reassigned = result.reassigned_count,
            not_reassigned = result.not_reassigned.len(),
            "bulk deactivation finished"
        );

        Ok(result)
    }
}
