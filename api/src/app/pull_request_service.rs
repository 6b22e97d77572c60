//! Pull Request Service
//!
//! Owns the pull request lifecycle:
//! - Creation with automatic reviewer assignment from the author's team
//! - Idempotent merge
//! - Reviewer reassignment under the exclusion rules
//!
//! Every decision is made from a snapshot read at the start of the call.
//! The only cross-request guarantee is the repository's atomic swap in
//! `replace_reviewer`.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;

use super::reviewer_selection::ReviewerPicker;
use crate::domain::entities::{PullRequest, PullRequestId, UserId, MAX_REVIEWERS};
use crate::domain::ports::{PullRequestRepository, RandomSource, UserRepository};
use crate::error::{require_non_empty, DomainError, ErrorCode};

/// Result of a successful reassignment
#[derive(Debug, Clone)]
pub struct ReassignResult {
    pub pr: PullRequest,
    pub replaced_by: UserId,
}

/// Service for creating, merging and reassigning pull requests
pub struct PullRequestService<UR, PRR, RS>
where
    UR: UserRepository,
    PRR: PullRequestRepository,
    RS: RandomSource,
{
    users: Arc<UR>,
    prs: Arc<PRR>,
    picker: ReviewerPicker<RS>,
}

impl<UR, PRR, RS> PullRequestService<UR, PRR, RS>
where
    UR: UserRepository,
    PRR: PullRequestRepository,
    RS: RandomSource,
{
    pub fn new(users: Arc<UR>, prs: Arc<PRR>, random: Arc<RS>) -> Self {
        Self {
            users,
            prs,
            picker: ReviewerPicker::new(random),
        }
    }

    /// Create an open pull request with up to two reviewers from the author's team
    pub async fn create(
        &self,
        id: &PullRequestId,
        name: &str,
        author_id: &UserId,
    ) -> Result<PullRequest, DomainError> {
        require_non_empty("pull_request_id", id.as_str())?;
        require_non_empty("pull_request_name", name)?;
        require_non_empty("author_id", author_id.as_str())?;

        let author = self.users.find_by_id(author_id).await.inspect_err(|e| {
            tracing::error!(author_id = %author_id, error = %e, "get author for pr");
        })?;

        let candidates = self
            .users
            .find_active_team_members_except(&author.team_name, std::slice::from_ref(&author.id))
            .await
            .inspect_err(|e| {
                tracing::error!(team = %author.team_name, error = %e, "get candidates for pr reviewers");
            })?;

        let reviewers = self.picker.pick_reviewers(&candidates, MAX_REVIEWERS);
        let pr = PullRequest::open(id.clone(), name, author.id, reviewers);
        pr.validate()?;

        self.prs.create(&pr).await.inspect_err(|e| {
            tracing::error!(pr_id = %id, author_id = %author_id, error = %e, "create pr");
        })?;

        tracing::info!(
            pr_id = %id,
            reviewers = ?pr.assigned_reviewers,
            "pull request created"
        );

        self.prs.find_by_id(id).await
    }

    /// Mark a pull request merged; merging twice keeps the first timestamp
    pub async fn merge(&self, id: &PullRequestId) -> Result<PullRequest, DomainError> {
        require_non_empty("pull_request_id", id.as_str())?;

        self.prs.set_merged(id, Utc::now()).await.inspect_err(|e| {
            tracing::error!(pr_id = %id, error = %e, "merge pr");
        })
    }

    /// Replace one reviewer on an open pull request
    ///
    /// The replacement is an active member of the old reviewer's team who is
    /// neither the author nor already reviewing this PR. If nobody qualifies
    /// the call fails with `NoCandidate` and the old reviewer stays attached.
    pub async fn reassign_reviewer(
        &self,
        pr_id: &PullRequestId,
        old_reviewer_id: &UserId,
    ) -> Result<ReassignResult, DomainError> {
        require_non_empty("pull_request_id", pr_id.as_str())?;
        require_non_empty("old_user_id", old_reviewer_id.as_str())?;

        let pr = self.prs.find_by_id(pr_id).await.inspect_err(|e| {
            tracing::error!(pr_id = %pr_id, error = %e, "get pr before reassign");
        })?;

        if pr.is_merged() {
            return Err(DomainError::rule(
                ErrorCode::PrMerged,
                "cannot reassign on merged PR",
            ));
        }

        if !pr.has_reviewer(old_reviewer_id) {
            return Err(DomainError::rule(
                ErrorCode::NotAssigned,
                "reviewer is not assigned to this PR",
            ));
        }

        let old_reviewer = self.users.find_by_id(old_reviewer_id).await.inspect_err(|e| {
            tracing::error!(user_id = %old_reviewer_id, error = %e, "get old reviewer for reassign");
        })?;

        let exclude = exclusion_set(&pr, old_reviewer_id);

        let candidates = self
            .users
            .find_active_team_members_except(&old_reviewer.team_name, &exclude)
            .await
            .inspect_err(|e| {
                tracing::error!(team = %old_reviewer.team_name, error = %e, "get candidates for reassign");
            })?;

        let Some(new_reviewer_id) = self.picker.pick_reviewers(&candidates, 1).pop() else {
            return Err(DomainError::rule(
                ErrorCode::NoCandidate,
                "no active replacement candidate in team",
            ));
        };

        let updated = self
            .prs
            .replace_reviewer(pr_id, old_reviewer_id, &new_reviewer_id)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    pr_id = %pr_id,
                    old_reviewer_id = %old_reviewer_id,
                    new_reviewer_id = %new_reviewer_id,
                    error = %e,
                    "replace reviewer"
                );
            })?;

        tracing::info!(
            pr_id = %pr_id,
            old_reviewer_id = %old_reviewer_id,
            new_reviewer_id = %new_reviewer_id,
            "reviewer reassigned"
        );

        Ok(ReassignResult {
            pr: updated,
            replaced_by: new_reviewer_id,
        })
    }
}

/// Ids that may not replace `old_reviewer`: the author and every current reviewer
fn exclusion_set(pr: &PullRequest, old_reviewer: &UserId) -> Vec<UserId> {
    let mut exclude: BTreeSet<UserId> = pr.assigned_reviewers.iter().cloned().collect();
    exclude.insert(old_reviewer.clone());
    exclude.insert(pr.author_id.clone());
    exclude.into_iter().collect()
}
