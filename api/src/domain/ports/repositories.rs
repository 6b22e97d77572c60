//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).
//!
//! Every method reads or writes a fresh snapshot. Absent entities surface as
//! `ErrorCode::NotFound` rule errors rather than `Option`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{
    PullRequest, PullRequestId, ReviewerStats, Team, TeamName, User, UserId,
};
use crate::error::DomainError;

/// Repository for User entities
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert or update users by id (username, team and active flag are overwritten)
    async fn upsert_users(&self, users: &[User]) -> Result<(), DomainError>;

    /// Find a user by ID
    async fn find_by_id(&self, id: &UserId) -> Result<User, DomainError>;

    /// Set the active flag and return the updated user
    async fn set_active(&self, id: &UserId, is_active: bool) -> Result<User, DomainError>;

    /// Active members of `team`, minus any id in `exclude`
    async fn find_active_team_members_except(
        &self,
        team: &TeamName,
        exclude: &[UserId],
    ) -> Result<Vec<User>, DomainError>;
}

/// Repository for Team entities
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Create the team row; fails with `TeamExists` if the name is taken
    async fn create(&self, team: &Team) -> Result<(), DomainError>;

    /// Find a team and all of its members
    async fn find_by_name(&self, name: &TeamName) -> Result<Team, DomainError>;
}

/// Repository for PullRequest entities and their reviewer assignments
#[async_trait]
pub trait PullRequestRepository: Send + Sync {
    /// Persist a pull request with its reviewers; fails with `PrExists` on a duplicate id
    async fn create(&self, pr: &PullRequest) -> Result<(), DomainError>;

    /// Find a pull request with its current reviewers
    async fn find_by_id(&self, id: &PullRequestId) -> Result<PullRequest, DomainError>;

    /// Mark merged, keeping the first merge timestamp if one is already set
    async fn set_merged(
        &self,
        id: &PullRequestId,
        merged_at: DateTime<Utc>,
    ) -> Result<PullRequest, DomainError>;

    /// Atomically swap `old_reviewer` for `new_reviewer`
    ///
    /// Fails with `NotAssigned` and changes nothing if `old_reviewer` is no
    /// longer attached when the swap commits.
    async fn replace_reviewer(
        &self,
        pr_id: &PullRequestId,
        old_reviewer: &UserId,
        new_reviewer: &UserId,
    ) -> Result<PullRequest, DomainError>;

    /// Pull requests (any status) where the user is a reviewer, newest first
    async fn list_by_reviewer(&self, reviewer: &UserId) -> Result<Vec<PullRequest>, DomainError>;

    /// Ids of OPEN pull requests where the user is a reviewer
    async fn find_open_ids_by_reviewer(
        &self,
        reviewer: &UserId,
    ) -> Result<Vec<PullRequestId>, DomainError>;
}

/// Read-only reporting queries
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Assignment count for every user, busiest first
    async fn reviewer_stats(&self) -> Result<Vec<ReviewerStats>, DomainError>;
}
