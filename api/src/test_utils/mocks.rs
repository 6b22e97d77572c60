//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::domain::entities::{
    PrStatus, PullRequest, PullRequestId, ReviewerStats, Team, TeamName, User, UserId,
};
use crate::domain::ports::{
    PullRequestRepository, RandomSource, StatsRepository, TeamRepository, UserRepository,
};
use crate::error::{DomainError, ErrorCode};

type UserMap = Arc<RwLock<HashMap<UserId, User>>>;
type PullRequestMap = Arc<RwLock<HashMap<PullRequestId, PullRequest>>>;

// ============================================================================
// In-Memory User Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: UserMap,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a user for testing
    pub fn with_user(self, user: User) -> Self {
        self.users.write().unwrap().insert(user.id.clone(), user);
        self
    }

    /// Pre-populate with every member of a team
    pub fn with_team_members(self, team: &Team) -> Self {
        team.members
            .iter()
            .cloned()
            .fold(self, |repo, user| repo.with_user(user))
    }

    /// Direct lookup for assertions
    pub fn get(&self, id: &UserId) -> Option<User> {
        self.users.read().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn upsert_users(&self, users: &[User]) -> Result<(), DomainError> {
        let mut stored = self.users.write().unwrap();
        for user in users {
            stored.insert(user.id.clone(), user.clone());
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<User, DomainError> {
        self.get(id)
            .ok_or_else(|| DomainError::not_found("user not found"))
    }

    async fn set_active(&self, id: &UserId, is_active: bool) -> Result<User, DomainError> {
        let mut users = self.users.write().unwrap();
        let user = users
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found("user not found"))?;
        user.is_active = is_active;
        Ok(user.clone())
    }

    async fn find_active_team_members_except(
        &self,
        team: &TeamName,
        exclude: &[UserId],
    ) -> Result<Vec<User>, DomainError> {
        let users = self.users.read().unwrap();
        let mut members: Vec<User> = users
            .values()
            .filter(|u| &u.team_name == team && u.is_active && !exclude.contains(&u.id))
            .cloned()
            .collect();
        members.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(members)
    }
}

// ============================================================================
// In-Memory Team Repository
// ============================================================================

/// Team names are stored here; membership is read from the shared user map
pub struct InMemoryTeamRepository {
    teams: Arc<RwLock<HashSet<TeamName>>>,
    users: UserMap,
}

impl InMemoryTeamRepository {
    /// Build a team repository that sees the same users as `users`
    pub fn sharing(users: &InMemoryUserRepository) -> Self {
        Self {
            teams: Arc::default(),
            users: users.users.clone(),
        }
    }

    pub fn with_team(self, name: &TeamName) -> Self {
        self.teams.write().unwrap().insert(name.clone());
        self
    }
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    async fn create(&self, team: &Team) -> Result<(), DomainError> {
        let mut teams = self.teams.write().unwrap();
        if !teams.insert(team.name.clone()) {
            return Err(DomainError::rule(ErrorCode::TeamExists, "team already exists"));
        }
        Ok(())
    }

    async fn find_by_name(&self, name: &TeamName) -> Result<Team, DomainError> {
        if !self.teams.read().unwrap().contains(name) {
            return Err(DomainError::not_found("team not found"));
        }

        let users = self.users.read().unwrap();
        let mut members: Vec<User> = users
            .values()
            .filter(|u| &u.team_name == name)
            .cloned()
            .collect();
        members.sort_by(|a, b| a.id.cmp(&b.id));

        Ok(Team {
            name: name.clone(),
            members,
        })
    }
}

// ============================================================================
// In-Memory Pull Request Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryPullRequestRepository {
    prs: PullRequestMap,
    failing_replace: HashSet<PullRequestId>,
    vanishing_reviewer: bool,
    racing_replacement: bool,
}

impl InMemoryPullRequestRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a pull request for testing
    pub fn with_pull_request(self, pr: PullRequest) -> Self {
        self.prs.write().unwrap().insert(pr.id.clone(), pr);
        self
    }

    /// `replace_reviewer` on this PR fails like an unavailable database
    pub fn failing_replace_for(mut self, pr_id: &str) -> Self {
        self.failing_replace.insert(PullRequestId::from(pr_id));
        self
    }

    /// Simulate a concurrent request removing the old reviewer just before
    /// `replace_reviewer` commits
    pub fn with_vanishing_reviewer(mut self) -> Self {
        self.vanishing_reviewer = true;
        self
    }

    /// Simulate a concurrent swap attaching the same replacement first
    pub fn with_racing_replacement(mut self) -> Self {
        self.racing_replacement = true;
        self
    }
}

#[async_trait]
impl PullRequestRepository for InMemoryPullRequestRepository {
    async fn create(&self, pr: &PullRequest) -> Result<(), DomainError> {
        let mut prs = self.prs.write().unwrap();
        if prs.contains_key(&pr.id) {
            return Err(DomainError::rule(
                ErrorCode::PrExists,
                "pull request already exists",
            ));
        }

        let mut stored = pr.clone();
        stored.created_at.get_or_insert_with(Utc::now);
        prs.insert(stored.id.clone(), stored);
        Ok(())
    }

    async fn find_by_id(&self, id: &PullRequestId) -> Result<PullRequest, DomainError> {
        self.prs
            .read()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("pull request not found"))
    }

    async fn set_merged(
        &self,
        id: &PullRequestId,
        merged_at: DateTime<Utc>,
    ) -> Result<PullRequest, DomainError> {
        let mut prs = self.prs.write().unwrap();
        let pr = prs
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found("pull request not found"))?;
        pr.status = PrStatus::Merged;
        pr.merged_at.get_or_insert(merged_at);
        Ok(pr.clone())
    }

    async fn replace_reviewer(
        &self,
        pr_id: &PullRequestId,
        old_reviewer: &UserId,
        new_reviewer: &UserId,
    ) -> Result<PullRequest, DomainError> {
        if self.failing_replace.contains(pr_id) {
            return Err(DomainError::Database("connection reset".to_string()));
        }

        let mut prs = self.prs.write().unwrap();
        let pr = prs
            .get_mut(pr_id)
            .ok_or_else(|| DomainError::not_found("pull request not found"))?;

        if self.vanishing_reviewer {
            pr.assigned_reviewers.retain(|r| r != old_reviewer);
        }

        if !pr.has_reviewer(old_reviewer) {
            return Err(DomainError::rule(
                ErrorCode::NotAssigned,
                "reviewer is not assigned to this pull request",
            ));
        }
        if self.racing_replacement || pr.has_reviewer(new_reviewer) {
            return Err(DomainError::rule(
                ErrorCode::NoCandidate,
                "replacement reviewer is already assigned to this pull request",
            ));
        }

        pr.assigned_reviewers.retain(|r| r != old_reviewer);
        pr.assigned_reviewers.push(new_reviewer.clone());
        Ok(pr.clone())
    }

    async fn list_by_reviewer(&self, reviewer: &UserId) -> Result<Vec<PullRequest>, DomainError> {
        let prs = self.prs.read().unwrap();
        let mut result: Vec<PullRequest> = prs
            .values()
            .filter(|pr| pr.has_reviewer(reviewer))
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(result)
    }

    async fn find_open_ids_by_reviewer(
        &self,
        reviewer: &UserId,
    ) -> Result<Vec<PullRequestId>, DomainError> {
        let prs = self.prs.read().unwrap();
        let mut ids: Vec<PullRequestId> = prs
            .values()
            .filter(|pr| pr.status == PrStatus::Open && pr.has_reviewer(reviewer))
            .map(|pr| pr.id.clone())
            .collect();
        ids.sort();
        Ok(ids)
    }
}

// ============================================================================
// In-Memory Stats Repository
// ============================================================================

pub struct InMemoryStatsRepository {
    users: UserMap,
    prs: PullRequestMap,
}

impl InMemoryStatsRepository {
    pub fn new(users: &InMemoryUserRepository, prs: &InMemoryPullRequestRepository) -> Self {
        Self {
            users: users.users.clone(),
            prs: prs.prs.clone(),
        }
    }
}

#[async_trait]
impl StatsRepository for InMemoryStatsRepository {
    async fn reviewer_stats(&self) -> Result<Vec<ReviewerStats>, DomainError> {
        let users = self.users.read().unwrap();
        let prs = self.prs.read().unwrap();

        let mut stats: Vec<ReviewerStats> = users
            .values()
            .map(|u| ReviewerStats {
                user_id: u.id.clone(),
                username: u.username.clone(),
                assigned_count: prs.values().filter(|pr| pr.has_reviewer(&u.id)).count() as i64,
            })
            .collect();
        stats.sort_by(|a, b| {
            b.assigned_count
                .cmp(&a.assigned_count)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        Ok(stats)
    }
}

// ============================================================================
// Scripted Randomness
// ============================================================================

/// Replays a fixed script of indices, cycling when it runs out
#[derive(Default)]
pub struct SequenceRandomSource {
    script: Vec<usize>,
    cursor: AtomicUsize,
}

impl SequenceRandomSource {
    pub fn new(script: Vec<usize>) -> Self {
        Self {
            script,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Number of indices handed out so far
    pub fn draws(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }
}

impl RandomSource for SequenceRandomSource {
    fn next_index(&self, upper: usize) -> usize {
        let n = self.cursor.fetch_add(1, Ordering::SeqCst);
        match self.script.len() {
            0 => 0,
            len => self.script[n % len] % upper,
        }
    }
}
