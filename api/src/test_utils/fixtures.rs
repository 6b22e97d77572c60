//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture function creates a valid entity that can be customized.

use chrono::{TimeZone, Utc};

use crate::domain::entities::{PrStatus, PullRequest, PullRequestId, Team, TeamName, User, UserId};

/// Create an active user in the given team
pub fn test_user(id: &str, team: &str) -> User {
    User {
        id: UserId::from(id),
        username: format!("user-{}", id),
        team_name: TeamName::from(team),
        is_active: true,
    }
}

/// Create a team whose members are all active
pub fn test_team(name: &str, member_ids: &[&str]) -> Team {
    Team {
        name: TeamName::from(name),
        members: member_ids.iter().map(|id| test_user(id, name)).collect(),
    }
}

/// Create an open pull request as if it had already been stored
pub fn test_pull_request(id: &str, author: &str, reviewers: &[&str]) -> PullRequest {
    let mut pr = PullRequest::open(
        PullRequestId::from(id),
        format!("PR {}", id),
        UserId::from(author),
        reviewers.iter().map(|r| UserId::from(*r)).collect(),
    );
    pr.created_at = Some(Utc::now());
    pr
}

/// Create a pull request that was merged at a fixed point in time
pub fn test_merged_pull_request(id: &str, author: &str, reviewers: &[&str]) -> PullRequest {
    let mut pr = test_pull_request(id, author, reviewers);
    pr.status = PrStatus::Merged;
    pr.merged_at = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).single();
    pr
}
