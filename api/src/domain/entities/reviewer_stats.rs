//! Reviewer workload statistics

use serde::Serialize;

use super::user::UserId;

/// How many reviewer slots a user currently holds, across all pull requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewerStats {
    pub user_id: UserId,
    pub username: String,
    pub assigned_count: i64,
}
