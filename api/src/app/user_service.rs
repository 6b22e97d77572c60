//! User Service

use std::sync::Arc;

use crate::domain::entities::{PullRequest, User, UserId};
use crate::domain::ports::{PullRequestRepository, UserRepository};
use crate::error::{require_non_empty, DomainError};

pub struct UserService<UR, PRR>
where
    UR: UserRepository,
    PRR: PullRequestRepository,
{
    users: Arc<UR>,
    prs: Arc<PRR>,
}

impl<UR, PRR> UserService<UR, PRR>
where
    UR: UserRepository,
    PRR: PullRequestRepository,
{
    pub fn new(users: Arc<UR>, prs: Arc<PRR>) -> Self {
        Self { users, prs }
    }

    /// Toggle a user's active flag. Existing reviews are left as they are.
    pub async fn set_is_active(&self, id: &UserId, is_active: bool) -> Result<User, DomainError> {
        require_non_empty("user_id", id.as_str())?;

        self.users.set_active(id, is_active).await.inspect_err(|e| {
            tracing::error!(user_id = %id, is_active, error = %e, "set user is_active");
        })
    }

    /// Every pull request the user is reviewing, newest first
    pub async fn list_review_prs(
        &self,
        id: &UserId,
    ) -> Result<(User, Vec<PullRequest>), DomainError> {
        require_non_empty("user_id", id.as_str())?;

        let user = self.users.find_by_id(id).await.inspect_err(|e| {
            tracing::error!(user_id = %id, error = %e, "get user before list reviews");
        })?;

        let prs = self.prs.list_by_reviewer(id).await.inspect_err(|e| {
            tracing::error!(user_id = %id, error = %e, "list prs by reviewer");
        })?;

        Ok((user, prs))
    }
}
