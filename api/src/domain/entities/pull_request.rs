//! Pull request domain entity
//!
//! A pull request carries up to [`MAX_REVIEWERS`] distinct reviewers drawn
//! from the author's team. Once merged, its reviewer set is frozen.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserId;
use crate::error::{require_non_empty, DomainError};

/// Upper bound on reviewers attached to one pull request
pub const MAX_REVIEWERS: usize = 2;

/// Opaque pull request identifier, supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PullRequestId(pub String);

impl PullRequestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PullRequestId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PullRequestId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PullRequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pull request status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PrStatus {
    Open,
    Merged,
}

impl std::fmt::Display for PrStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrStatus::Open => write!(f, "OPEN"),
            PrStatus::Merged => write!(f, "MERGED"),
        }
    }
}

impl std::str::FromStr for PrStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(PrStatus::Open),
            "MERGED" => Ok(PrStatus::Merged),
            _ => Err(DomainError::validation("status", "must be OPEN or MERGED")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequest {
    pub id: PullRequestId,
    pub name: String,
    pub author_id: UserId,
    pub status: PrStatus,
    pub assigned_reviewers: Vec<UserId>,
    /// Set by storage on insert; absent on a not-yet-persisted PR
    pub created_at: Option<DateTime<Utc>>,
    pub merged_at: Option<DateTime<Utc>>,
}

impl PullRequest {
    /// A fresh, open pull request with the given reviewers
    pub fn open(
        id: PullRequestId,
        name: impl Into<String>,
        author_id: UserId,
        reviewers: Vec<UserId>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            author_id,
            status: PrStatus::Open,
            assigned_reviewers: reviewers,
            created_at: None,
            merged_at: None,
        }
    }

    pub fn is_merged(&self) -> bool {
        self.status == PrStatus::Merged
    }

    pub fn has_reviewer(&self, user_id: &UserId) -> bool {
        self.assigned_reviewers.contains(user_id)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        require_non_empty("pull_request_id", self.id.as_str())?;
        require_non_empty("pull_request_name", &self.name)?;
        require_non_empty("author_id", self.author_id.as_str())?;

        if self.assigned_reviewers.len() > MAX_REVIEWERS {
            return Err(DomainError::validation(
                "assigned_reviewers",
                format!("must contain at most {} reviewers", MAX_REVIEWERS),
            ));
        }

        let mut seen = HashSet::with_capacity(self.assigned_reviewers.len());
        for (i, reviewer) in self.assigned_reviewers.iter().enumerate() {
            let field = format!("assigned_reviewers[{}]", i);
            if reviewer.as_str().is_empty() {
                return Err(DomainError::validation(field, "must not be empty"));
            }
            if *reviewer == self.author_id {
                return Err(DomainError::validation(field, "author cannot review"));
            }
            if !seen.insert(reviewer) {
                return Err(DomainError::validation(field, "duplicate reviewer"));
            }
        }

        Ok(())
    }
}
