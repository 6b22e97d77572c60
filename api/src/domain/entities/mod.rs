//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod pull_request;
pub mod reviewer_stats;
pub mod team;
pub mod user;

pub use pull_request::{PrStatus, PullRequest, PullRequestId, MAX_REVIEWERS};
pub use reviewer_stats::ReviewerStats;
pub use team::{Team, TeamName};
pub use user::{User, UserId};
