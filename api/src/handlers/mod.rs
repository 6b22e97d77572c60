//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod pull_requests;
pub mod stats;
pub mod teams;
pub mod users;

pub use pull_requests::{create_pr, merge_pr, reassign_reviewer};
pub use stats::reviewer_stats;
pub use teams::{add_team, deactivate_members, get_team};
pub use users::{get_review, set_is_active};
