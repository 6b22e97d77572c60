//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities and ports.

pub mod bulk_deactivation;
pub mod pull_request_service;
pub mod reviewer_selection;
pub mod stats_service;
pub mod team_service;
pub mod user_service;

pub use bulk_deactivation::{BulkDeactivateResult, BulkDeactivationService};
pub use pull_request_service::PullRequestService;
pub use stats_service::StatsService;
pub use team_service::TeamService;
pub use user_service::UserService;
