//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod postgres;
pub mod random;

pub use postgres::{
    run_migrations, PostgresPullRequestRepository, PostgresStatsRepository,
    PostgresTeamRepository, PostgresUserRepository,
};
pub use random::StdRandomSource;
