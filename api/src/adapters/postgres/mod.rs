//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod migrations;
pub mod pull_request_repo;
pub mod stats_repo;
pub mod team_repo;
pub mod user_repo;


use sea_orm::{DbErr, SqlErr};

use crate::error::{DomainError, ErrorCode};

pub use migrations::run_migrations;
pub use pull_request_repo::PostgresPullRequestRepository;
pub use stats_repo::PostgresStatsRepository;
pub use team_repo::PostgresTeamRepository;
pub use user_repo::PostgresUserRepository;

fn db_err(e: DbErr) -> DomainError {
    DomainError::Database(e.to_string())
}

/// Map a unique-key violation to `code`, anything else to a database error
fn unique_violation_as(code: ErrorCode, message: &'static str) -> impl FnOnce(DbErr) -> DomainError {
    move |e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => DomainError::rule(code, message),
        _ => db_err(e),
    }
}
