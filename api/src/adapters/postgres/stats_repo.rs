//! PostgreSQL adapter for StatsRepository

use async_trait::async_trait;
use sea_orm::{DatabaseBackend, DatabaseConnection, FromQueryResult, Statement};

use super::db_err;
use crate::domain::entities::{ReviewerStats, UserId};
use crate::domain::ports::StatsRepository;
use crate::error::DomainError;

const REVIEWER_STATS_SQL: &str = "\
    SELECT u.user_id, u.username, COUNT(prr.pull_request_id) AS assigned_count \
    FROM users u \
    LEFT JOIN pull_request_reviewers prr ON prr.reviewer_id = u.user_id \
    GROUP BY u.user_id, u.username \
    ORDER BY assigned_count DESC, u.user_id";

#[derive(Debug, FromQueryResult)]
struct ReviewerStatsRow {
    user_id: String,
    username: String,
    assigned_count: i64,
}

/// PostgreSQL implementation of StatsRepository
pub struct PostgresStatsRepository {
    db: DatabaseConnection,
}

impl PostgresStatsRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StatsRepository for PostgresStatsRepository {
    async fn reviewer_stats(&self) -> Result<Vec<ReviewerStats>, DomainError> {
        let rows = ReviewerStatsRow::find_by_statement(Statement::from_string(
            DatabaseBackend::Postgres,
            REVIEWER_STATS_SQL,
        ))
        .all(&self.db)
        .await
        .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|row| ReviewerStats {
                user_id: UserId(row.user_id),
                username: row.username,
                assigned_count: row.assigned_count,
            })
            .collect())
    }
}
