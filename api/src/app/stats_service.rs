//! Reviewer statistics

use std::sync::Arc;

use crate::domain::entities::ReviewerStats;
use crate::domain::ports::StatsRepository;
use crate::error::DomainError;

pub struct StatsService<SR>
where
    SR: StatsRepository,
{
    stats: Arc<SR>,
}

impl<SR> StatsService<SR>
where
    SR: StatsRepository,
{
    pub fn new(stats: Arc<SR>) -> Self {
        Self { stats }
    }

    pub async fn reviewer_stats(&self) -> Result<Vec<ReviewerStats>, DomainError> {
        self.stats.reviewer_stats().await.inspect_err(|e| {
            tracing::error!(error = %e, "get reviewer stats");
        })
    }
}
