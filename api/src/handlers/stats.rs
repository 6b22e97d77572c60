//! Statistics handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::domain::entities::ReviewerStats;
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ReviewerStatDto {
    pub user_id: String,
    pub username: String,
    pub assigned_count: i64,
}

impl From<ReviewerStats> for ReviewerStatDto {
    fn from(stats: ReviewerStats) -> Self {
        ReviewerStatDto {
            user_id: stats.user_id.0,
            username: stats.username,
            assigned_count: stats.assigned_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewerStatsResponse {
    pub reviewer_stats: Vec<ReviewerStatDto>,
}

/// GET /stats/reviewers
///
/// Reviewer slot counts for every user, busiest first.
pub async fn reviewer_stats(
    State(state): State<AppState>,
) -> Result<Json<ReviewerStatsResponse>, AppError> {
    let stats = state.stats_service.reviewer_stats().await?;

    Ok(Json(ReviewerStatsResponse {
        reviewer_stats: stats.into_iter().map(ReviewerStatDto::from).collect(),
    }))
}
