//! Pull request handlers
//!
//! Creation, merge and reviewer reassignment.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{PullRequest, PullRequestId, UserId};
use crate::error::AppError;
use crate::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Full pull request, as returned by create, merge and reassign
#[derive(Debug, Serialize)]
pub struct PullRequestDto {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: String,
    pub assigned_reviewers: Vec<String>,
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "mergedAt", skip_serializing_if = "Option::is_none")]
    pub merged_at: Option<DateTime<Utc>>,
}

impl From<PullRequest> for PullRequestDto {
    fn from(pr: PullRequest) -> Self {
        PullRequestDto {
            pull_request_id: pr.id.0,
            pull_request_name: pr.name,
            author_id: pr.author_id.0,
            status: pr.status.to_string(),
            assigned_reviewers: pr.assigned_reviewers.into_iter().map(|r| r.0).collect(),
            created_at: pr.created_at,
            merged_at: pr.merged_at,
        }
    }
}

/// Pull request without reviewers or timestamps, for per-user listings
#[derive(Debug, Serialize)]
pub struct PullRequestShortDto {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: String,
}

impl From<PullRequest> for PullRequestShortDto {
    fn from(pr: PullRequest) -> Self {
        PullRequestShortDto {
            pull_request_id: pr.id.0,
            pull_request_name: pr.name,
            author_id: pr.author_id.0,
            status: pr.status.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreatePrRequest {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MergePrRequest {
    pub pull_request_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReassignRequest {
    pub pull_request_id: String,
    pub old_user_id: String,
}

#[derive(Debug, Serialize)]
pub struct PrResponse {
    pub pr: PullRequestDto,
}

#[derive(Debug, Serialize)]
pub struct ReassignResponse {
    pub pr: PullRequestDto,
    pub replaced_by: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /pullRequest/create
///
/// Reviewers are picked automatically from the author's team.
pub async fn create_pr(
    State(state): State<AppState>,
    payload: Result<Json<CreatePrRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PrResponse>), AppError> {
    let Json(request) = payload?;

    let pr = state
        .pr_service
        .create(
            &PullRequestId(request.pull_request_id),
            &request.pull_request_name,
            &UserId(request.author_id),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(PrResponse { pr: pr.into() })))
}

/// POST /pullRequest/merge
///
/// Idempotent; a second merge returns the PR unchanged.
pub async fn merge_pr(
    State(state): State<AppState>,
    payload: Result<Json<MergePrRequest>, JsonRejection>,
) -> Result<Json<PrResponse>, AppError> {
    let Json(request) = payload?;

    let pr = state
        .pr_service
        .merge(&PullRequestId(request.pull_request_id))
        .await?;

    Ok(Json(PrResponse { pr: pr.into() }))
}

/// POST /pullRequest/reassign
pub async fn reassign_reviewer(
    State(state): State<AppState>,
    payload: Result<Json<ReassignRequest>, JsonRejection>,
) -> Result<Json<ReassignResponse>, AppError> {
    let Json(request) = payload?;

    let result = state
        .pr_service
        .reassign_reviewer(
            &PullRequestId(request.pull_request_id),
            &UserId(request.old_user_id),
        )
        .await?;

    Ok(Json(ReassignResponse {
        pr: result.pr.into(),
        replaced_by: result.replaced_by.0,
    }))
}
