//! User handlers

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use serde::{Deserialize, Serialize};

use super::pull_requests::PullRequestShortDto;
use crate::domain::entities::{User, UserId};
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub user_id: String,
    pub username: String,
    pub team_name: String,
    pub is_active: bool,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        UserDto {
            user_id: user.id.0,
            username: user.username,
            team_name: user.team_name.0,
            is_active: user.is_active,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SetIsActiveRequest {
    pub user_id: String,
    pub is_active: bool,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: UserDto,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserQuery {
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct UserReviewResponse {
    pub user_id: String,
    pub pull_requests: Vec<PullRequestShortDto>,
}

/// POST /users/setIsActive
///
/// Existing review assignments are not touched; see /team/deactivateMembers.
pub async fn set_is_active(
    State(state): State<AppState>,
    payload: Result<Json<SetIsActiveRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, AppError> {
    let Json(request) = payload?;

    let user = state
        .user_service
        .set_is_active(&UserId(request.user_id), request.is_active)
        .await?;

    Ok(Json(UserResponse { user: user.into() }))
}

/// GET /users/getReview?user_id=
pub async fn get_review(
    State(state): State<AppState>,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> Result<Json<UserReviewResponse>, AppError> {
    let Query(query) = query?;

    let (user, prs) = state
        .user_service
        .list_review_prs(&UserId(query.user_id))
        .await?;

    Ok(Json(UserReviewResponse {
        user_id: user.id.0,
        pull_requests: prs.into_iter().map(PullRequestShortDto::from).collect(),
    }))
}
