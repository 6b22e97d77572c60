//! Team handlers
//!
//! Team creation, lookup and bulk member deactivation.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::app::BulkDeactivateResult;
use crate::domain::entities::{Team, TeamName, User, UserId};
use crate::error::AppError;
use crate::AppState;

/// Team member as sent and returned over the wire
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamMemberDto {
    pub user_id: String,
    pub username: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamDto {
    pub team_name: String,
    pub members: Vec<TeamMemberDto>,
}

impl From<TeamDto> for Team {
    fn from(dto: TeamDto) -> Self {
        let name = TeamName(dto.team_name);
        let members = dto
            .members
            .into_iter()
            .map(|m| User {
                id: UserId(m.user_id),
                username: m.username,
                team_name: name.clone(),
                is_active: m.is_active,
            })
            .collect();
        Team { name, members }
    }
}

impl From<Team> for TeamDto {
    fn from(team: Team) -> Self {
        TeamDto {
            team_name: team.name.0,
            members: team
                .members
                .into_iter()
                .map(|m| TeamMemberDto {
                    user_id: m.id.0,
                    username: m.username,
                    is_active: m.is_active,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TeamAddResponse {
    pub team: TeamDto,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TeamQuery {
    pub team_name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeactivateMembersRequest {
    pub team_name: String,
    pub user_ids: Vec<String>,
}

/// POST /team/add
///
/// Create a team and upsert its members.
pub async fn add_team(
    State(state): State<AppState>,
    payload: Result<Json<TeamDto>, JsonRejection>,
) -> Result<(StatusCode, Json<TeamAddResponse>), AppError> {
    let Json(request) = payload?;

    let team = state.team_service.add_team(request.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(TeamAddResponse { team: team.into() }),
    ))
}

/// GET /team/get?team_name=
pub async fn get_team(
    State(state): State<AppState>,
    query: Result<Query<TeamQuery>, QueryRejection>,
) -> Result<Json<TeamDto>, AppError> {
    let Query(query) = query?;

    let team = state
        .team_service
        .get_team(&TeamName(query.team_name))
        .await?;

    Ok(Json(team.into()))
}

/// POST /team/deactivateMembers
///
/// Deactivate several members and move their open reviews elsewhere.
/// PRs nobody can take over are listed in `not_reassigned`.
pub async fn deactivate_members(
    State(state): State<AppState>,
    payload: Result<Json<DeactivateMembersRequest>, JsonRejection>,
) -> Result<Json<BulkDeactivateResult>, AppError> {
    let Json(request) = payload?;

    let user_ids: Vec<UserId> = request.user_ids.into_iter().map(UserId).collect();
    let result = state
        .bulk_deactivation_service
        .deactivate_members(&TeamName(request.team_name), &user_ids)
        .await?;

    Ok(Json(result))
}
