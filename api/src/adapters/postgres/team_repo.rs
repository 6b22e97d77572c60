//! PostgreSQL adapter for TeamRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::{db_err, unique_violation_as};
use crate::domain::entities::{Team, TeamName, User};
use crate::domain::ports::TeamRepository;
use crate::entity::{teams, users};
use crate::error::{DomainError, ErrorCode};

/// PostgreSQL implementation of TeamRepository
pub struct PostgresTeamRepository {
    db: DatabaseConnection,
}

impl PostgresTeamRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TeamRepository for PostgresTeamRepository {
    async fn create(&self, team: &Team) -> Result<(), DomainError> {
        teams::ActiveModel {
            team_name: Set(team.name.0.clone()),
        }
        .insert(&self.db)
        .await
        .map_err(unique_violation_as(ErrorCode::TeamExists, "team already exists"))?;

        Ok(())
    }

    async fn find_by_name(&self, name: &TeamName) -> Result<Team, DomainError> {
        teams::Entity::find_by_id(name.0.clone())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("team not found"))?;

        let members = users::Entity::find()
            .filter(users::Column::TeamName.eq(name.as_str()))
            .order_by_asc(users::Column::UserId)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(Team {
            name: name.clone(),
            members: members.into_iter().map(User::from).collect(),
        })
    }
}
