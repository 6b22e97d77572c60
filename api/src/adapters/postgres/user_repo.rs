//! PostgreSQL adapter for UserRepository

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use super::db_err;
use crate::domain::entities::{TeamName, User, UserId};
use crate::domain::ports::UserRepository;
use crate::entity::users;
use crate::error::DomainError;

/// PostgreSQL implementation of UserRepository
pub struct PostgresUserRepository {
    db: DatabaseConnection,
}

impl PostgresUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn upsert_users(&self, users: &[User]) -> Result<(), DomainError> {
        if users.is_empty() {
            return Ok(());
        }

        let models = users.iter().map(|u| users::ActiveModel {
            user_id: Set(u.id.0.clone()),
            username: Set(u.username.clone()),
            team_name: Set(u.team_name.0.clone()),
            is_active: Set(u.is_active),
        });

        users::Entity::insert_many(models)
            .on_conflict(
                OnConflict::column(users::Column::UserId)
                    .update_columns([
                        users::Column::Username,
                        users::Column::TeamName,
                        users::Column::IsActive,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<User, DomainError> {
        users::Entity::find_by_id(id.0.clone())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(User::from)
            .ok_or_else(|| DomainError::not_found("user not found"))
    }

    async fn set_active(&self, id: &UserId, is_active: bool) -> Result<User, DomainError> {
        let result = users::ActiveModel {
            user_id: Set(id.0.clone()),
            is_active: Set(is_active),
            ..Default::default()
        }
        .update(&self.db)
        .await;

        match result {
            Ok(model) => Ok(model.into()),
            Err(DbErr::RecordNotUpdated) => Err(DomainError::not_found("user not found")),
            Err(e) => Err(db_err(e)),
        }
    }

    async fn find_active_team_members_except(
        &self,
        team: &TeamName,
        exclude: &[UserId],
    ) -> Result<Vec<User>, DomainError> {
        let mut query = users::Entity::find()
            .filter(users::Column::TeamName.eq(team.as_str()))
            .filter(users::Column::IsActive.eq(true));

        if !exclude.is_empty() {
            query = query.filter(
                users::Column::UserId.is_not_in(exclude.iter().map(|id| id.0.clone())),
            );
        }

        let results = query
            .order_by_asc(users::Column::UserId)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(results.into_iter().map(User::from).collect())
    }
}

/// Convert SeaORM model to domain entity
impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        User {
            id: UserId(model.user_id),
            username: model.username,
            team_name: TeamName(model.team_name),
            is_active: model.is_active,
        }
    }
}
