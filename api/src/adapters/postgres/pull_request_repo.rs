//! PostgreSQL adapter for PullRequestRepository
//!
//! A pull request row plus one `pull_request_reviewers` row per slot.
//! Reviewers are returned in assignment order.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseBackend, DatabaseConnection, EntityTrait,
    JoinType, NotSet, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, Statement,
    TransactionTrait,
};

use super::{db_err, unique_violation_as};
use crate::domain::entities::{PrStatus, PullRequest, PullRequestId, UserId};
use crate::domain::ports::PullRequestRepository;
use crate::entity::{pull_request_reviewers, pull_requests};
use crate::error::{DomainError, ErrorCode};

/// PostgreSQL implementation of PullRequestRepository
pub struct PostgresPullRequestRepository {
    db: DatabaseConnection,
}

impl PostgresPullRequestRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load_reviewers(&self, id: &PullRequestId) -> Result<Vec<UserId>, DomainError> {
        let ids: Vec<String> = pull_request_reviewers::Entity::find()
            .filter(pull_request_reviewers::Column::PullRequestId.eq(id.as_str()))
            .select_only()
            .column(pull_request_reviewers::Column::ReviewerId)
            .order_by_asc(pull_request_reviewers::Column::AssignedAt)
            .order_by_asc(pull_request_reviewers::Column::ReviewerId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(ids.into_iter().map(UserId).collect())
    }

    /// Reviewers for many pull requests in one round trip
    async fn load_reviewers_for(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, Vec<UserId>>, DomainError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(String, String)> = pull_request_reviewers::Entity::find()
            .filter(pull_request_reviewers::Column::PullRequestId.is_in(ids.iter().cloned()))
            .select_only()
            .column(pull_request_reviewers::Column::PullRequestId)
            .column(pull_request_reviewers::Column::ReviewerId)
            .order_by_asc(pull_request_reviewers::Column::AssignedAt)
            .order_by_asc(pull_request_reviewers::Column::ReviewerId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let mut grouped: HashMap<String, Vec<UserId>> = HashMap::new();
        for (pr_id, reviewer_id) in rows {
            grouped.entry(pr_id).or_default().push(UserId(reviewer_id));
        }
        Ok(grouped)
    }
}

#[async_trait]
impl PullRequestRepository for PostgresPullRequestRepository {
    async fn create(&self, pr: &PullRequest) -> Result<(), DomainError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        pull_requests::ActiveModel {
            pull_request_id: Set(pr.id.0.clone()),
            pull_request_name: Set(pr.name.clone()),
            author_id: Set(pr.author_id.0.clone()),
            status: Set(pr.status.to_string()),
            created_at: Set(pr.created_at.unwrap_or_else(Utc::now).fixed_offset()),
            merged_at: Set(pr.merged_at.map(|t| t.fixed_offset())),
        }
        .insert(&txn)
        .await
        .map_err(unique_violation_as(
            ErrorCode::PrExists,
            "pull request already exists",
        ))?;

        if !pr.assigned_reviewers.is_empty() {
            let slots = pr
                .assigned_reviewers
                .iter()
                .map(|reviewer| pull_request_reviewers::ActiveModel {
                    pull_request_id: Set(pr.id.0.clone()),
                    reviewer_id: Set(reviewer.0.clone()),
                    assigned_at: NotSet,
                });

            pull_request_reviewers::Entity::insert_many(slots)
                .exec(&txn)
                .await
                .map_err(db_err)?;
        }

        txn.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &PullRequestId) -> Result<PullRequest, DomainError> {
        let model = pull_requests::Entity::find_by_id(id.0.clone())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("pull request not found"))?;

        let reviewers = self.load_reviewers(id).await?;
        to_domain(model, reviewers)
    }

    async fn set_merged(
        &self,
        id: &PullRequestId,
        merged_at: DateTime<Utc>,
    ) -> Result<PullRequest, DomainError> {
        // COALESCE keeps the first merge timestamp on repeated merges
        let stmt = Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            "UPDATE pull_requests SET status = 'MERGED', merged_at = COALESCE(merged_at, $2) \
             WHERE pull_request_id = $1 \
             RETURNING pull_request_id, pull_request_name, author_id, status, created_at, merged_at",
            [id.0.clone().into(), merged_at.fixed_offset().into()],
        );

        let model = pull_requests::Entity::find()
            .from_raw_sql(stmt)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("pull request not found"))?;

        let reviewers = self.load_reviewers(id).await?;
        to_domain(model, reviewers)
    }

    async fn replace_reviewer(
        &self,
        pr_id: &PullRequestId,
        old_reviewer: &UserId,
        new_reviewer: &UserId,
    ) -> Result<PullRequest, DomainError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let removed = pull_request_reviewers::Entity::delete_many()
            .filter(pull_request_reviewers::Column::PullRequestId.eq(pr_id.as_str()))
            .filter(pull_request_reviewers::Column::ReviewerId.eq(old_reviewer.as_str()))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        // Someone else already moved this slot; dropping txn rolls back
        if removed.rows_affected == 0 {
            return Err(DomainError::rule(
                ErrorCode::NotAssigned,
                "reviewer is not assigned to this pull request",
            ));
        }

        pull_request_reviewers::ActiveModel {
            pull_request_id: Set(pr_id.0.clone()),
            reviewer_id: Set(new_reviewer.0.clone()),
            assigned_at: NotSet,
        }
        .insert(&txn)
        .await
        // A concurrent swap already attached the same replacement
        .map_err(unique_violation_as(
            ErrorCode::NoCandidate,
            "replacement reviewer is already assigned to this pull request",
        ))?;

        txn.commit().await.map_err(db_err)?;

        self.find_by_id(pr_id).await
    }

    async fn list_by_reviewer(&self, reviewer: &UserId) -> Result<Vec<PullRequest>, DomainError> {
        let models = pull_requests::Entity::find()
            .join(JoinType::InnerJoin, pull_requests::Relation::Reviewers.def())
            .filter(pull_request_reviewers::Column::ReviewerId.eq(reviewer.as_str()))
            .order_by_desc(pull_requests::Column::CreatedAt)
            .order_by_asc(pull_requests::Column::PullRequestId)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let ids: Vec<String> = models.iter().map(|m| m.pull_request_id.clone()).collect();
        let mut reviewers = self.load_reviewers_for(&ids).await?;

        models
            .into_iter()
            .map(|m| {
                let slots = reviewers.remove(&m.pull_request_id).unwrap_or_default();
                to_domain(m, slots)
            })
            .collect()
    }

    async fn find_open_ids_by_reviewer(
        &self,
        reviewer: &UserId,
    ) -> Result<Vec<PullRequestId>, DomainError> {
        let ids: Vec<String> = pull_requests::Entity::find()
            .join(JoinType::InnerJoin, pull_requests::Relation::Reviewers.def())
            .filter(pull_request_reviewers::Column::ReviewerId.eq(reviewer.as_str()))
            .filter(pull_requests::Column::Status.eq(PrStatus::Open.to_string()))
            .select_only()
            .column(pull_requests::Column::PullRequestId)
            .order_by_asc(pull_requests::Column::PullRequestId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(ids.into_iter().map(PullRequestId).collect())
    }
}

/// Convert SeaORM model plus its reviewer slots to domain entity
fn to_domain(
    model: pull_requests::Model,
    reviewers: Vec<UserId>,
) -> Result<PullRequest, DomainError> {
    let status: PrStatus = model.status.parse().map_err(|_| {
        DomainError::Internal(format!(
            "pull request {} has unknown status {}",
            model.pull_request_id, model.status
        ))
    })?;

    Ok(PullRequest {
        id: PullRequestId(model.pull_request_id),
        name: model.pull_request_name,
        author_id: UserId(model.author_id),
        status,
        assigned_reviewers: reviewers,
        created_at: Some(model.created_at.with_timezone(&Utc)),
        merged_at: model.merged_at.map(|t| t.with_timezone(&Utc)),
    })
}
