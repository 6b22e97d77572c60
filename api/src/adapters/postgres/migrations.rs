//! Startup schema bootstrap

use sea_orm::{ConnectionTrait, DatabaseConnection};

use super::db_err;
use crate::error::DomainError;

const INIT_SCHEMA: &str = include_str!("../../../migrations/0001_init.sql");

/// Apply the bundled schema; every statement is idempotent
pub async fn run_migrations(db: &DatabaseConnection) -> Result<(), DomainError> {
    db.execute_unprepared(INIT_SCHEMA).await.map_err(db_err)?;
    tracing::info!("database schema is up to date");
    Ok(())
}
