//! SeaORM entities for the reviewer assignment schema
//!
//! Mirrors `migrations/0001_init.sql`.

pub mod pull_request_reviewers;
pub mod pull_requests;
pub mod teams;
pub mod users;
