//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//!
//! The in-memory repositories share their maps through `Arc<RwLock<..>>` so
//! a team repository and a user repository can observe the same users, the
//! way both PostgreSQL adapters read the same `users` table.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
