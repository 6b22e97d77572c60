//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod random;
pub mod repositories;

pub use random::RandomSource;
pub use repositories::{PullRequestRepository, StatsRepository, TeamRepository, UserRepository};
