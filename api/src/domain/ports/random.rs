//! Randomness port
//!
//! Reviewer selection draws indices through this trait so tests can script
//! the sequence and production can plug in any generator.

/// Source of uniformly distributed indices
pub trait RandomSource: Send + Sync {
    /// Uniform integer in `[0, upper)`. `upper` is always positive.
    fn next_index(&self, upper: usize) -> usize;
}
