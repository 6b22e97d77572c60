//! Random source for reviewer selection

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::ports::RandomSource;

/// `StdRng` behind a mutex, shared by every request
pub struct StdRandomSource {
    rng: Mutex<StdRng>,
}

impl StdRandomSource {
    /// Reproducible draws, for tests and `RANDOM_SEED`
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }
}

impl RandomSource for StdRandomSource {
    fn next_index(&self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        match self.rng.lock() {
            Ok(mut rng) => rng.gen_range(0..upper),
            // A poisoned lock still holds a usable generator
            Err(poisoned) => poisoned.into_inner().gen_range(0..upper),
        }
    }
}
