//! Reviewer selection policy
//!
//! Picks up to `limit` distinct reviewers from a candidate pool by uniform
//! sampling without replacement.

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::entities::{User, UserId};
use crate::domain::ports::RandomSource;

/// Draws allowed per pool member before selection stops sampling
const DRAW_ATTEMPTS_PER_CANDIDATE: usize = 8;

/// Selects reviewers using an injected randomness source
pub struct ReviewerPicker<RS>
where
    RS: RandomSource,
{
    random: Arc<RS>,
}

impl<RS> ReviewerPicker<RS>
where
    RS: RandomSource,
{
    pub fn new(random: Arc<RS>) -> Self {
        Self { random }
    }

    /// Choose `min(limit, candidates)` distinct reviewer ids
    ///
    /// When every candidate fits under `limit` they are all returned in pool
    /// order and no randomness is consumed. Otherwise indices are drawn and
    /// repeats rejected until `limit` distinct ones have been accepted, or
    /// the draw budget runs out and the lowest unused indices fill the rest.
    pub fn pick_reviewers(&self, candidates: &[User], limit: usize) -> Vec<UserId> {
        let pool = distinct_ids(candidates);
        let n = pool.len();

        if n == 0 || limit == 0 {
            return Vec::new();
        }

        if n <= limit {
            return pool.into_iter().cloned().collect();
        }

        let mut used = vec![false; n];
        let mut picked = Vec::with_capacity(limit);
        let max_draws = n.saturating_mul(DRAW_ATTEMPTS_PER_CANDIDATE);
        let mut draws = 0;

        while picked.len() < limit && draws < max_draws {
            draws += 1;
            // Out-of-range draws from a misbehaving source wrap instead of panicking.
            let i = self.random.next_index(n) % n;
            if used[i] {
                continue;
            }
            used[i] = true;
            picked.push(pool[i].clone());
        }

        // A source stuck on repeats gets the lowest unused slots instead.
        if picked.len() < limit {
            tracing::warn!(pool = n, limit, draws, "random source exhausted draw budget");
            let missing = limit - picked.len();
            let rest = used
                .iter()
                .zip(&pool)
                .filter(|(taken, _)| !**taken)
                .map(|(_, id)| (*id).clone())
                .take(missing);
            picked.extend(rest);
        }

        tracing::debug!(pool = n, limit, picked = ?picked, "picked reviewers");
        picked
    }
}

/// Candidate ids in pool order with repeats dropped
fn distinct_ids(candidates: &[User]) -> Vec<&UserId> {
    let mut seen = HashSet::with_capacity(candidates.len());
    candidates
        .iter()
        .map(|u| &u.id)
        .filter(|id| seen.insert(*id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::StdRandomSource;
    use crate::test_utils::{test_user, SequenceRandomSource};

    fn pool(ids: &[&str]) -> Vec<User> {
        ids.iter().map(|id| test_user(id, "backend")).collect()
    }

    fn ids(raw: &[&str]) -> Vec<UserId> {
        raw.iter().map(|id| UserId::from(*id)).collect()
    }

    #[test]
    fn empty_pool_yields_nothing() {
        let random = Arc::new(SequenceRandomSource::new(vec![0]));
        let picker = ReviewerPicker::new(random.clone());

        assert!(picker.pick_reviewers(&[], 2).is_empty());
        assert_eq!(random.draws(), 0);
    }

    #[test]
    fn zero_limit_yields_nothing() {
        let random = Arc::new(SequenceRandomSource::new(vec![0]));
        let picker = ReviewerPicker::new(random.clone());

        assert!(picker.pick_reviewers(&pool(&["a", "b"]), 0).is_empty());
        assert_eq!(random.draws(), 0);
    }

    #[test]
    fn small_pool_returns_everyone_without_drawing() {
        let random = Arc::new(SequenceRandomSource::new(vec![0]));
        let picker = ReviewerPicker::new(random.clone());

        let picked = picker.pick_reviewers(&pool(&["a", "b"]), 2);

        assert_eq!(picked, ids(&["a", "b"]));
        assert_eq!(random.draws(), 0);
    }

    #[test]
    fn repeated_draws_are_rejected() {
        // 1 is drawn twice; the second draw must be discarded.
        let random = Arc::new(SequenceRandomSource::new(vec![1, 1, 3]));
        let picker = ReviewerPicker::new(random.clone());

        let picked = picker.pick_reviewers(&pool(&["a", "b", "c", "d"]), 2);

        assert_eq!(picked, ids(&["b", "d"]));
        assert_eq!(random.draws(), 3);
    }

    #[test]
    fn stuck_source_falls_back_to_unused_candidates() {
        let random = Arc::new(SequenceRandomSource::new(vec![0]));
        let picker = ReviewerPicker::new(random.clone());

        let picked = picker.pick_reviewers(&pool(&["a", "b", "c"]), 2);

        assert_eq!(picked, ids(&["a", "b"]));
        assert_eq!(random.draws(), 3 * DRAW_ATTEMPTS_PER_CANDIDATE);
    }

    #[test]
    fn single_pick_from_larger_pool() {
        let random = Arc::new(SequenceRandomSource::new(vec![2]));
        let picker = ReviewerPicker::new(random);

        let picked = picker.pick_reviewers(&pool(&["a", "b", "c"]), 1);

        assert_eq!(picked, ids(&["c"]));
    }

    #[test]
    fn duplicate_candidates_never_produce_duplicate_ids() {
        let random = Arc::new(SequenceRandomSource::new(vec![0]));
        let picker = ReviewerPicker::new(random);

        let picked = picker.pick_reviewers(&pool(&["a", "a", "b"]), 2);

        assert_eq!(picked, ids(&["a", "b"]));
    }

    #[test]
    fn results_are_always_distinct() {
        let picker = ReviewerPicker::new(Arc::new(StdRandomSource::new(7)));
        let candidates = pool(&["a", "b", "c", "d", "e", "f"]);

        for limit in 0..=candidates.len() + 1 {
            for _ in 0..50 {
                let picked = picker.pick_reviewers(&candidates, limit);
                let unique: HashSet<_> = picked.iter().collect();
                assert_eq!(unique.len(), picked.len());
                assert_eq!(picked.len(), limit.min(candidates.len()));
            }
        }
    }

    #[test]
    fn every_candidate_can_be_selected() {
        let picker = ReviewerPicker::new(Arc::new(StdRandomSource::new(42)));
        let candidates = pool(&["a", "b", "c", "d"]);
        let mut seen = HashSet::new();

        for _ in 0..200 {
            seen.extend(picker.pick_reviewers(&candidates, 1));
        }

        assert_eq!(seen.len(), candidates.len());
    }
}
