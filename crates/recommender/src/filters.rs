//! Candidate filters applied before ranking.
//!
//! Whether already-interacted items should be recommended again is a
//! policy question, not a fixed rule, so filtering is expressed as a
//! chain of composable filters. The default chain carries only
//! [`SeenItemsFilter`]; an empty chain disables exclusion entirely.

use tracing::debug;

use crate::snapshot::ModelSnapshot;

/// A scored candidate item, identified by its dense index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub item_index: usize,
    pub score: f32,
}

/// Core trait for filtering candidates.
///
/// ## Design Note
/// - `Send + Sync` allows filters to be shared across serving threads
/// - Filters take ownership of the Vec<Candidate> and return a filtered
///   Vec, so chains transform without extra cloning
pub trait CandidateFilter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of candidates for one user.
    fn apply(
        &self,
        candidates: Vec<Candidate>,
        snapshot: &ModelSnapshot,
        user_index: usize,
    ) -> Vec<Candidate>;
}

/// Removes candidates the user has already interacted with.
///
/// An item counts as seen when its entry in the user's fused interaction
/// row is non-zero.
pub struct SeenItemsFilter;

impl CandidateFilter for SeenItemsFilter {
    fn name(&self) -> &str {
        "SeenItemsFilter"
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        snapshot: &ModelSnapshot,
        user_index: usize,
    ) -> Vec<Candidate> {
        let seen: Vec<usize> = snapshot
            .interactions
            .row(user_index)
            .filter(|&(_, value)| value != 0.0)
            .map(|(item_index, _)| item_index)
            .collect();
        candidates
            .into_iter()
            .filter(|candidate| !seen.contains(&candidate.item_index))
            .collect()
    }
}

/// Chains multiple filters together (builder pattern).
#[derive(Default)]
pub struct FilterChain {
    filters: Vec<Box<dyn CandidateFilter>>,
}

impl FilterChain {
    /// Create a new empty FilterChain.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add a filter to the chain (builder pattern).
    pub fn add_filter(mut self, filter: impl CandidateFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Apply all filters in sequence to the candidates.
    pub fn apply(
        &self,
        candidates: Vec<Candidate>,
        snapshot: &ModelSnapshot,
        user_index: usize,
    ) -> Vec<Candidate> {
        let mut current = candidates;
        for filter in &self.filters {
            let before = current.len();
            current = filter.apply(current, snapshot, user_index);
            debug!(
                filter = filter.name(),
                before,
                after = current.len(),
                "Applied candidate filter"
            );
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use factor_model::{AlsConfig, FactorModel};
    use ndarray::Array2;
    use signal_store::{IdRegistry, Interaction, SparseMatrix};

    fn snapshot_with_seen_item() -> ModelSnapshot {
        // User 1 (index 0) has interacted with item 10 (index 0)
        let seed = vec![Interaction::new(1, 10, 1.0), Interaction::new(1, 20, 0.0)];
        let registry = IdRegistry::from_sources(&[&seed]);
        let mut interactions = SparseMatrix::zeros(1, 2);
        interactions.accumulate(0, 0, 3.0);
        let model = FactorModel {
            user_factors: Array2::zeros((1, 2)),
            item_factors: Array2::zeros((2, 2)),
            config: AlsConfig::default(),
        };
        ModelSnapshot::new(registry, interactions, model).unwrap()
    }

    #[test]
    fn test_seen_items_filter_drops_interacted_items() {
        let snapshot = snapshot_with_seen_item();
        let candidates = vec![
            Candidate {
                item_index: 0,
                score: 0.9,
            },
            Candidate {
                item_index: 1,
                score: 0.5,
            },
        ];

        let filtered = SeenItemsFilter.apply(candidates, &snapshot, 0);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].item_index, 1);
    }

    #[test]
    fn test_empty_chain_keeps_everything() {
        let snapshot = snapshot_with_seen_item();
        let candidates = vec![
            Candidate {
                item_index: 0,
                score: 0.9,
            },
            Candidate {
                item_index: 1,
                score: 0.5,
            },
        ];

        let chain = FilterChain::new();
        let filtered = chain.apply(candidates.clone(), &snapshot, 0);
        assert_eq!(filtered, candidates);
    }

    #[test]
    fn test_chain_applies_filters_in_order() {
        let snapshot = snapshot_with_seen_item();
        let candidates = vec![
            Candidate {
                item_index: 0,
                score: 0.9,
            },
            Candidate {
                item_index: 1,
                score: 0.5,
            },
        ];

        let chain = FilterChain::new().add_filter(SeenItemsFilter);
        let filtered = chain.apply(candidates, &snapshot, 0);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].item_index, 1);
    }
}
