//! Scoring and ranking against a model snapshot.
//!
//! ## Serving paths
//! 1. Known user: score every item by the inner product of the user's
//!    factor vector with each item's factor vector, run the candidate
//!    filter chain (seen-item exclusion by default), rank.
//! 2. Unknown user (cold start): rank items by their total fused
//!    interaction weight across all users. This path is designed
//!    behavior, not an error, and is surfaced to callers only through
//!    the `fallback` flag.
//!
//! Ranking is descending by score with ties broken by ascending raw item
//! id, so repeated calls return identical output.

use std::cmp::Ordering;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use signal_store::{ItemId, UserId};

use crate::filters::{Candidate, FilterChain, SeenItemsFilter};
use crate::snapshot::ModelSnapshot;

/// One ranked recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    pub item_id: ItemId,
    pub score: f32,
}

/// The result of one recommendation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub user_id: UserId,
    pub items: Vec<ScoredItem>,
    /// True when the user was unknown and the popularity fallback
    /// produced the ranking.
    pub fallback: bool,
}

/// Serves ranked recommendations from an immutable snapshot.
///
/// The snapshot is shared by reference; concurrent requests read it
/// without locking. Replacing the model means building a new snapshot
/// and a new engine around it, never mutating this one.
pub struct Recommender {
    snapshot: Arc<ModelSnapshot>,
    filters: FilterChain,
}

impl Recommender {
    /// Engine with the default policy: seen items are excluded from
    /// known-user recommendations.
    pub fn new(snapshot: Arc<ModelSnapshot>) -> Self {
        Self::with_filters(snapshot, FilterChain::new().add_filter(SeenItemsFilter))
    }

    /// Engine with an explicit filter policy. An empty chain recommends
    /// from the full catalog, seen or not.
    pub fn with_filters(snapshot: Arc<ModelSnapshot>, filters: FilterChain) -> Self {
        Self { snapshot, filters }
    }

    pub fn snapshot(&self) -> &Arc<ModelSnapshot> {
        &self.snapshot
    }

    /// All user ids the model was trained on (diagnostic surface).
    pub fn known_users(&self) -> &[UserId] {
        self.snapshot.registry.known_users()
    }

    /// Top-n ranked items for a user.
    ///
    /// Never fails: unknown users get the popularity fallback, `n == 0`
    /// yields an empty list, and `n` beyond the candidate count yields
    /// every candidate.
    pub fn recommend(&self, user_id: UserId, n: usize) -> Recommendation {
        match self.snapshot.registry.user_index(user_id) {
            Some(user_index) => {
                let items = if n == 0 {
                    Vec::new()
                } else {
                    self.recommend_for_index(user_index, n)
                };
                Recommendation {
                    user_id,
                    items,
                    fallback: false,
                }
            }
            None => {
                debug!(user_id, "Unknown user, serving popularity fallback");
                let items = if n == 0 {
                    Vec::new()
                } else {
                    self.recommend_popular(n)
                };
                Recommendation {
                    user_id,
                    items,
                    fallback: true,
                }
            }
        }
    }

    /// Factor-model scoring for a registered user.
    fn recommend_for_index(&self, user_index: usize, n: usize) -> Vec<ScoredItem> {
        let scores = self.snapshot.model.scores_for_user(user_index);
        let candidates: Vec<Candidate> = scores
            .iter()
            .enumerate()
            .map(|(item_index, &score)| Candidate { item_index, score })
            .collect();

        let remaining = self.filters.apply(candidates, &self.snapshot, user_index);

        let scored = remaining
            .into_iter()
            .filter_map(|candidate| {
                self.snapshot
                    .registry
                    .item_id(candidate.item_index)
                    .map(|item_id| ScoredItem {
                        item_id,
                        score: candidate.score,
                    })
            })
            .collect();
        rank_top_n(scored, n)
    }

    /// Popularity ranking by total fused interaction weight per item.
    fn recommend_popular(&self, n: usize) -> Vec<ScoredItem> {
        let scored = self
            .snapshot
            .interactions
            .col_sums()
            .into_iter()
            .enumerate()
            .filter_map(|(item_index, score)| {
                self.snapshot
                    .registry
                    .item_id(item_index)
                    .map(|item_id| ScoredItem { item_id, score })
            })
            .collect();
        rank_top_n(scored, n)
    }
}

/// Sort by descending score, ties by ascending item id, keep the top n.
fn rank_top_n(mut scored: Vec<ScoredItem>, n: usize) -> Vec<ScoredItem> {
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.item_id.cmp(&b.item_id))
    });
    scored.truncate(n);
    scored
}
