//! The trained factor model: latent user and item embeddings.

use ndarray::{Array1, Array2};

use crate::config::AlsConfig;

/// Latent-factor embeddings produced by a trainer.
///
/// Row u of `user_factors` and row i of `item_factors` live in the same
/// k-dimensional space; their inner product is the predicted preference
/// of user u for item i. Row/column indices are the dense indices of the
/// identifier registry the interaction matrix was built from; the model
/// must never be paired with a registry other than the one it was
/// trained against.
///
/// Immutable after training; shared read-only across serving calls.
#[derive(Debug, Clone)]
pub struct FactorModel {
    /// (num_users x k) user embeddings
    pub user_factors: Array2<f32>,
    /// (num_items x k) item embeddings
    pub item_factors: Array2<f32>,
    /// Hyperparameters the model was trained with
    pub config: AlsConfig,
}

impl FactorModel {
    pub fn num_users(&self) -> usize {
        self.user_factors.nrows()
    }

    pub fn num_items(&self) -> usize {
        self.item_factors.nrows()
    }

    /// Embedding dimensionality k.
    pub fn factors(&self) -> usize {
        self.item_factors.ncols()
    }

    /// Predicted preference of one user for one item.
    ///
    /// Indices must be in bounds; callers resolve them through the
    /// registry first.
    pub fn score(&self, user_index: usize, item_index: usize) -> f32 {
        self.user_factors
            .row(user_index)
            .dot(&self.item_factors.row(item_index))
    }

    /// Predicted preference of one user for every item, as a dense
    /// vector indexed by item index.
    pub fn scores_for_user(&self, user_index: usize) -> Array1<f32> {
        self.item_factors.dot(&self.user_factors.row(user_index))
    }
}
