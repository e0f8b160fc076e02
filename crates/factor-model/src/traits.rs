//! Trainer abstraction.
//!
//! The pipeline only depends on this trait, so the solver implementation
//! (the in-crate ALS, or a library-backed replacement) can be swapped
//! without touching matrix construction or serving.

use signal_store::SparseMatrix;

use crate::TrainError;
use crate::model::FactorModel;

/// Fits a latent-factor model to a fused interaction matrix.
///
/// ## Design Note
/// - `Send + Sync` allows a trainer to be shared across threads
/// - Training takes the matrix by reference; the matrix stays owned by
///   the caller and is served from unchanged afterwards
pub trait FactorModelTrainer: Send + Sync {
    /// Returns the name of this trainer (for logging/debugging)
    fn name(&self) -> &str;

    /// Fit a model to the interaction matrix.
    ///
    /// # Errors
    /// * `TrainError::InvalidConfig` - hyperparameters are out of range
    /// * `TrainError::Numerical` - a factor solve broke down
    fn train(&self, interactions: &SparseMatrix) -> Result<FactorModel, TrainError>;
}
