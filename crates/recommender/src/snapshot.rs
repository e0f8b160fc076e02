//! The immutable serving state and the pipeline that builds it.
//!
//! A [`ModelSnapshot`] bundles the three things serving needs (the
//! identifier registry, the fused interaction matrix, and the trained
//! factor model) into one value. The three share an index space, so they
//! are only ever created together and replaced together; serving call
//! sites hold the snapshot behind an `Arc` and never mutate it.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, ensure};
use tracing::info;

use factor_model::{FactorModel, FactorModelTrainer};
use signal_store::{
    Aggregation, IdRegistry, SignalSet, SignalWeights, SparseMatrix, build_signal_matrix, fuse,
};

/// Registry + fused matrix + trained model, as one atomic unit.
#[derive(Debug, Clone)]
pub struct ModelSnapshot {
    pub registry: IdRegistry,
    pub interactions: SparseMatrix,
    pub model: FactorModel,
}

impl ModelSnapshot {
    /// Bundle the three parts, verifying they agree on dimensions.
    ///
    /// A disagreement means the parts were not built from one registry
    /// and the snapshot would serve inconsistent indices.
    pub fn new(
        registry: IdRegistry,
        interactions: SparseMatrix,
        model: FactorModel,
    ) -> Result<Self> {
        ensure!(
            interactions.shape() == registry.shape(),
            "interaction matrix shape {:?} does not match registry shape {:?}",
            interactions.shape(),
            registry.shape()
        );
        ensure!(
            (model.num_users(), model.num_items()) == registry.shape(),
            "factor model shape ({}, {}) does not match registry shape {:?}",
            model.num_users(),
            model.num_items(),
            registry.shape()
        );
        Ok(Self {
            registry,
            interactions,
            model,
        })
    }
}

/// Run the full training pipeline: registry, per-source matrices, fusion,
/// model fit. Returns the snapshot ready for serving.
pub fn build_snapshot(
    signals: &SignalSet,
    weights: &SignalWeights,
    trainer: &dyn FactorModelTrainer,
) -> Result<Arc<ModelSnapshot>> {
    let start = Instant::now();
    weights.validate().context("Invalid signal weights")?;

    let registry = IdRegistry::from_sources(&signals.record_sets());
    let (num_users, num_items) = registry.shape();
    info!(num_users, num_items, "Built identifier registry");

    let click_matrix = build_signal_matrix(&signals.clicks, &registry, Aggregation::Sum)
        .context("Building click matrix")?;
    let order_matrix = build_signal_matrix(&signals.orders, &registry, Aggregation::Sum)
        .context("Building order matrix")?;
    let rating_matrix = build_signal_matrix(&signals.ratings, &registry, Aggregation::Sum)
        .context("Building rating matrix")?;

    let interactions = fuse(&[
        (&click_matrix, weights.clicks),
        (&order_matrix, weights.orders),
        (&rating_matrix, weights.ratings),
    ])
    .context("Fusing signal matrices")?;
    info!(nnz = interactions.nnz(), "Fused interaction matrix");

    let model = trainer
        .train(&interactions)
        .with_context(|| format!("Training with {}", trainer.name()))?;
    info!(
        factors = model.factors(),
        elapsed = ?start.elapsed(),
        "Trained factor model"
    );

    let snapshot = ModelSnapshot::new(registry, interactions, model)?;
    Ok(Arc::new(snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use factor_model::AlsConfig;
    use ndarray::Array2;
    use signal_store::Interaction;

    fn tiny_signals() -> SignalSet {
        SignalSet {
            clicks: vec![Interaction::new(7, 20, 2.0)],
            orders: vec![],
            ratings: vec![Interaction::new(3, 10, 4.0)],
        }
    }

    fn small_trainer() -> factor_model::AlsTrainer {
        factor_model::AlsTrainer::new(AlsConfig {
            factors: 4,
            iterations: 5,
            regularization: 0.1,
            alpha: 1.0,
            seed: 1,
        })
    }

    #[test]
    fn test_build_snapshot_end_to_end() {
        let snapshot = build_snapshot(
            &tiny_signals(),
            &SignalWeights::default(),
            &small_trainer(),
        )
        .unwrap();

        assert_eq!(snapshot.registry.shape(), (2, 2));
        assert_eq!(snapshot.interactions.shape(), (2, 2));
        assert_eq!(snapshot.model.num_users(), 2);
        assert_eq!(snapshot.model.num_items(), 2);
    }

    #[test]
    fn test_build_snapshot_rejects_negative_weights() {
        let weights = SignalWeights {
            orders: -5.0,
            ..Default::default()
        };
        assert!(build_snapshot(&tiny_signals(), &weights, &small_trainer()).is_err());
    }

    #[test]
    fn test_build_snapshot_on_empty_signals() {
        let snapshot = build_snapshot(
            &SignalSet::default(),
            &SignalWeights::default(),
            &small_trainer(),
        )
        .unwrap();
        assert_eq!(snapshot.registry.shape(), (0, 0));
    }

    #[test]
    fn test_snapshot_rejects_mismatched_parts() {
        let signals = tiny_signals();
        let registry = IdRegistry::from_sources(&signals.record_sets());
        let interactions = SparseMatrix::zeros(2, 2);
        let model = FactorModel {
            user_factors: Array2::zeros((3, 4)),
            item_factors: Array2::zeros((2, 4)),
            config: AlsConfig::default(),
        };
        assert!(ModelSnapshot::new(registry, interactions, model).is_err());
    }
}
