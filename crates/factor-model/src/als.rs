//! Alternating least squares for implicit feedback.
//!
//! ## Algorithm
//! The fused interaction matrix holds non-negative confidence weights.
//! Following the implicit-feedback formulation, an observed entry of
//! weight r becomes preference p = 1 with confidence c = 1 + alpha * r;
//! absent entries are p = 0 with confidence 1. Each sweep holds one side
//! fixed and solves the other side's regularized weighted least-squares
//! problem row by row:
//!
//!   x_u = (Y^T Y + lambda*I + sum_i (c_ui - 1) * y_i y_i^T)^-1 * sum_i c_ui * y_i
//!
//! The Y^T Y + lambda*I term is shared by every row and computed once per
//! sweep; the per-row correction only touches that row's observed entries,
//! so a sweep costs O(nnz * k^2 + rows * k^3). Rows are independent and
//! solved in parallel with rayon.
//!
//! Rows and columns with no signal at all are left at the zero vector,
//! so users and items without interactions train without numerical
//! failure and score at zero everywhere.

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::debug;

use signal_store::SparseMatrix;

use crate::TrainError;
use crate::config::AlsConfig;
use crate::model::FactorModel;
use crate::solver::cholesky_solve;
use crate::traits::FactorModelTrainer;

/// The in-crate ALS trainer.
#[derive(Debug, Clone, Default)]
pub struct AlsTrainer {
    config: AlsConfig,
}

impl AlsTrainer {
    pub fn new(config: AlsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AlsConfig {
        &self.config
    }
}

impl FactorModelTrainer for AlsTrainer {
    fn name(&self) -> &str {
        "AlsTrainer"
    }

    fn train(&self, interactions: &SparseMatrix) -> Result<FactorModel, TrainError> {
        self.config.validate()?;

        let (num_users, num_items) = interactions.shape();
        let k = self.config.factors;

        // Seeded initialization keeps training deterministic
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut user_factors = Array2::<f32>::zeros((num_users, k));
        let mut item_factors = Array2::<f32>::zeros((num_items, k));
        for value in user_factors.iter_mut() {
            *value = rng.gen_range(-0.1..0.1);
        }
        for value in item_factors.iter_mut() {
            *value = rng.gen_range(-0.1..0.1);
        }

        let user_rows = interactions.row_adjacency();
        let item_cols = interactions.col_adjacency();

        for iteration in 0..self.config.iterations {
            solve_side(&mut user_factors, &item_factors, &user_rows, &self.config)?;
            solve_side(&mut item_factors, &user_factors, &item_cols, &self.config)?;
            debug!(iteration, "Completed ALS sweep");
        }

        Ok(FactorModel {
            user_factors,
            item_factors,
            config: self.config,
        })
    }
}

/// Re-solve every row of `target` against the fixed side. `adjacency`
/// holds, per target row, the observed (fixed_index, weight) entries.
fn solve_side(
    target: &mut Array2<f32>,
    fixed: &Array2<f32>,
    adjacency: &[Vec<(usize, f32)>],
    config: &AlsConfig,
) -> Result<(), TrainError> {
    let k = config.factors;
    let lambda = f64::from(config.regularization);
    let alpha = f64::from(config.alpha);

    // Shared normal-equation base: Y^T Y + lambda*I
    let fixed64 = fixed.mapv(f64::from);
    let mut gram = fixed64.t().dot(&fixed64);
    for d in 0..k {
        gram[[d, d]] += lambda;
    }

    let solved: Result<Vec<Array1<f64>>, TrainError> = adjacency
        .par_iter()
        .map(|entries| {
            if entries.is_empty() {
                // No signal for this row
                return Ok(Array1::zeros(k));
            }
            let mut a = gram.clone();
            let mut b = Array1::<f64>::zeros(k);
            for &(fixed_index, weight) in entries {
                let confidence = 1.0 + alpha * f64::from(weight);
                let y = fixed64.row(fixed_index);
                for p in 0..k {
                    b[p] += confidence * y[p];
                    let scaled = (confidence - 1.0) * y[p];
                    for q in 0..k {
                        a[[p, q]] += scaled * y[q];
                    }
                }
            }
            cholesky_solve(&a, &b)
        })
        .collect();

    for (mut row, values) in target.outer_iter_mut().zip(solved?) {
        for (slot, value) in row.iter_mut().zip(values.iter()) {
            *slot = *value as f32;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use signal_store::SparseMatrix;

    fn small_interactions() -> SparseMatrix {
        // Two users with disjoint tastes plus one shared item.
        //   user 0: item 0 (heavy), item 2 (light)
        //   user 1: item 1 (heavy), item 2 (light)
        let mut matrix = SparseMatrix::zeros(2, 3);
        matrix.accumulate(0, 0, 5.0);
        matrix.accumulate(0, 2, 1.0);
        matrix.accumulate(1, 1, 5.0);
        matrix.accumulate(1, 2, 1.0);
        matrix
    }

    fn test_config() -> AlsConfig {
        AlsConfig {
            factors: 4,
            regularization: 0.1,
            iterations: 15,
            alpha: 1.0,
            seed: 7,
        }
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let trainer = AlsTrainer::new(AlsConfig {
            factors: 0,
            ..Default::default()
        });
        let matrix = small_interactions();
        assert!(matches!(
            trainer.train(&matrix),
            Err(TrainError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_training_is_deterministic_for_fixed_seed() {
        let trainer = AlsTrainer::new(test_config());
        let matrix = small_interactions();
        let a = trainer.train(&matrix).unwrap();
        let b = trainer.train(&matrix).unwrap();
        assert_eq!(a.user_factors, b.user_factors);
        assert_eq!(a.item_factors, b.item_factors);
    }

    #[test]
    fn test_seed_changes_initialization() {
        let matrix = small_interactions();
        let a = AlsTrainer::new(test_config()).train(&matrix).unwrap();
        let b = AlsTrainer::new(AlsConfig {
            seed: 8,
            ..test_config()
        })
        .train(&matrix)
        .unwrap();
        assert_ne!(a.user_factors, b.user_factors);
    }

    #[test]
    fn test_observed_items_score_higher() {
        let trainer = AlsTrainer::new(test_config());
        let model = trainer.train(&small_interactions()).unwrap();

        // Each user should prefer their own heavy item over the other
        // user's heavy item.
        assert!(model.score(0, 0) > model.score(0, 1));
        assert!(model.score(1, 1) > model.score(1, 0));
    }

    #[test]
    fn test_silent_rows_and_columns_get_zero_vectors() {
        // User 2 and item 3 have no signal at all
        let mut matrix = SparseMatrix::zeros(3, 4);
        matrix.accumulate(0, 0, 5.0);
        matrix.accumulate(1, 1, 5.0);
        matrix.accumulate(0, 2, 2.0);

        let model = AlsTrainer::new(test_config()).train(&matrix).unwrap();

        assert!(model.user_factors.row(2).iter().all(|&v| v == 0.0));
        assert!(model.item_factors.row(3).iter().all(|&v| v == 0.0));
        assert_eq!(model.score(2, 0), 0.0);
    }

    #[test]
    fn test_empty_matrix_trains_without_failure() {
        let matrix = SparseMatrix::zeros(0, 0);
        let model = AlsTrainer::new(test_config()).train(&matrix).unwrap();
        assert_eq!(model.num_users(), 0);
        assert_eq!(model.num_items(), 0);
        assert_eq!(model.factors(), 4);
    }

    #[test]
    fn test_full_iteration_count_runs() {
        // No early stop: a config with more iterations still converges to
        // a usable model and stays deterministic.
        let config = AlsConfig {
            iterations: 30,
            ..test_config()
        };
        let model = AlsTrainer::new(config).train(&small_interactions()).unwrap();
        assert!(model.score(0, 0).is_finite());
    }
}
