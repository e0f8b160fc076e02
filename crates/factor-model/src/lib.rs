//! # Factor Model Crate
//!
//! This crate fits latent-factor embeddings to a fused interaction matrix
//! via alternating least squares for implicit feedback.
//!
//! ## Main Components
//!
//! - **config**: Training hyperparameters (AlsConfig) and validation
//! - **traits**: The FactorModelTrainer abstraction the pipeline depends on
//! - **als**: The alternating-least-squares trainer
//! - **solver**: Dense Cholesky solver for the per-row k×k systems
//! - **model**: The trained FactorModel (user and item embeddings)
//!
//! ## Example Usage
//!
//! ```ignore
//! use factor_model::{AlsConfig, AlsTrainer, FactorModelTrainer};
//!
//! let trainer = AlsTrainer::new(AlsConfig::default());
//! let model = trainer.train(&interactions)?;
//! let score = model.score(user_index, item_index);
//! ```
//!
//! Training is a batch computation: one call over the full matrix, a
//! fixed number of sweeps, no partial progress. The resulting model is
//! immutable and safe to share across serving threads.

use thiserror::Error;

// Public modules
pub mod config;
pub mod traits;
pub mod solver;
pub mod model;
pub mod als;

// Re-export commonly used types for convenience
pub use als::AlsTrainer;
pub use config::AlsConfig;
pub use model::FactorModel;
pub use traits::FactorModelTrainer;

/// Errors that can occur during training
#[derive(Error, Debug)]
pub enum TrainError {
    /// Hyperparameters are out of range (fatal, nothing is clamped)
    #[error("Invalid training configuration: {0}")]
    InvalidConfig(String),

    /// A factor solve broke down numerically
    #[error("Numerical failure during training: {0}")]
    Numerical(String),
}
