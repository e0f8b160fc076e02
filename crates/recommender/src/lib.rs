//! # Recommender Crate
//!
//! This crate serves ranked recommendations from a trained factor model.
//!
//! ## Components
//!
//! - **snapshot**: The immutable ModelSnapshot (registry + interaction
//!   matrix + factor model) and the build_snapshot pipeline that creates it
//! - **filters**: Composable candidate filters (seen-item exclusion policy)
//! - **engine**: The Recommender: scoring, ranking, and the cold-start fallback
//!
//! ## Architecture
//! The engine follows a "train once, serve many" lifecycle:
//! 1. build_snapshot runs the full pipeline (registry → matrices →
//!    fusion → training) and yields an `Arc<ModelSnapshot>`
//! 2. A Recommender wraps the snapshot and answers any number of
//!    concurrent recommend() calls without locking
//! 3. Retraining means building a fresh snapshot and swapping the whole
//!    engine; the three snapshot parts are never replaced piecemeal
//!
//! ## Example Usage
//! ```ignore
//! use factor_model::AlsTrainer;
//! use recommender::{Recommender, build_snapshot};
//! use signal_store::{SignalWeights, load_signal_set};
//!
//! let signals = load_signal_set(Path::new("data"))?;
//! let snapshot = build_snapshot(&signals, &SignalWeights::default(), &AlsTrainer::default())?;
//! let engine = Recommender::new(snapshot);
//!
//! let result = engine.recommend(42, 10);
//! for item in &result.items {
//!     println!("{} ({:.3})", item.item_id, item.score);
//! }
//! ```

pub mod snapshot;
pub mod filters;
pub mod engine;

// Re-export main types
pub use engine::{Recommendation, Recommender, ScoredItem};
pub use filters::{Candidate, CandidateFilter, FilterChain, SeenItemsFilter};
pub use snapshot::{ModelSnapshot, build_snapshot};
