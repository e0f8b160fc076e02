//! # Signal Store Crate
//!
//! This crate turns heterogeneous raw interaction signals (clicks, orders,
//! explicit ratings) into one weighted sparse interaction matrix.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Interaction, SignalSet, SignalWeights)
//! - **parser**: Parse flat signal files into record sets
//! - **registry**: Bijective raw-id to dense-index mappings
//! - **matrix**: Sparse matrix construction, aggregation, and fusion
//! - **error**: Error types for signal loading and matrix building
//!
//! ## Example Usage
//!
//! ```ignore
//! use signal_store::{
//!     build_signal_matrix, fuse, load_signal_set, Aggregation, IdRegistry,
//!     SignalWeights,
//! };
//! use std::path::Path;
//!
//! let signals = load_signal_set(Path::new("data"))?;
//! let registry = IdRegistry::from_sources(&signals.record_sets());
//!
//! let clicks = build_signal_matrix(&signals.clicks, &registry, Aggregation::Sum)?;
//! let orders = build_signal_matrix(&signals.orders, &registry, Aggregation::Sum)?;
//! let ratings = build_signal_matrix(&signals.ratings, &registry, Aggregation::Sum)?;
//!
//! let weights = SignalWeights::default();
//! let interactions = fuse(&[
//!     (&clicks, weights.clicks),
//!     (&orders, weights.orders),
//!     (&ratings, weights.ratings),
//! ])?;
//! ```
//!
//! The registry and the matrices built from it form one consistent index
//! space; neither is ever rebuilt independently of the other.

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod registry;
pub mod matrix;

// Re-export commonly used types for convenience
pub use error::{Result, SignalError};
pub use matrix::{Aggregation, SparseMatrix, build_signal_matrix, fuse};
pub use parser::{load_signal_set, parse_interactions};
pub use registry::{IdMap, IdRegistry};
pub use types::{Interaction, ItemId, SignalKind, SignalSet, SignalWeights, UserId};
