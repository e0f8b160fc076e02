//! Sparse signal matrices and weighted fusion.
//!
//! Each signal source becomes one sparse (num_users × num_items) matrix
//! of non-negative weights, indexed through the shared [`IdRegistry`].
//! The per-source matrices are then combined into a single interaction
//! matrix by an element-wise weighted sum.
//!
//! ## Example Usage
//! ```ignore
//! use signal_store::{build_signal_matrix, fuse, Aggregation, IdRegistry};
//!
//! let registry = IdRegistry::from_sources(&[&clicks, &orders, &ratings]);
//! let click_matrix = build_signal_matrix(&clicks, &registry, Aggregation::Sum)?;
//! let order_matrix = build_signal_matrix(&orders, &registry, Aggregation::Sum)?;
//! let rating_matrix = build_signal_matrix(&ratings, &registry, Aggregation::Sum)?;
//!
//! let interactions = fuse(&[
//!     (&click_matrix, 1.0),
//!     (&order_matrix, 5.0),
//!     (&rating_matrix, 3.0),
//! ])?;
//! ```

use std::collections::BTreeMap;

use crate::error::{Result, SignalError};
use crate::registry::IdRegistry;
use crate::types::Interaction;

/// How duplicate (user, item) coordinates combine within one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    /// Duplicate rows accumulate by summation. This is the behavior for
    /// event-count signals (repeated clicks add up) and matches how the
    /// explicit-rating source is combined as well.
    Sum,
    /// The latest row wins. Available for explicit signals where only the
    /// newest value should count; not used by the default pipeline.
    Replace,
}

/// A sparse (rows × cols) matrix of non-negative f32 weights.
///
/// Rows are stored as ordered maps from column index to value, which keeps
/// iteration order deterministic and makes duplicate-coordinate
/// accumulation a plain entry update rather than a post-hoc combine pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix {
    num_rows: usize,
    num_cols: usize,
    rows: Vec<BTreeMap<usize, f32>>,
}

impl SparseMatrix {
    /// Create an all-zero matrix of the given shape.
    pub fn zeros(num_rows: usize, num_cols: usize) -> Self {
        Self {
            num_rows,
            num_cols,
            rows: vec![BTreeMap::new(); num_rows],
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.num_rows, self.num_cols)
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Value at (row, col); zero for absent entries.
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.rows
            .get(row)
            .and_then(|r| r.get(&col))
            .copied()
            .unwrap_or(0.0)
    }

    /// Add `value` to the entry at (row, col). Out-of-bounds coordinates
    /// are a caller bug and panic; registry-resolved indices are always in
    /// bounds.
    pub fn accumulate(&mut self, row: usize, col: usize, value: f32) {
        assert!(row < self.num_rows && col < self.num_cols);
        *self.rows[row].entry(col).or_insert(0.0) += value;
    }

    /// Overwrite the entry at (row, col).
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        assert!(row < self.num_rows && col < self.num_cols);
        self.rows[row].insert(col, value);
    }

    /// Non-zero entries of one row, in ascending column order. An
    /// out-of-bounds row yields an empty iterator.
    pub fn row(&self, row: usize) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.rows
            .get(row)
            .into_iter()
            .flat_map(|r| r.iter().map(|(&col, &value)| (col, value)))
    }

    /// Number of stored (possibly zero-valued) entries.
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(|r| r.len()).sum()
    }

    /// Sum of all entries.
    pub fn total(&self) -> f32 {
        self.rows
            .iter()
            .flat_map(|r| r.values())
            .copied()
            .sum()
    }

    /// Per-column entry sums: the total fused weight each item has
    /// collected across all users. This is the popularity signal used by
    /// the cold-start fallback.
    pub fn col_sums(&self) -> Vec<f32> {
        let mut sums = vec![0.0f32; self.num_cols];
        for row in &self.rows {
            for (&col, &value) in row {
                sums[col] += value;
            }
        }
        sums
    }

    /// Rows as adjacency lists of (column, value) pairs.
    pub fn row_adjacency(&self) -> Vec<Vec<(usize, f32)>> {
        self.rows
            .iter()
            .map(|r| r.iter().map(|(&col, &value)| (col, value)).collect())
            .collect()
    }

    /// Columns as adjacency lists of (row, value) pairs.
    pub fn col_adjacency(&self) -> Vec<Vec<(usize, f32)>> {
        let mut cols = vec![Vec::new(); self.num_cols];
        for (row_index, row) in self.rows.iter().enumerate() {
            for (&col, &value) in row {
                cols[col].push((row_index, value));
            }
        }
        cols
    }
}

/// Build the sparse matrix for a single source.
///
/// Every record's identifiers are resolved through the shared registry;
/// an unresolvable identifier means the registry was not built from the
/// union including this source and aborts the build. The output shape is
/// exactly the registry shape, even when whole rows or columns stay zero.
pub fn build_signal_matrix(
    records: &[Interaction],
    registry: &IdRegistry,
    aggregation: Aggregation,
) -> Result<SparseMatrix> {
    let (num_users, num_items) = registry.shape();
    let mut matrix = SparseMatrix::zeros(num_users, num_items);

    for record in records {
        let user_index = registry
            .user_index(record.user_id)
            .ok_or(SignalError::UnknownUser(record.user_id))?;
        let item_index = registry
            .item_index(record.item_id)
            .ok_or(SignalError::UnknownItem(record.item_id))?;
        match aggregation {
            Aggregation::Sum => matrix.accumulate(user_index, item_index, record.value),
            Aggregation::Replace => matrix.set(user_index, item_index, record.value),
        }
    }

    Ok(matrix)
}

/// Element-wise weighted sum of per-source matrices.
///
/// All inputs must share the same shape; a disagreement is an internal
/// invariant violation (the matrices were not built from one registry)
/// and fails the whole fusion. A zero weight nullifies a source without
/// removing it from the call. No normalization is applied.
pub fn fuse(parts: &[(&SparseMatrix, f32)]) -> Result<SparseMatrix> {
    let (num_rows, num_cols) = match parts.first() {
        Some((matrix, _)) => matrix.shape(),
        None => (0, 0),
    };

    let mut fused = SparseMatrix::zeros(num_rows, num_cols);
    for (matrix, weight) in parts {
        if matrix.shape() != (num_rows, num_cols) {
            return Err(SignalError::ShapeMismatch {
                expected: (num_rows, num_cols),
                found: matrix.shape(),
            });
        }
        for (row_index, row) in matrix.rows.iter().enumerate() {
            for (&col, &value) in row {
                fused.accumulate(row_index, col, weight * value);
            }
        }
    }
    Ok(fused)
}
