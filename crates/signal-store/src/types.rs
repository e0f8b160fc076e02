//! Core domain types for interaction signals.
//!
//! This module defines the record shapes shared by every signal source.
//! Identifiers are externally assigned and arbitrary: they are neither
//! dense nor contiguous, which is why the [`crate::registry`] module exists.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SignalError};

// =============================================================================
// Type Aliases
// =============================================================================
// These make the domain clearer and prevent mixing up user IDs with item IDs

/// Externally-assigned identifier for a user (arbitrary integer)
pub type UserId = i64;

/// Externally-assigned identifier for an item (arbitrary integer)
pub type ItemId = i64;

// =============================================================================
// Interaction Records
// =============================================================================

/// One aggregated (user, item, value) row emitted by a signal source.
///
/// The meaning of `value` depends on the source: an event count for click
/// and order signals, the explicit scale value for ratings. Values are
/// always non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub value: f32,
}

impl Interaction {
    pub fn new(user_id: UserId, item_id: ItemId, value: f32) -> Self {
        Self {
            user_id,
            item_id,
            value,
        }
    }
}

/// The three signal sources the engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    Clicks,
    Orders,
    Ratings,
}

impl SignalKind {
    /// File name this source is loaded from in a signal directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            SignalKind::Clicks => "clicks.csv",
            SignalKind::Orders => "orders.csv",
            SignalKind::Ratings => "ratings.csv",
        }
    }
}

/// The full set of raw records for one training run, one collection per
/// source. The collection order here (clicks, orders, ratings) is the
/// fixed scan order used for dense index assignment.
#[derive(Debug, Clone, Default)]
pub struct SignalSet {
    pub clicks: Vec<Interaction>,
    pub orders: Vec<Interaction>,
    pub ratings: Vec<Interaction>,
}

impl SignalSet {
    /// All record collections in their canonical scan order.
    pub fn record_sets(&self) -> [&[Interaction]; 3] {
        [&self.clicks, &self.orders, &self.ratings]
    }

    /// Record counts per source, for logging and validation.
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.clicks.len(), self.orders.len(), self.ratings.len())
    }

    pub fn is_empty(&self) -> bool {
        self.clicks.is_empty() && self.orders.is_empty() && self.ratings.is_empty()
    }
}

// =============================================================================
// Fusion Weights
// =============================================================================

/// Per-source weights applied when fusing signal matrices.
///
/// Orders carry the strongest purchase intent, ratings are explicit but
/// sparse, clicks are plentiful but noisy. The defaults encode that
/// ordering; deployments can override them without touching the fusion
/// algorithm itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalWeights {
    pub clicks: f32,
    pub orders: f32,
    pub ratings: f32,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            clicks: 1.0,
            orders: 5.0,
            ratings: 3.0,
        }
    }
}

impl SignalWeights {
    /// Weights must be non-negative and finite.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("clicks weight", self.clicks),
            ("orders weight", self.orders),
            ("ratings weight", self.ratings),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SignalError::InvalidValue {
                    field: field.to_string(),
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }
}
