//! Identifier registry: raw external ids to dense matrix indices.
//!
//! Raw user and item identifiers are arbitrary integers. Matrix rows and
//! columns need dense, zero-based, contiguous indices. This module builds
//! the bijection between the two, pooled across every signal source, so
//! that a given raw id maps to exactly one index for the lifetime of a
//! training run.
//!
//! The registry is built once per run and never mutated afterwards. Every
//! signal matrix and the fused interaction matrix index into the same
//! registry; rebuilding it independently of those matrices would silently
//! shear the index space.

use std::collections::HashMap;

use crate::types::{Interaction, ItemId, UserId};

/// A typed bijection between raw identifiers and dense indices.
///
/// ## Design Note
/// Forward lookups go through a `HashMap`, the inverse is a plain `Vec`
/// indexed by dense index. Indices are assigned in first-seen order, so a
/// fixed input order yields an identical mapping on every build.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IdMap {
    forward: HashMap<i64, usize>,
    inverse: Vec<i64>,
}

impl IdMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a raw id, returning its dense index. Re-inserting a known id
    /// returns the index assigned on first sight.
    pub fn insert(&mut self, raw: i64) -> usize {
        match self.forward.get(&raw) {
            Some(&index) => index,
            None => {
                let index = self.inverse.len();
                self.forward.insert(raw, index);
                self.inverse.push(raw);
                index
            }
        }
    }

    /// Dense index for a raw id, if it has been registered.
    pub fn index_of(&self, raw: i64) -> Option<usize> {
        self.forward.get(&raw).copied()
    }

    /// Raw id for a dense index, if it is in bounds.
    pub fn raw_of(&self, index: usize) -> Option<i64> {
        self.inverse.get(index).copied()
    }

    /// All registered raw ids, in dense index order.
    pub fn raw_ids(&self) -> &[i64] {
        &self.inverse
    }

    pub fn len(&self) -> usize {
        self.inverse.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inverse.is_empty()
    }
}

/// Independent user and item mappings covering the union of identifiers
/// observed across all sources supplied at build time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IdRegistry {
    users: IdMap,
    items: IdMap,
}

impl IdRegistry {
    /// Build a registry from one or more record collections.
    ///
    /// Collections are scanned in the order given; within a collection,
    /// records are scanned front to back. That scan order is the dense
    /// index assignment order, which makes the mapping deterministic for
    /// a fixed input order.
    ///
    /// Empty input is valid and yields an empty registry.
    pub fn from_sources(sources: &[&[Interaction]]) -> Self {
        let mut users = IdMap::new();
        let mut items = IdMap::new();
        for source in sources {
            for record in *source {
                users.insert(record.user_id);
                items.insert(record.item_id);
            }
        }
        Self { users, items }
    }

    pub fn num_users(&self) -> usize {
        self.users.len()
    }

    pub fn num_items(&self) -> usize {
        self.items.len()
    }

    /// Matrix shape implied by this registry: (num_users, num_items).
    pub fn shape(&self) -> (usize, usize) {
        (self.users.len(), self.items.len())
    }

    pub fn user_index(&self, user_id: UserId) -> Option<usize> {
        self.users.index_of(user_id)
    }

    pub fn item_index(&self, item_id: ItemId) -> Option<usize> {
        self.items.index_of(item_id)
    }

    pub fn user_id(&self, index: usize) -> Option<UserId> {
        self.users.raw_of(index)
    }

    pub fn item_id(&self, index: usize) -> Option<ItemId> {
        self.items.raw_of(index)
    }

    /// All known user ids in dense index order (diagnostic listing surface).
    pub fn known_users(&self) -> &[UserId] {
        self.users.raw_ids()
    }

    /// All known item ids in dense index order.
    pub fn known_items(&self) -> &[ItemId] {
        self.items.raw_ids()
    }
}
