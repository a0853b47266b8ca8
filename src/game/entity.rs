//! Rectangle entities and pair bookkeeping

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rgba;

/// A single tappable rectangle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub id: u32,
    /// Shared with exactly one other live rectangle
    pub pair_id: u32,
    /// Width and height, fixed at creation
    pub size: Vec2,
    /// Top-left corner, fixed at creation
    pub pos: Vec2,
    /// Fill color, fixed at creation (both pair members share it)
    pub color: Rgba,
    /// Showing the first-pick marker
    pub revealed: bool,
    /// Matched and eligible for fade-out/disposal
    pub removed: bool,
}

impl Rect {
    pub fn new(id: u32, pair_id: u32, size: Vec2, pos: Vec2, color: Rgba) -> Self {
        Self {
            id,
            pair_id,
            size,
            pos,
            color,
            revealed: false,
            removed: false,
        }
    }
}

/// Symmetric id -> partner-id map for live pairs.
///
/// Entries are inserted and removed a pair at a time: if A maps to B then B
/// maps to A. Only session methods touch this; it is never handed to the
/// presentation layer.
#[derive(Debug, Clone, Default)]
pub struct PairRegistry {
    partners: HashMap<u32, u32>,
}

impl PairRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new pair. Both ids must be distinct and unregistered.
    pub fn insert_pair(&mut self, a: u32, b: u32) {
        debug_assert!(a != b, "a rectangle cannot pair with itself");
        debug_assert!(!self.partners.contains_key(&a) && !self.partners.contains_key(&b));
        self.partners.insert(a, b);
        self.partners.insert(b, a);
    }

    /// Partner of `id`, if `id` belongs to a live pair
    pub fn partner_of(&self, id: u32) -> Option<u32> {
        self.partners.get(&id).copied()
    }

    /// Drop both entries of the pair containing `id`, returning `(id, partner)`
    pub fn remove_pair(&mut self, id: u32) -> Option<(u32, u32)> {
        let partner = self.partners.remove(&id)?;
        self.partners.remove(&partner);
        Some((id, partner))
    }

    pub fn contains(&self, id: u32) -> bool {
        self.partners.contains_key(&id)
    }

    pub fn clear(&mut self) {
        self.partners.clear();
    }

    /// Number of registered ids (twice the number of live pairs)
    pub fn len(&self) -> usize {
        self.partners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partners.is_empty()
    }

    /// True if every entry has a matching reverse entry
    pub fn is_symmetric(&self) -> bool {
        self.partners
            .iter()
            .all(|(id, partner)| self.partners.get(partner) == Some(id))
    }
}
