//! Validated claims.

use crate::coord::Coordinate;
use serde::{Deserialize, Serialize};

/// A validated claim on one cell.
///
/// `color` is an opaque token; nothing checks that it is a real color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub coordinate: Coordinate,
    pub color: String,
    /// Claim counter, always at least 1.
    pub quantity: u64,
}

impl Claim {
    /// Create a claim.
    pub fn new(coordinate: Coordinate, color: impl Into<String>, quantity: u64) -> Self {
        Self {
            coordinate,
            color: color.into(),
            quantity,
        }
    }

    /// Check if this claim outranks the current occupant of its cell.
    ///
    /// Strictly greater only: an equal quantity never displaces.
    pub fn supersedes(&self, occupant: &Self) -> bool {
        self.quantity > occupant.quantity
    }

    /// Replace `self` with `other` if `other` supersedes it.
    /// Returns true if self was updated.
    pub fn merge(&mut self, other: Self) -> bool {
        if other.supersedes(self) {
            *self = other;
            true
        } else {
            false
        }
    }
}
