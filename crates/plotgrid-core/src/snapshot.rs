//! Grid snapshots.

use crate::claim::Claim;
use crate::coord::Coordinate;
use crate::GRID_SIZE;
use serde::{Serialize, Serializer};

/// A `GRID_SIZE x GRID_SIZE` matrix of optional claims.
///
/// Built fresh by every reconciliation pass and handed out read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridSnapshot {
    cells: Vec<Option<Claim>>,
}

impl Default for GridSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl GridSnapshot {
    /// A snapshot with every cell empty.
    pub fn empty() -> Self {
        Self {
            cells: vec![None; GRID_SIZE * GRID_SIZE],
        }
    }

    /// Fold a claim into its cell.
    ///
    /// The claim is written if the cell is empty or the occupant has a
    /// strictly lower quantity. Returns true if the cell changed.
    pub(crate) fn apply(&mut self, claim: Claim) -> bool {
        let slot = &mut self.cells[claim.coordinate.index()];
        match slot {
            Some(occupant) => occupant.merge(claim),
            None => {
                *slot = Some(claim);
                true
            }
        }
    }

    /// The claim occupying `coordinate`, if any.
    pub fn get(&self, coordinate: Coordinate) -> Option<&Claim> {
        self.cells.get(coordinate.index())?.as_ref()
    }

    /// The claim at matrix position (`row`, `col`), if any.
    pub fn at(&self, row: usize, col: usize) -> Option<&Claim> {
        Coordinate::new(col, row).and_then(|c| self.get(c))
    }

    /// Rows in order, each a slice of `GRID_SIZE` cells.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<Claim>]> {
        self.cells.chunks(GRID_SIZE)
    }

    /// Every occupied cell in row-major order.
    pub fn claims(&self) -> impl Iterator<Item = &Claim> {
        self.cells.iter().flatten()
    }

    /// Number of occupied cells.
    pub fn filled(&self) -> usize {
        self.claims().count()
    }

    pub fn is_empty(&self) -> bool {
        self.filled() == 0
    }
}

impl Serialize for GridSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows())
    }
}
