//! Grid coordinates.

use crate::GRID_SIZE;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell on the grid.
///
/// `x` is the column and `y` is the row, so a record with `x = 3, y = 7`
/// lands in row 7, column 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    x: usize,
    y: usize,
}

#[derive(Deserialize)]
struct RawCoordinate {
    x: usize,
    y: usize,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = String;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.x, raw.y).ok_or_else(|| {
            format!("({}, {}) is outside the {GRID_SIZE}x{GRID_SIZE} grid", raw.x, raw.y)
        })
    }
}

impl Coordinate {
    /// Create a coordinate, returning `None` if it falls outside the grid.
    pub fn new(x: usize, y: usize) -> Option<Self> {
        if x < GRID_SIZE && y < GRID_SIZE {
            Some(Self { x, y })
        } else {
            None
        }
    }

    /// Build a coordinate from signed parsed values.
    pub fn from_signed(x: i64, y: i64) -> Option<Self> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        Self::new(x, y)
    }

    pub const fn x(&self) -> usize {
        self.x
    }

    pub const fn y(&self) -> usize {
        self.y
    }

    /// Matrix row this coordinate addresses.
    pub const fn row(&self) -> usize {
        self.y
    }

    /// Matrix column this coordinate addresses.
    pub const fn col(&self) -> usize {
        self.x
    }

    /// Flat index into a row-major `GRID_SIZE * GRID_SIZE` buffer.
    pub(crate) const fn index(&self) -> usize {
        self.y * GRID_SIZE + self.x
    }

    /// Iterate every coordinate in row-major order.
    pub fn all() -> impl Iterator<Item = Coordinate> {
        (0..GRID_SIZE).flat_map(|y| (0..GRID_SIZE).map(move |x| Coordinate { x, y }))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
