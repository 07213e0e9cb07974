//! Grid coordinates and bounds.
//!
//! The survey area is a rectangular, 4-connected grid. [`Coordinate`] is the
//! join key shared by every data layer; [`GridBounds`] fixes the extent used
//! for bounds checks, neighbour generation, and heatmap allocation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Allowed moves: down, up, right, left. No diagonals.
const DIRECTIONS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Row/column position on the survey grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub row: usize,
    pub col: usize,
}

impl Coordinate {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Axis-aligned neighbours that fall inside `bounds`, in the fixed
    /// down/up/right/left order.
    pub fn neighbours(self, bounds: GridBounds) -> impl Iterator<Item = Coordinate> {
        DIRECTIONS.into_iter().filter_map(move |(dr, dc)| {
            let row = self.row.checked_add_signed(dr)?;
            let col = self.col.checked_add_signed(dc)?;
            let next = Coordinate::new(row, col);
            bounds.contains(next).then_some(next)
        })
    }

    /// Manhattan distance, i.e. the minimum number of grid steps between two
    /// coordinates when no cell is missing.
    pub fn manhattan(self, other: Coordinate) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl From<(usize, usize)> for Coordinate {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Error returned when a coordinate string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCoordinateError(String);

impl fmt::Display for ParseCoordinateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid coordinate '{}': expected ROW,COL (for example 3,12)",
            self.0
        )
    }
}

impl std::error::Error for ParseCoordinateError {}

impl FromStr for Coordinate {
    type Err = ParseCoordinateError;

    /// Accepts `R,C`, `(R,C)` and `(R, C)`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseCoordinateError(s.to_string());
        let inner = s
            .trim()
            .trim_start_matches('(')
            .trim_end_matches(')')
            .trim();
        let (row, col) = inner.split_once(',').ok_or_else(err)?;
        let row = row.trim().parse::<usize>().map_err(|_| err())?;
        let col = col.trim().parse::<usize>().map_err(|_| err())?;
        Ok(Coordinate::new(row, col))
    }
}

/// Rectangular grid extent: valid coordinates lie in `[0, rows) × [0, cols)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridBounds {
    pub rows: usize,
    pub cols: usize,
}

impl GridBounds {
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }

    /// Total number of coordinates in the rectangle, saturating at
    /// `usize::MAX`.
    pub fn area(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }
}
