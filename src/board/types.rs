//! Board data structures.
//!
//! 19x19 grid; a cell is `Option<Stone>` where `None` is an empty point.

use serde::{Deserialize, Serialize};
use std::fmt;

pub use crate::constants::BOARD_SIZE;

/// Stone color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stone {
    Black,
    White,
}

impl Stone {
    pub fn opponent(&self) -> Self {
        match self {
            Stone::Black => Stone::White,
            Stone::White => Stone::Black,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Stone::Black => "Black",
            Stone::White => "White",
        }
    }

    /// Numeric code used on the wire: 1 = Black, 2 = White.
    pub fn code(&self) -> u8 {
        match self {
            Stone::Black => 1,
            Stone::White => 2,
        }
    }

    /// Inverse of [`Stone::code`].
    pub fn from_code(code: u8) -> Option<Stone> {
        match code {
            1 => Some(Stone::Black),
            2 => Some(Stone::White),
            _ => None,
        }
    }
}

impl fmt::Display for Stone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Wire code for a cell: 0 = empty, 1 = Black, 2 = White.
pub fn cell_code(cell: Option<Stone>) -> u8 {
    cell.map_or(0, |stone| stone.code())
}

/// A board coordinate. `x` is the column, `y` the row, both 0-indexed.
///
/// Signed so that out-of-range requests from callers stay representable and
/// can be rejected with a proper error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn in_bounds(&self) -> bool {
        (0..BOARD_SIZE as i32).contains(&self.x) && (0..BOARD_SIZE as i32).contains(&self.y)
    }

    /// Grid indices as (row, col), or `None` when off the board.
    pub fn index(&self) -> Option<(usize, usize)> {
        self.in_bounds().then_some((self.y as usize, self.x as usize))
    }

    /// On-board orthogonal neighbours (2 in a corner, 3 on an edge, 4 inside).
    pub fn neighbors(self) -> impl Iterator<Item = Point> {
        [(-1, 0), (1, 0), (0, -1), (0, 1)]
            .into_iter()
            .map(move |(dx, dy)| Point::new(self.x + dx, self.y + dy))
            .filter(Point::in_bounds)
    }

    pub fn is_adjacent(&self, other: &Point) -> bool {
        (self.x - other.x).abs() + (self.y - other.y).abs() == 1
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Every on-board point, row by row.
pub fn all_points() -> impl Iterator<Item = Point> {
    (0..BOARD_SIZE as i32).flat_map(|y| (0..BOARD_SIZE as i32).map(move |x| Point::new(x, y)))
}
