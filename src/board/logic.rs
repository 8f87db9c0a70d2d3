//! Board Engine: placement legality, capture search and position fingerprints.

use super::types::{all_points, cell_code, Point, Stone, BOARD_SIZE};
use crate::error::GameError;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

type Grid = [[Option<Stone>; BOARD_SIZE]; BOARD_SIZE];

/// Canonical encoding of a whole-board position, used as the superko key.
///
/// One character per cell, row by row: `0` empty, `1` Black, `2` White.
/// Equal stone layouts always produce equal fingerprints.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A 19x19 grid of stones.
///
/// `Clone` is a full independent copy; the match state machine tries every
/// move on a clone and only keeps it once all checks pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    grid: Grid,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            grid: [[None; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// Stone at `point`; `None` for an empty or off-board point.
    pub fn stone_at(&self, point: Point) -> Option<Stone> {
        point.index().and_then(|(row, col)| self.grid[row][col])
    }

    pub fn is_empty_at(&self, point: Point) -> bool {
        point.in_bounds() && self.stone_at(point).is_none()
    }

    /// Set a cell directly, bypassing every rule. Used to build fixed positions.
    pub fn set_stone(&mut self, point: Point, cell: Option<Stone>) -> Result<(), GameError> {
        let (row, col) = point.index().ok_or(GameError::OutOfBounds(point))?;
        self.grid[row][col] = cell;
        Ok(())
    }

    fn set(&mut self, point: Point, cell: Option<Stone>) {
        if let Some((row, col)) = point.index() {
            self.grid[row][col] = cell;
        }
    }

    /// Place a stone of `stone`'s color at `point` and resolve captures.
    ///
    /// Order is: place, remove adjacent opposing groups left without
    /// liberties, then test the placed stone's own group. A move that captures
    /// is therefore legal even if the stone had no liberties before the
    /// capture. On `SuicideMove` the board is restored exactly.
    ///
    /// Returns the number of stones captured.
    pub fn place_stone(&mut self, stone: Stone, point: Point) -> Result<usize, GameError> {
        let (row, col) = point.index().ok_or(GameError::OutOfBounds(point))?;
        if self.grid[row][col].is_some() {
            return Err(GameError::OccupiedCell(point));
        }

        self.grid[row][col] = Some(stone);

        let opponent = stone.opponent();
        let mut captured: Vec<Point> = Vec::new();
        for neighbor in point.neighbors() {
            // A group bordering the stone twice is already gone on the second visit
            if self.stone_at(neighbor) != Some(opponent) {
                continue;
            }
            let (group, liberties) = self.group_and_liberties(neighbor);
            if liberties == 0 {
                for &p in &group {
                    self.set(p, None);
                }
                captured.extend(group);
            }
        }

        let (_, own_liberties) = self.group_and_liberties(point);
        if own_liberties == 0 {
            self.grid[row][col] = None;
            for &p in &captured {
                self.set(p, Some(opponent));
            }
            return Err(GameError::SuicideMove);
        }

        Ok(captured.len())
    }

    /// Breadth-first search from `start` over same-colored stones.
    ///
    /// Returns the group's stones and its liberty count. Each empty point is
    /// counted once however many group stones touch it. An empty or off-board
    /// start yields an empty group with zero liberties.
    pub fn group_and_liberties(&self, start: Point) -> (Vec<Point>, usize) {
        let Some(color) = self.stone_at(start) else {
            return (Vec::new(), 0);
        };

        let mut in_group = [[false; BOARD_SIZE]; BOARD_SIZE];
        let mut is_liberty = [[false; BOARD_SIZE]; BOARD_SIZE];
        let mut liberties = 0;
        let mut group = Vec::new();
        let mut queue = VecDeque::from([start]);
        mark(&mut in_group, start);

        while let Some(current) = queue.pop_front() {
            group.push(current);
            for neighbor in current.neighbors() {
                match self.stone_at(neighbor) {
                    None => {
                        if mark(&mut is_liberty, neighbor) {
                            liberties += 1;
                        }
                    }
                    Some(s) if s == color => {
                        if mark(&mut in_group, neighbor) {
                            queue.push_back(neighbor);
                        }
                    }
                    Some(_) => {}
                }
            }
        }

        (group, liberties)
    }

    /// Liberty count of the group containing `point`.
    pub fn liberties_at(&self, point: Point) -> usize {
        self.group_and_liberties(point).1
    }

    pub fn fingerprint(&self) -> Fingerprint {
        let mut key = String::with_capacity(BOARD_SIZE * BOARD_SIZE);
        for row in &self.grid {
            for &cell in row {
                key.push(char::from(b'0' + cell_code(cell)));
            }
        }
        Fingerprint(key)
    }

    /// Number of stones of the given color on the board.
    pub fn count(&self, stone: Stone) -> usize {
        self.grid
            .iter()
            .flatten()
            .filter(|&&cell| cell == Some(stone))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.iter().flatten().all(Option::is_none)
    }

    /// Empty points, row by row.
    pub fn empty_points(&self) -> Vec<Point> {
        all_points().filter(|&p| self.is_empty_at(p)).collect()
    }

    /// Row-major wire codes (`grid[y][x]`): 0 empty, 1 Black, 2 White.
    pub fn to_codes(&self) -> Vec<Vec<u8>> {
        self.grid
            .iter()
            .map(|row| row.iter().map(|&cell| cell_code(cell)).collect())
            .collect()
    }
}

/// Mark a point visited; returns true if it was not visited before.
fn mark(visited: &mut [[bool; BOARD_SIZE]; BOARD_SIZE], point: Point) -> bool {
    match point.index() {
        Some((row, col)) if !visited[row][col] => {
            visited[row][col] = true;
            true
        }
        _ => false,
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for x in 0..BOARD_SIZE {
            write!(f, "{:2} ", x)?;
        }
        writeln!(f)?;
        for (y, row) in self.grid.iter().enumerate() {
            write!(f, "{:2} ", y)?;
            for cell in row {
                let symbol = match cell {
                    None => " . ",
                    Some(Stone::Black) => " X ",
                    Some(Stone::White) => " O ",
                };
                f.write_str(symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
