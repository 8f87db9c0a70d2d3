//! Area scoring (stones + surrounded territory, Chinese counting).
//!
//! Every stone left on the board is treated as alive; there is no dead-stone
//! removal.

use super::logic::Board;
use super::types::{all_points, Point, Stone, BOARD_SIZE};
use crate::constants::{BOARD_AREA, WHITE_COMPENSATION};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Final tally of a finished match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub black_score: f64,
    /// Includes the komi compensation.
    pub white_score: f64,
    pub winner: Stone,
}

/// Score Black must strictly exceed to win: half the board plus half komi.
pub fn win_threshold(board_area: usize) -> f64 {
    board_area as f64 / 2.0 + WHITE_COMPENSATION
}

/// Count stones and single-color territory for both sides.
pub fn score_area(board: &Board) -> ScoreResult {
    let (black_territory, white_territory) = territory(board);
    let black_score = (board.count(Stone::Black) + black_territory) as f64;
    let white_score = (board.count(Stone::White) + white_territory) as f64 + WHITE_COMPENSATION;

    let winner = if black_score > win_threshold(BOARD_AREA) {
        Stone::Black
    } else {
        Stone::White
    };

    ScoreResult {
        black_score,
        white_score,
        winner,
    }
}

/// Flood-fill each empty region and credit it to the only color bordering it.
/// Regions bordered by both colors (or by none) belong to nobody.
fn territory(board: &Board) -> (usize, usize) {
    let mut visited = [[false; BOARD_SIZE]; BOARD_SIZE];
    let mut black = 0;
    let mut white = 0;

    for start in all_points() {
        let Some((row, col)) = start.index() else {
            continue;
        };
        if visited[row][col] || !board.is_empty_at(start) {
            continue;
        }
        visited[row][col] = true;

        let mut queue = VecDeque::from([start]);
        let mut area = 0;
        let mut touches_black = false;
        let mut touches_white = false;

        while let Some(current) = queue.pop_front() {
            area += 1;
            for neighbor in current.neighbors() {
                match board.stone_at(neighbor) {
                    Some(Stone::Black) => touches_black = true,
                    Some(Stone::White) => touches_white = true,
                    None => {
                        if visit(&mut visited, neighbor) {
                            queue.push_back(neighbor);
                        }
                    }
                }
            }
        }

        match (touches_black, touches_white) {
            (true, false) => black += area,
            (false, true) => white += area,
            _ => {}
        }
    }

    (black, white)
}

fn visit(visited: &mut [[bool; BOARD_SIZE]; BOARD_SIZE], point: Point) -> bool {
    let Some((row, col)) = point.index() else {
        return false;
    };
    !std::mem::replace(&mut visited[row][col], true)
}
