//! In-process advisor that plays a random legal move.

use super::{AdviceRequest, MoveAdvisor};
use crate::board::{score_area, Board, Point, ScoreResult};
use crate::error::AdvisorError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use std::collections::HashSet;
use std::sync::Mutex;

/// Picks uniformly among placements that are legal under the full rules
/// (bounds, occupancy, suicide and positional superko). Passes when none are.
pub struct RandomAdvisor {
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl Default for RandomAdvisor {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomAdvisor {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_rng(rng: impl RngCore + Send + 'static) -> Self {
        Self {
            rng: Mutex::new(Box::new(rng)),
        }
    }
}

/// All placements for the side to move that the match would accept.
pub fn legal_moves(request: &AdviceRequest) -> Vec<Point> {
    let seen: HashSet<&str> = request.history.iter().map(|f| f.as_str()).collect();
    request
        .board
        .empty_points()
        .into_iter()
        .filter(|&point| {
            let mut trial = request.board.clone();
            trial.place_stone(request.next_player, point).is_ok()
                && !seen.contains(trial.fingerprint().as_str())
        })
        .collect()
}

impl MoveAdvisor for RandomAdvisor {
    fn suggest_move(&self, request: &AdviceRequest) -> Result<Option<Point>, AdvisorError> {
        let mut candidates = legal_moves(request);
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        candidates.shuffle(&mut *rng);
        Ok(candidates.first().copied())
    }

    fn score(&self, board: &Board) -> Result<ScoreResult, AdvisorError> {
        Ok(score_area(board))
    }
}
