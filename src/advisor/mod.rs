//! Move advisory: suggested moves and alternative scoring from an engine.
//!
//! Advisor failures never touch a match; callers just report them.

pub mod local;
pub mod remote;

pub use local::RandomAdvisor;
pub use remote::RemoteAdvisor;

use crate::board::{Board, Fingerprint, Point, ScoreResult, Stone};
use crate::error::AdvisorError;
use crate::game::Match;

/// What an advisor sees of a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdviceRequest {
    pub board: Board,
    pub next_player: Stone,
    /// Every position seen so far, sorted.
    pub history: Vec<Fingerprint>,
}

impl AdviceRequest {
    pub fn from_match(game: &Match) -> Self {
        Self {
            board: game.board().clone(),
            next_player: game.next_player(),
            history: game.history(),
        }
    }
}

pub trait MoveAdvisor: Send + Sync {
    /// A move for `request.next_player`, or `None` to pass.
    fn suggest_move(&self, request: &AdviceRequest) -> Result<Option<Point>, AdvisorError>;

    /// Score a finished position.
    fn score(&self, board: &Board) -> Result<ScoreResult, AdvisorError>;
}
