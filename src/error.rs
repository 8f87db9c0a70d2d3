//! Error types for the rules engine and its collaborators.

use crate::board::{Point, Stone};
use std::io;
use thiserror::Error;

/// A rejected transition. Apart from `TimeExpired`, returning one of these
/// guarantees the match was left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("point {0} is outside the board")]
    OutOfBounds(Point),

    #[error("point {0} is not empty")]
    OccupiedCell(Point),

    #[error("suicide move is not allowed")]
    SuicideMove,

    #[error("move recreates an earlier board position (positional superko)")]
    PositionalSuperkoViolation,

    /// The named color ran out of time; the match is now finished.
    #[error("{0} ran out of time")]
    TimeExpired(Stone),

    #[error("match is not waiting for players")]
    NotWaiting,

    #[error("cannot join your own match")]
    SelfJoin,

    #[error("match is full")]
    SeatFull,

    #[error("match has not started")]
    NotPlaying,

    #[error("match is over")]
    MatchOver,

    #[error("match is not finished yet")]
    NotFinished,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("match {0} not found")]
    NotFound(String),

    #[error("match {0} already exists")]
    AlreadyExists(String),

    #[error("corrupt match record: {0}")]
    Corrupt(String),

    #[error("storage I/O error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("advisor unavailable: {0}")]
    Unavailable(String),

    #[error("invalid advisor response: {0}")]
    InvalidResponse(String),

    #[error("advisor declined to suggest a move")]
    NoMove,
}

/// Everything the lobby can report back to a caller.
#[derive(Debug, Error)]
pub enum LobbyError {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Advisor(#[from] AdvisorError),

    #[error("not your turn or not a player in this match")]
    NotYourTurn,

    #[error("no move advisor configured")]
    AdvisorNotConfigured,
}

impl LobbyError {
    /// The underlying rules error, if this is one.
    pub fn game_error(&self) -> Option<&GameError> {
        match self {
            LobbyError::Game(e) => Some(e),
            _ => None,
        }
    }
}
