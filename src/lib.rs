//! Weiqi - 19x19 Go rules engine
//!
//! Board legality and captures, the match state machine (turns, passes,
//! positional superko, clocks, lifecycle), area scoring, and the store and
//! advisor seams the engine is driven through.

pub mod advisor;
pub mod board;
pub mod build_info;
pub mod config;
pub mod constants;
pub mod error;
pub mod game;
pub mod lobby;
pub mod storage;

pub use board::{Board, Point, ScoreResult, Stone, BOARD_SIZE};
pub use error::{AdvisorError, GameError, LobbyError, StoreError};
pub use game::{Clock, Match, MatchConfig, MatchSnapshot, MatchStatus, Seat, SystemClock};
pub use lobby::Lobby;
