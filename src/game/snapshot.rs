//! Wire representations of a match for callers and listings.
//!
//! Snapshots never carry the positional history.

use super::state::{Match, MatchStatus, Seat};
use crate::board::{Point, Stone};
use crate::constants::ENGINE_SEAT_NAME;
use serde::{Deserialize, Serialize};

/// Body of a move request: `{"x": 3, "y": 4}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub x: i32,
    pub y: i32,
}

impl From<MoveRequest> for Point {
    fn from(request: MoveRequest) -> Self {
        Point::new(request.x, request.y)
    }
}

fn seat_label(seat: &Seat) -> Option<String> {
    match seat {
        Seat::Open => None,
        Seat::Engine => Some(ENGINE_SEAT_NAME.to_string()),
        Seat::Participant(id) => Some(id.clone()),
    }
}

/// Player-visible state of one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    /// Row-major cell codes, `board[y][x]`: 0 empty, 1 Black, 2 White.
    pub board: Vec<Vec<u8>>,
    pub next_player: Stone,
    pub passes: u8,
    pub game_over: bool,
    pub captures_by_black: u32,
    pub captures_by_white: u32,
    pub player_black_id: Option<String>,
    pub player_white_id: Option<String>,
    pub status: MatchStatus,
    pub is_ai_game: bool,
    pub black_time_left: i64,
    pub white_time_left: i64,
    pub last_move_time: Option<i64>,
    pub time_per_player: i64,
    pub timed_out: Option<Stone>,
}

impl From<&Match> for MatchSnapshot {
    fn from(game: &Match) -> Self {
        Self {
            board: game.board().to_codes(),
            next_player: game.next_player(),
            passes: game.passes(),
            game_over: game.is_over(),
            captures_by_black: game.captures(Stone::Black),
            captures_by_white: game.captures(Stone::White),
            player_black_id: seat_label(game.seat(Stone::Black)),
            player_white_id: seat_label(game.seat(Stone::White)),
            status: game.status(),
            is_ai_game: game.is_engine_match(),
            black_time_left: game.time_left(Stone::Black),
            white_time_left: game.time_left(Stone::White),
            last_move_time: game.last_update(),
            time_per_player: game.time_per_player(),
            timed_out: game.timed_out(),
        }
    }
}

/// One row of a match listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchInfo {
    pub id: String,
    pub player_black: Option<String>,
    pub player_white: Option<String>,
    pub status: MatchStatus,
    pub is_ai_game: bool,
    pub next_player: Stone,
    pub game_over: bool,
}

impl MatchInfo {
    pub fn new(id: &str, game: &Match) -> Self {
        Self {
            id: id.to_string(),
            player_black: seat_label(game.seat(Stone::Black)),
            player_white: seat_label(game.seat(Stone::White)),
            status: game.status(),
            is_ai_game: game.is_engine_match(),
            next_player: game.next_player(),
            game_over: game.is_over(),
        }
    }
}
