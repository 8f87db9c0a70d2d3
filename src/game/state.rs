//! Match aggregate and its transitions.
//!
//! A `Match` only changes through `join`, `play_move`, `pass` and clock
//! updates. Moves are tried on a cloned board and committed only after the
//! placement and the superko check both succeed.

use super::clock::Clock;
use crate::board::{score_area, Board, Fingerprint, Point, ScoreResult, Stone};
use crate::constants::{DEFAULT_TIME_PER_PLAYER_SECS, PASSES_TO_FINISH};
use crate::error::GameError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Who sits in a color's seat.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seat {
    /// Nobody yet (or an anonymous creator).
    Open,
    /// Moves come from the move advisor.
    Engine,
    /// A participant, identified by an opaque token compared for equality only.
    Participant(String),
}

impl Seat {
    pub fn participant(id: impl Into<String>) -> Self {
        Seat::Participant(id.into())
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Seat::Open)
    }

    /// True if this seat belongs to `participant`.
    pub fn is(&self, participant: &str) -> bool {
        matches!(self, Seat::Participant(id) if id == participant)
    }

    pub fn participant_id(&self) -> Option<&str> {
        match self {
            Seat::Participant(id) => Some(id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    /// White seat open, waiting for a second participant.
    Waiting,
    Playing,
    /// Terminal.
    Finished,
}

/// Decided before a match is built: clock allotment and who takes White.
///
/// An open White seat makes a waiting match; an engine or named opponent
/// starts play immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchConfig {
    pub time_per_player: i64,
    pub opponent: Seat,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            time_per_player: DEFAULT_TIME_PER_PLAYER_SECS,
            opponent: Seat::Open,
        }
    }
}

impl MatchConfig {
    pub fn against_engine(time_per_player: i64) -> Self {
        Self {
            time_per_player,
            opponent: Seat::Engine,
        }
    }

    pub fn open(time_per_player: i64) -> Self {
        Self {
            time_per_player,
            opponent: Seat::Open,
        }
    }
}

/// The full game record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    board: Board,
    /// Every position seen so far, including the initial empty board.
    history: HashSet<Fingerprint>,
    next_player: Stone,
    passes: u8,
    status: MatchStatus,
    captures_by_black: u32,
    captures_by_white: u32,
    black: Seat,
    white: Seat,
    black_time_left: i64,
    white_time_left: i64,
    /// Unix seconds of the last clock update; `None` until the first tick.
    last_update: Option<i64>,
    time_per_player: i64,
    timed_out: Option<Stone>,
}

impl Match {
    /// Start a match with `black` hosting. Play begins at once unless the
    /// configured opponent seat is open.
    pub fn new(black: Seat, config: &MatchConfig, clock: &dyn Clock) -> Self {
        let board = Board::new();
        let history = HashSet::from([board.fingerprint()]);
        let white = config.opponent.clone();
        let (status, last_update) = if white.is_open() {
            (MatchStatus::Waiting, None)
        } else {
            (MatchStatus::Playing, Some(clock.now()))
        };

        Self {
            board,
            history,
            next_player: Stone::Black,
            passes: 0,
            status,
            captures_by_black: 0,
            captures_by_white: 0,
            black,
            white,
            black_time_left: config.time_per_player,
            white_time_left: config.time_per_player,
            last_update,
            time_per_player: config.time_per_player,
            timed_out: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn next_player(&self) -> Stone {
        self.next_player
    }

    pub fn passes(&self) -> u8 {
        self.passes
    }

    pub fn status(&self) -> MatchStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status == MatchStatus::Finished
    }

    /// Stones captured by `stone`'s side.
    pub fn captures(&self, stone: Stone) -> u32 {
        match stone {
            Stone::Black => self.captures_by_black,
            Stone::White => self.captures_by_white,
        }
    }

    pub fn seat(&self, stone: Stone) -> &Seat {
        match stone {
            Stone::Black => &self.black,
            Stone::White => &self.white,
        }
    }

    pub fn is_engine_match(&self) -> bool {
        self.black == Seat::Engine || self.white == Seat::Engine
    }

    pub fn time_left(&self, stone: Stone) -> i64 {
        match stone {
            Stone::Black => self.black_time_left,
            Stone::White => self.white_time_left,
        }
    }

    pub fn current_time_left(&self) -> i64 {
        self.time_left(self.next_player)
    }

    pub fn time_per_player(&self) -> i64 {
        self.time_per_player
    }

    pub fn last_update(&self) -> Option<i64> {
        self.last_update
    }

    /// The color that lost on time, if the match ended that way.
    pub fn timed_out(&self) -> Option<Stone> {
        self.timed_out
    }

    pub fn has_seen(&self, fingerprint: &Fingerprint) -> bool {
        self.history.contains(fingerprint)
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Positional history, sorted for a stable order.
    pub fn history(&self) -> Vec<Fingerprint> {
        let mut seen: Vec<Fingerprint> = self.history.iter().cloned().collect();
        seen.sort();
        seen
    }

    /// True iff `participant` holds the seat of the color to move.
    pub fn can_act(&self, participant: &str) -> bool {
        self.status == MatchStatus::Playing && self.seat(self.next_player).is(participant)
    }

    /// True when the color to move is played by the engine.
    pub fn engine_to_move(&self) -> bool {
        self.status == MatchStatus::Playing && *self.seat(self.next_player) == Seat::Engine
    }

    /// Take the open White seat and start play.
    ///
    /// `SeatFull` guards records whose White seat was filled without leaving
    /// `Waiting`; matches built through `new` and `join` never get there.
    pub fn join(&mut self, participant: &str, clock: &dyn Clock) -> Result<(), GameError> {
        if self.status != MatchStatus::Waiting {
            return Err(GameError::NotWaiting);
        }
        if self.black.is(participant) {
            return Err(GameError::SelfJoin);
        }
        if !self.white.is_open() {
            return Err(GameError::SeatFull);
        }

        self.white = Seat::participant(participant);
        self.status = MatchStatus::Playing;
        self.last_update = Some(clock.now());
        log::info!("participant {} joined as White", participant);
        Ok(())
    }

    /// Place a stone for the color to move. Returns the number captured.
    ///
    /// A rejected placement leaves the match exactly as it was, clock
    /// included; only a timeout changes state on failure.
    pub fn play_move(&mut self, point: Point, clock: &dyn Clock) -> Result<usize, GameError> {
        self.ensure_playing()?;
        let saved_clock = (self.black_time_left, self.white_time_left, self.last_update);
        self.update_clock(clock)?;

        let mover = self.next_player;
        let (trial, captured, fingerprint) = match self.try_place(mover, point) {
            Ok(placed) => placed,
            Err(e) => {
                (self.black_time_left, self.white_time_left, self.last_update) = saved_clock;
                return Err(e);
            }
        };

        self.board = trial;
        self.history.insert(fingerprint);
        self.next_player = mover.opponent();
        self.passes = 0;
        match mover {
            Stone::Black => self.captures_by_black += captured as u32,
            Stone::White => self.captures_by_white += captured as u32,
        }
        log::debug!("{} played {} capturing {}", mover, point, captured);
        Ok(captured)
    }

    /// Pass the turn. Two consecutive passes finish the match.
    pub fn pass(&mut self, clock: &dyn Clock) -> Result<(), GameError> {
        self.ensure_playing()?;
        self.update_clock(clock)?;

        log::debug!("{} passed", self.next_player);
        self.passes += 1;
        self.next_player = self.next_player.opponent();

        if self.passes >= PASSES_TO_FINISH {
            self.status = MatchStatus::Finished;
            log::info!("match finished after consecutive passes");
        }
        Ok(())
    }

    /// Charge the time since the last update to the color to move.
    ///
    /// The first tick only records a baseline. Running out of time clamps the
    /// remaining time to zero and finishes the match.
    pub fn update_clock(&mut self, clock: &dyn Clock) -> Result<(), GameError> {
        if self.status != MatchStatus::Playing {
            return Ok(());
        }

        let now = clock.now();
        let Some(last) = self.last_update else {
            self.last_update = Some(now);
            return Ok(());
        };

        let mover = self.next_player;
        let elapsed = (now - last).max(0);
        let remaining = match mover {
            Stone::Black => &mut self.black_time_left,
            Stone::White => &mut self.white_time_left,
        };
        *remaining -= elapsed;

        if *remaining <= 0 {
            *remaining = 0;
            self.status = MatchStatus::Finished;
            self.timed_out = Some(mover);
            log::warn!("{} ran out of time", mover);
            return Err(GameError::TimeExpired(mover));
        }

        self.last_update = Some(now);
        Ok(())
    }

    /// Area score of the final position. Only available once finished.
    pub fn calculate_score(&self) -> Result<ScoreResult, GameError> {
        if self.status != MatchStatus::Finished {
            return Err(GameError::NotFinished);
        }
        Ok(score_area(&self.board))
    }

    /// Trial placement on a cloned board, checked against every earlier position.
    fn try_place(
        &self,
        mover: Stone,
        point: Point,
    ) -> Result<(Board, usize, Fingerprint), GameError> {
        let mut trial = self.board.clone();
        let captured = trial.place_stone(mover, point)?;
        let fingerprint = trial.fingerprint();
        if self.history.contains(&fingerprint) {
            return Err(GameError::PositionalSuperkoViolation);
        }
        Ok((trial, captured, fingerprint))
    }

    fn ensure_playing(&self) -> Result<(), GameError> {
        match self.status {
            MatchStatus::Playing => Ok(()),
            MatchStatus::Waiting => Err(GameError::NotPlaying),
            MatchStatus::Finished => Err(GameError::MatchOver),
        }
    }
}
