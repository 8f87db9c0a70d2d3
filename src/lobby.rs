//! Match service: creates, looks up and drives matches through a store.
//!
//! Each mutating call runs get → transition → replace under a per-match lock,
//! so transitions on one match are totally ordered.

use crate::advisor::{AdviceRequest, MoveAdvisor};
use crate::board::{Point, ScoreResult};
use crate::error::{GameError, LobbyError};
use crate::game::{Clock, Match, MatchConfig, MatchInfo, MatchSnapshot, MatchStatus, Seat};
use crate::storage::MatchStore;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Result of a pass; carries the final score when the pass ended the match.
#[derive(Debug, Clone, PartialEq)]
pub struct PassOutcome {
    pub snapshot: MatchSnapshot,
    pub score: Option<ScoreResult>,
}

pub struct Lobby {
    store: Box<dyn MatchStore>,
    advisor: Option<Box<dyn MoveAdvisor>>,
    clock: Arc<dyn Clock>,
    time_per_player: i64,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Lobby {
    pub fn new(store: Box<dyn MatchStore>, clock: Arc<dyn Clock>, time_per_player: i64) -> Self {
        Self {
            store,
            advisor: None,
            clock,
            time_per_player,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_advisor(mut self, advisor: Box<dyn MoveAdvisor>) -> Self {
        self.advisor = Some(advisor);
        self
    }

    fn lock_for(&self, id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(locks.entry(id.to_string()).or_default())
    }

    /// Run one transition under the match's lock and persist any change,
    /// including the forced finish of a timeout that is reported as an error.
    fn transition<T>(
        &self,
        id: &str,
        apply: impl FnOnce(&mut Match, &dyn Clock) -> Result<T, LobbyError>,
    ) -> Result<(T, Match), LobbyError> {
        let lock = self.lock_for(id);
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());

        let original = self.store.get(id)?;
        let mut game = original.clone();
        let result = apply(&mut game, self.clock.as_ref());
        if game != original {
            self.store.replace(id, game.clone())?;
        }
        if game.is_over() {
            self.forget_lock(id);
        }
        result.map(|value| (value, game))
    }

    /// Finished matches never change again, so their lock can go.
    fn forget_lock(&self, id: &str) {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.remove(id);
    }

    fn advisor(&self) -> Result<&dyn MoveAdvisor, LobbyError> {
        self.advisor
            .as_deref()
            .ok_or(LobbyError::AdvisorNotConfigured)
    }

    /// Create a match hosted by `host` (anonymous hosts leave Black open).
    pub fn create_match(
        &self,
        host: Option<&str>,
        opponent: Seat,
    ) -> Result<(String, MatchSnapshot), LobbyError> {
        let id = Uuid::new_v4().to_string();
        let black = host.map_or(Seat::Open, |id| Seat::participant(id));
        let config = MatchConfig {
            time_per_player: self.time_per_player,
            opponent,
        };
        let game = Match::new(black, &config, self.clock.as_ref());
        let snapshot = MatchSnapshot::from(&game);
        self.store.create(&id, game)?;
        log::info!("created match {} ({:?})", id, snapshot.status);
        Ok((id, snapshot))
    }

    pub fn snapshot(&self, id: &str) -> Result<MatchSnapshot, LobbyError> {
        Ok(MatchSnapshot::from(&self.store.get(id)?))
    }

    pub fn join(&self, id: &str, participant: &str) -> Result<MatchSnapshot, LobbyError> {
        let ((), game) = self.transition(id, |game, clock| Ok(game.join(participant, clock)?))?;
        Ok(MatchSnapshot::from(&game))
    }

    /// Play a move. `participant` of `None` skips the turn-ownership check.
    pub fn play_move(
        &self,
        id: &str,
        participant: Option<&str>,
        point: Point,
    ) -> Result<MatchSnapshot, LobbyError> {
        let (_, game) = self.transition(id, |game, clock| {
            authorize(game, participant)?;
            Ok(game.play_move(point, clock)?)
        })?;
        Ok(MatchSnapshot::from(&game))
    }

    pub fn pass(&self, id: &str, participant: Option<&str>) -> Result<PassOutcome, LobbyError> {
        let ((), game) = self.transition(id, |game, clock| {
            authorize(game, participant)?;
            Ok(game.pass(clock)?)
        })?;
        let score = if game.is_over() {
            Some(game.calculate_score()?)
        } else {
            None
        };
        Ok(PassOutcome {
            snapshot: MatchSnapshot::from(&game),
            score,
        })
    }

    /// Ask the advisor for a hint without playing it.
    pub fn suggest_move(&self, id: &str) -> Result<Option<Point>, LobbyError> {
        let advisor = self.advisor()?;
        let game = self.store.get(id)?;
        if game.is_over() {
            return Err(GameError::MatchOver.into());
        }
        Ok(advisor.suggest_move(&AdviceRequest::from_match(&game))?)
    }

    /// Let the advisor play for the engine seat. An advisor failure leaves
    /// the match untouched; a `None` suggestion is played as a pass.
    pub fn engine_move(&self, id: &str) -> Result<MatchSnapshot, LobbyError> {
        let advisor = self.advisor()?;
        let (_, game) = self.transition(id, |game, clock| {
            if game.is_over() {
                return Err(GameError::MatchOver.into());
            }
            if !game.engine_to_move() {
                return Err(LobbyError::NotYourTurn);
            }
            let suggestion = advisor
                .suggest_move(&AdviceRequest::from_match(game))
                .map_err(|e| {
                    log::warn!("advisor failed: {}", e);
                    e
                })?;
            match suggestion {
                Some(point) => {
                    game.play_move(point, clock)?;
                }
                None => game.pass(clock)?,
            }
            Ok(())
        })?;
        Ok(MatchSnapshot::from(&game))
    }

    pub fn score(&self, id: &str) -> Result<ScoreResult, LobbyError> {
        Ok(self.store.get(id)?.calculate_score()?)
    }

    /// Score a finished match with the advisor instead of locally.
    pub fn advisor_score(&self, id: &str) -> Result<ScoreResult, LobbyError> {
        let advisor = self.advisor()?;
        let game = self.store.get(id)?;
        if !game.is_over() {
            return Err(GameError::NotFinished.into());
        }
        Ok(advisor.score(game.board())?)
    }

    pub fn list_for(&self, participant: &str) -> Result<Vec<MatchInfo>, LobbyError> {
        Ok(self.store.list_by_participant(participant)?)
    }

    pub fn list_waiting(&self) -> Result<Vec<MatchInfo>, LobbyError> {
        Ok(self.store.list_waiting()?)
    }
}

fn authorize(game: &Match, participant: Option<&str>) -> Result<(), LobbyError> {
    match participant {
        Some(id) if game.status() == MatchStatus::Playing => {
            if game.can_act(id) {
                Ok(())
            } else {
                Err(LobbyError::NotYourTurn)
            }
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::RandomAdvisor;
    use crate::board::Stone;
    use crate::game::ManualClock;
    use crate::storage::InMemoryMatchStore;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn lobby(clock: &Arc<ManualClock>) -> Lobby {
        let clock: Arc<dyn Clock> = clock.clone();
        Lobby::new(Box::new(InMemoryMatchStore::new()), clock, 600).with_advisor(Box::new(
            RandomAdvisor::with_rng(ChaCha8Rng::seed_from_u64(7)),
        ))
    }

    #[test]
    fn test_create_join_and_play() {
        let clock = Arc::new(ManualClock::new(0));
        let lobby = lobby(&clock);
        let (id, snapshot) = lobby.create_match(Some("alice"), Seat::Open).unwrap();
        assert_eq!(snapshot.status, MatchStatus::Waiting);
        assert_eq!(lobby.list_waiting().unwrap().len(), 1);

        lobby.join(&id, "bob").unwrap();
        assert!(lobby.list_waiting().unwrap().is_empty());

        assert!(matches!(
            lobby.play_move(&id, Some("bob"), Point::new(3, 3)),
            Err(LobbyError::NotYourTurn)
        ));
        let snapshot = lobby.play_move(&id, Some("alice"), Point::new(3, 3)).unwrap();
        assert_eq!(snapshot.board[3][3], 1);
        assert_eq!(snapshot.next_player, Stone::White);
        assert_eq!(lobby.list_for("bob").unwrap().len(), 1);
    }

    #[test]
    fn test_rejected_move_is_not_persisted() {
        let clock = Arc::new(ManualClock::new(0));
        let lobby = lobby(&clock);
        let (id, _) = lobby.create_match(None, Seat::Engine).unwrap();
        lobby.play_move(&id, None, Point::new(3, 3)).unwrap();
        let before = lobby.snapshot(&id).unwrap();

        clock.advance(10);
        let err = lobby.play_move(&id, None, Point::new(3, 3)).unwrap_err();
        assert_eq!(
            err.game_error(),
            Some(&GameError::OccupiedCell(Point::new(3, 3)))
        );
        assert_eq!(lobby.snapshot(&id).unwrap(), before);
    }

    #[test]
    fn test_timeout_is_persisted() {
        let clock = Arc::new(ManualClock::new(0));
        let lobby = lobby(&clock);
        let (id, _) = lobby.create_match(Some("alice"), Seat::Engine).unwrap();
        clock.advance(601);

        let err = lobby
            .play_move(&id, Some("alice"), Point::new(3, 3))
            .unwrap_err();
        assert_eq!(err.game_error(), Some(&GameError::TimeExpired(Stone::Black)));
        let snapshot = lobby.snapshot(&id).unwrap();
        assert_eq!(snapshot.status, MatchStatus::Finished);
        assert_eq!(snapshot.black_time_left, 0);
    }

    #[test]
    fn test_engine_move_plays_for_engine_seat() {
        let clock = Arc::new(ManualClock::new(0));
        let lobby = lobby(&clock);
        let (id, _) = lobby.create_match(Some("alice"), Seat::Engine).unwrap();

        assert!(matches!(lobby.engine_move(&id), Err(LobbyError::NotYourTurn)));
        lobby.play_move(&id, Some("alice"), Point::new(9, 9)).unwrap();

        let snapshot = lobby.engine_move(&id).unwrap();
        assert_eq!(snapshot.next_player, Stone::Black);
        let white_stones = snapshot.board.iter().flatten().filter(|&&c| c == 2).count();
        assert_eq!(white_stones, 1);
    }

    #[test]
    fn test_engine_move_without_advisor() {
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(0));
        let lobby = Lobby::new(Box::new(InMemoryMatchStore::new()), clock, 600);
        let (id, before) = lobby.create_match(None, Seat::Engine).unwrap();
        assert!(matches!(
            lobby.engine_move(&id),
            Err(LobbyError::AdvisorNotConfigured)
        ));
        assert_eq!(lobby.snapshot(&id).unwrap(), before);
    }

    #[test]
    fn test_double_pass_returns_score() {
        let clock = Arc::new(ManualClock::new(0));
        let lobby = lobby(&clock);
        let (id, _) = lobby.create_match(Some("alice"), Seat::participant("bob")).unwrap();

        let first = lobby.pass(&id, Some("alice")).unwrap();
        assert!(first.score.is_none());
        let second = lobby.pass(&id, Some("bob")).unwrap();
        let score = second.score.unwrap();
        assert_eq!(score.winner, Stone::White);
        assert!(second.snapshot.game_over);

        assert_eq!(lobby.score(&id).unwrap(), score);
        assert_eq!(lobby.advisor_score(&id).unwrap(), score);
    }

    #[test]
    fn test_finished_match_releases_lock() {
        let clock = Arc::new(ManualClock::new(0));
        let lobby = lobby(&clock);
        let (id, _) = lobby.create_match(Some("alice"), Seat::participant("bob")).unwrap();

        lobby.pass(&id, Some("alice")).unwrap();
        assert!(lobby.locks.lock().unwrap().contains_key(&id));
        lobby.pass(&id, Some("bob")).unwrap();
        assert!(lobby.locks.lock().unwrap().is_empty());

        // Later calls on the finished match still fail cleanly without leaking
        assert!(matches!(
            lobby.pass(&id, Some("alice")),
            Err(LobbyError::Game(GameError::MatchOver))
        ));
        assert!(lobby.locks.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_match() {
        let clock = Arc::new(ManualClock::new(0));
        let lobby = lobby(&clock);
        assert!(matches!(
            lobby.snapshot("missing"),
            Err(LobbyError::Store(crate::error::StoreError::NotFound(_)))
        ));
    }

    #[test]
    fn test_suggest_move_does_not_play() {
        let clock = Arc::new(ManualClock::new(0));
        let lobby = lobby(&clock);
        let (id, before) = lobby.create_match(Some("alice"), Seat::Engine).unwrap();
        let hint = lobby.suggest_move(&id).unwrap();
        assert!(hint.is_some());
        assert_eq!(lobby.snapshot(&id).unwrap(), before);
    }
}
