//! In-memory match store.

use super::MatchStore;
use crate::board::Stone;
use crate::error::StoreError;
use crate::game::{Match, MatchInfo, MatchStatus};
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
pub struct InMemoryMatchStore {
    matches: RwLock<BTreeMap<String, Match>>,
}

impl InMemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned lock only means another thread panicked mid-call; the map
    // itself is never left half-written.
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, Match>> {
        self.matches.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, Match>> {
        self.matches.write().unwrap_or_else(|e| e.into_inner())
    }

    fn list_where(&self, keep: impl Fn(&Match) -> bool) -> Vec<MatchInfo> {
        self.read()
            .iter()
            .filter(|(_, game)| keep(game))
            .map(|(id, game)| MatchInfo::new(id, game))
            .collect()
    }
}

impl MatchStore for InMemoryMatchStore {
    fn create(&self, id: &str, game: Match) -> Result<(), StoreError> {
        let mut matches = self.write();
        if matches.contains_key(id) {
            return Err(StoreError::AlreadyExists(id.to_string()));
        }
        matches.insert(id.to_string(), game);
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Match, StoreError> {
        self.read()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn replace(&self, id: &str, game: Match) -> Result<(), StoreError> {
        let mut matches = self.write();
        let slot = matches
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        *slot = game;
        Ok(())
    }

    fn list_by_participant(&self, participant: &str) -> Result<Vec<MatchInfo>, StoreError> {
        Ok(self.list_where(|game| {
            game.seat(Stone::Black).is(participant) || game.seat(Stone::White).is(participant)
        }))
    }

    fn list_waiting(&self) -> Result<Vec<MatchInfo>, StoreError> {
        Ok(self.list_where(|game| game.status() == MatchStatus::Waiting))
    }
}
