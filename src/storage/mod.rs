//! Match persistence behind one capability trait.

pub mod file;
pub mod memory;

pub use file::FileMatchStore;
pub use memory::InMemoryMatchStore;

use crate::error::StoreError;
use crate::game::{Match, MatchInfo};

/// Storage for match records, keyed by match id.
///
/// Implementations must give read-your-writes consistency per id. Callers that
/// run get → transition → replace concurrently must serialize per id
/// themselves (the lobby does).
pub trait MatchStore: Send + Sync {
    /// Fails with `AlreadyExists` if the id is taken.
    fn create(&self, id: &str, game: Match) -> Result<(), StoreError>;

    fn get(&self, id: &str) -> Result<Match, StoreError>;

    /// Fails with `NotFound` if the id was never created.
    fn replace(&self, id: &str, game: Match) -> Result<(), StoreError>;

    /// Matches where `participant` holds either seat, sorted by id.
    fn list_by_participant(&self, participant: &str) -> Result<Vec<MatchInfo>, StoreError>;

    /// Matches still waiting for a second player, sorted by id.
    fn list_waiting(&self) -> Result<Vec<MatchInfo>, StoreError>;
}
