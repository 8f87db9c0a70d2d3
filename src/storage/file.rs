//! Durable match store: one checksummed binary file per match.

use super::MatchStore;
use crate::board::Stone;
use crate::constants::{MATCH_FILE_EXTENSION, MATCH_FILE_MAGIC};
use crate::error::StoreError;
use crate::game::{Match, MatchInfo, MatchStatus};
use directories::ProjectDirs;
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const HEADER_LEN: usize = 8 + 4;
const CHECKSUM_LEN: usize = 32;

/// Stores each match as `<dir>/<id>.match`.
///
/// File format:
/// - Version magic (8 bytes, LE)
/// - Data length (4 bytes, LE)
/// - bincode-serialized `Match` (variable length)
/// - SHA256 over all preceding bytes (32 bytes)
#[derive(Debug)]
pub struct FileMatchStore {
    dir: PathBuf,
    // Held across check-then-write in create/replace
    write_lock: Mutex<()>,
}

impl FileMatchStore {
    pub fn new(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    /// Store under the platform data directory (e.g. `~/.local/share/weiqi/matches`).
    pub fn open_default() -> io::Result<Self> {
        let project_dirs = ProjectDirs::from("", "", "weiqi").ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "Could not determine data directory")
        })?;
        Self::new(project_dirs.data_dir().join("matches"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> Result<PathBuf, StoreError> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid match id: {:?}", id),
            )));
        }
        Ok(self.dir.join(format!("{}.{}", id, MATCH_FILE_EXTENSION)))
    }

    fn read_match(&self, path: &Path) -> Result<Match, StoreError> {
        let bytes = fs::read(path)?;
        decode(&bytes)
    }

    fn list_where(&self, keep: impl Fn(&Match) -> bool) -> Result<Vec<MatchInfo>, StoreError> {
        let mut infos = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(MATCH_FILE_EXTENSION) {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match self.read_match(&path) {
                Ok(game) if keep(&game) => infos.push(MatchInfo::new(id, &game)),
                Ok(_) => {}
                Err(e) => log::warn!("skipping unreadable match file {}: {}", path.display(), e),
            }
        }
        infos.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(infos)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Serialize a match into the checksummed file format.
pub fn encode(game: &Match) -> io::Result<Vec<u8>> {
    let data =
        bincode::serialize(game).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let data_len = u32::try_from(data.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "match record too large"))?;

    let mut bytes = Vec::with_capacity(HEADER_LEN + data.len() + CHECKSUM_LEN);
    bytes.extend_from_slice(&MATCH_FILE_MAGIC.to_le_bytes());
    bytes.extend_from_slice(&data_len.to_le_bytes());
    bytes.extend_from_slice(&data);
    let checksum = Sha256::digest(&bytes);
    bytes.extend_from_slice(&checksum);
    Ok(bytes)
}

/// Parse and verify a match file.
pub fn decode(bytes: &[u8]) -> Result<Match, StoreError> {
    if bytes.len() < HEADER_LEN + CHECKSUM_LEN {
        return Err(StoreError::Corrupt("file too short".to_string()));
    }

    let (magic_bytes, rest) = bytes.split_at(8);
    let mut magic = [0u8; 8];
    magic.copy_from_slice(magic_bytes);
    let magic = u64::from_le_bytes(magic);
    if magic != MATCH_FILE_MAGIC {
        return Err(StoreError::Corrupt(format!(
            "Invalid version: expected 0x{:016X}, got 0x{:016X}",
            MATCH_FILE_MAGIC, magic
        )));
    }

    let mut length = [0u8; 4];
    length.copy_from_slice(&rest[..4]);
    let data_len = u32::from_le_bytes(length) as usize;
    if bytes.len() != HEADER_LEN + data_len + CHECKSUM_LEN {
        return Err(StoreError::Corrupt("length mismatch".to_string()));
    }

    let (body, stored_checksum) = bytes.split_at(HEADER_LEN + data_len);
    if Sha256::digest(body).as_slice() != stored_checksum {
        return Err(StoreError::Corrupt("Checksum verification failed".to_string()));
    }

    bincode::deserialize(&body[HEADER_LEN..]).map_err(|e| StoreError::Corrupt(e.to_string()))
}

fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)
}

impl MatchStore for FileMatchStore {
    fn create(&self, id: &str, game: Match) -> Result<(), StoreError> {
        let path = self.path_for(id)?;
        let _guard = self.lock();
        if path.exists() {
            return Err(StoreError::AlreadyExists(id.to_string()));
        }
        write_atomic(&path, &encode(&game)?)?;
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Match, StoreError> {
        let path = self.path_for(id)?;
        match self.read_match(&path) {
            Err(StoreError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(id.to_string()))
            }
            other => other,
        }
    }

    fn replace(&self, id: &str, game: Match) -> Result<(), StoreError> {
        let path = self.path_for(id)?;
        let _guard = self.lock();
        if !path.exists() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        write_atomic(&path, &encode(&game)?)?;
        Ok(())
    }

    fn list_by_participant(&self, participant: &str) -> Result<Vec<MatchInfo>, StoreError> {
        self.list_where(|game| {
            game.seat(Stone::Black).is(participant) || game.seat(Stone::White).is(participant)
        })
    }

    fn list_waiting(&self) -> Result<Vec<MatchInfo>, StoreError> {
        self.list_where(|game| game.status() == MatchStatus::Waiting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Point;
    use crate::game::{ManualClock, MatchConfig, Seat};

    fn temp_store() -> FileMatchStore {
        let dir = std::env::temp_dir().join(format!("weiqi-test-{}", uuid::Uuid::new_v4()));
        FileMatchStore::new(dir).expect("Failed to create store")
    }

    fn played_match() -> Match {
        let clock = ManualClock::new(0);
        let mut game = Match::new(
            Seat::participant("alice"),
            &MatchConfig::against_engine(900),
            &clock,
        );
        game.play_move(Point::new(3, 3), &clock).unwrap();
        game.play_move(Point::new(15, 15), &clock).unwrap();
        game
    }

    #[test]
    fn test_save_and_load() {
        let store = temp_store();
        let game = played_match();
        store.create("m1", game.clone()).unwrap();

        let loaded = store.get("m1").unwrap();
        assert_eq!(loaded, game);
        assert_eq!(loaded.history_len(), 3);
        fs::remove_dir_all(store.dir()).ok();
    }

    #[test]
    fn test_missing_and_duplicate() {
        let store = temp_store();
        assert!(matches!(store.get("nope"), Err(StoreError::NotFound(_))));
        assert!(matches!(
            store.replace("nope", played_match()),
            Err(StoreError::NotFound(_))
        ));
        store.create("m1", played_match()).unwrap();
        assert!(matches!(
            store.create("m1", played_match()),
            Err(StoreError::AlreadyExists(_))
        ));
        fs::remove_dir_all(store.dir()).ok();
    }

    #[test]
    fn test_rejects_path_like_ids() {
        let store = temp_store();
        assert!(matches!(
            store.create("../escape", played_match()),
            Err(StoreError::Io(_))
        ));
        fs::remove_dir_all(store.dir()).ok();
    }

    #[test]
    fn test_checksum_detects_tampering() {
        let mut bytes = encode(&played_match()).unwrap();
        let middle = bytes.len() / 2;
        bytes[middle] ^= 0xFF;
        assert!(matches!(decode(&bytes), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn test_bad_magic_rejected() {
        let mut bytes = encode(&played_match()).unwrap();
        bytes[0] ^= 0x01;
        let err = decode(&bytes).unwrap_err();
        assert!(err.to_string().contains("Invalid version"));
    }

    #[test]
    fn test_listing_skips_corrupt_files() {
        let store = temp_store();
        store.create("good", played_match()).unwrap();
        let waiting = Match::new(
            Seat::participant("bob"),
            &MatchConfig::default(),
            &ManualClock::new(0),
        );
        store.create("open", waiting).unwrap();
        fs::write(store.dir().join("junk.match"), b"not a match").unwrap();

        let mine = store.list_by_participant("alice").unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, "good");

        let open = store.list_waiting().unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id, "open");
        fs::remove_dir_all(store.dir()).ok();
    }
}
