//! Runtime configuration read from `WEIQI_*` environment variables.

use crate::constants::DEFAULT_TIME_PER_PLAYER_SECS;
use std::path::PathBuf;

pub const ENV_DATA_DIR: &str = "WEIQI_DATA_DIR";
pub const ENV_ADVISOR_URL: &str = "WEIQI_ADVISOR_URL";
pub const ENV_TIME_PER_PLAYER: &str = "WEIQI_TIME_PER_PLAYER";
pub const ENV_LOG: &str = "WEIQI_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory for the file-backed store; `None` keeps matches in memory.
    pub data_dir: Option<PathBuf>,
    /// Base URL of a remote move advisor; `None` uses the built-in one.
    pub advisor_url: Option<String>,
    /// Seconds on each player's clock.
    pub time_per_player: i64,
    /// `env_logger` filter, e.g. `info` or `weiqi=debug`.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            advisor_url: None,
            time_per_player: DEFAULT_TIME_PER_PLAYER_SECS,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let time_per_player = match get(ENV_TIME_PER_PLAYER) {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    log::warn!(
                        "ignoring invalid {}={:?}, using {}",
                        ENV_TIME_PER_PLAYER,
                        raw,
                        defaults.time_per_player
                    );
                    defaults.time_per_player
                }
            },
            None => defaults.time_per_player,
        };

        Self {
            data_dir: get(ENV_DATA_DIR).map(PathBuf::from),
            advisor_url: get(ENV_ADVISOR_URL),
            time_per_player,
            log_level: get(ENV_LOG).unwrap_or(defaults.log_level),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(Config::from_lookup(lookup(&[])), Config::default());
    }

    #[test]
    fn test_reads_all_keys() {
        let config = Config::from_lookup(lookup(&[
            (ENV_DATA_DIR, "/tmp/weiqi"),
            (ENV_ADVISOR_URL, "http://localhost:8000"),
            (ENV_TIME_PER_PLAYER, "600"),
            (ENV_LOG, "debug"),
        ]));
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/weiqi")));
        assert_eq!(config.advisor_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(config.time_per_player, 600);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_invalid_time_falls_back() {
        for raw in ["soon", "-5", "0"] {
            let config = Config::from_lookup(lookup(&[(ENV_TIME_PER_PLAYER, raw)]));
            assert_eq!(config.time_per_player, DEFAULT_TIME_PER_PLAYER_SECS);
        }
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = Config::from_lookup(lookup(&[(ENV_ADVISOR_URL, "  ")]));
        assert_eq!(config.advisor_url, None);
    }
}
