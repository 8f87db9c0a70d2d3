// Board constants
pub const BOARD_SIZE: usize = 19;
pub const BOARD_AREA: usize = BOARD_SIZE * BOARD_SIZE;

// Scoring constants (Chinese area counting)
pub const KOMI: f64 = 7.5;
/// Half of komi is credited to White; Black must beat half the board plus this.
pub const WHITE_COMPENSATION: f64 = KOMI / 2.0;

// Clock constants
pub const DEFAULT_TIME_PER_PLAYER_SECS: i64 = 60 * 60; // 1 hour each

// Consecutive passes that end the match
pub const PASSES_TO_FINISH: u8 = 2;

// Match file format
pub const MATCH_FILE_MAGIC: u64 = 0x5745_4951_4931_3900; // "WEIQI19\0"
pub const MATCH_FILE_EXTENSION: &str = "match";

// Remote advisor
pub const ADVISOR_TIMEOUT_SECS: u64 = 30;

// Display name for the engine seat in listings and the terminal session
pub const ENGINE_SEAT_NAME: &str = "AI";
