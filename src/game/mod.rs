//! Match State Machine: turns, passes, superko history, clocks and lifecycle.

pub mod clock;
pub mod snapshot;
pub mod state;

pub use clock::{Clock, ManualClock, SystemClock};
pub use snapshot::{MatchInfo, MatchSnapshot, MoveRequest};
pub use state::{Match, MatchConfig, MatchStatus, Seat};
