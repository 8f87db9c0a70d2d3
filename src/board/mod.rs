//! Board Engine: stone placement, captures, fingerprints and area scoring.

pub mod logic;
pub mod scoring;
pub mod types;

pub use logic::{Board, Fingerprint};
pub use scoring::{score_area, win_threshold, ScoreResult};
pub use types::*;
