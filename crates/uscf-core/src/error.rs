//! Input validation errors.

use thiserror::Error;

/// Errors that can occur when building rating inputs.
///
/// These are reported before any rating is computed, so a failed
/// validation never leaves a player partially updated.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InputError {
    #[error("invalid score {0}: expected 0, 0.5 or 1")]
    InvalidScore(f64),

    #[error("tournament has no games")]
    EmptyTournament,

    #[error("invalid rating: {0}")]
    InvalidRating(f64),

    #[error("inconsistent career: {wins} wins and {losses} losses in {games_played} games")]
    InconsistentCareer {
        games_played: u32,
        wins: u32,
        losses: u32,
    },

    #[error("invalid time control: {0}")]
    InvalidTimeControl(String),

    #[error("unknown player: {0}")]
    UnknownPlayer(String),

    #[error("invalid pairing: {0}")]
    InvalidPairing(String),

    #[error("duplicate player: {0}")]
    DuplicatePlayer(String),
}
