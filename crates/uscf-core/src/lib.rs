//! Core types for USCF rating computation.
//!
//! This crate provides the plain data used by the rating engine:
//! - [`Player`] with career counters and derived rating classification
//! - [`Score`], [`GameRecord`], and [`TournamentResults`] for one tournament
//! - [`TimeControl`] for the event's clock settings
//! - [`InputError`] for structurally invalid input

mod error;
mod game;
mod player;
mod score;
mod time_control;

pub use error::InputError;
pub use game::{GameRecord, TournamentResults};
pub use player::{
    age_based_rating, effective_games, CareerDelta, Player, PlayerRecord, RatingType,
};
pub use score::Score;
pub use time_control::TimeControl;
