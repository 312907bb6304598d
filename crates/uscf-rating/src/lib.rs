//! USCF rating engine.
//!
//! This crate provides:
//! - [`standard_expectancy`] and [`special_expectancy`] - the two winning expectancy curves
//! - [`StandardFormula`] - the closed-form update for players with a mixed history
//! - [`SpecialSolver`] - the root finder for new and one-sided players
//! - [`RatingFloor`] - absolute and established rating floors
//! - [`TournamentContext`] - formula selection and bounding for one player's tournament
//! - [`Event`] - rating every player of a multi-player event or individual match
//! - [`RatingConfig`] - the system's constants, loadable from TOML
//!
//! # Architecture
//!
//! Every computation borrows a [`Player`](uscf_core::Player) and returns a
//! value. Career counters change only when an update is committed, so a
//! rating can be inspected, logged, or discarded first. The special rating
//! search reports its steps to a [`SolverObserver`]; [`TracingObserver`]
//! forwards them to `tracing`.
//!
//! # Example
//!
//! ```
//! use uscf_core::{Player, TimeControl, TournamentResults};
//! use uscf_rating::rate_tournament;
//!
//! let mut player = Player::new("p1", Some(1200.0), 10, 8, 1).unwrap();
//! let results = TournamentResults::from_tuples([
//!     ("opponent_1", 1300.0, 1.0),
//!     ("opponent_2", 1250.0, 0.5),
//!     ("opponent_3", 1200.0, 0.0),
//! ])
//! .unwrap();
//!
//! let update = rate_tournament(&mut player, &results, TimeControl::default()).unwrap();
//! assert!(update.rating() > 1200.0);
//! assert_eq!(player.games_played(), 13);
//! ```

mod config;
mod error;
pub mod event;
pub mod expectancy;
mod floor;
pub mod observer;
pub mod special;
pub mod standard;
pub mod tournament;

pub use config::{ConfigError, RatingConfig};
pub use error::RatingError;
pub use event::{rate_event, Event, EventRating, Pairing, RatingReport, UnratedEvent};
pub use expectancy::{special_expectancy, standard_expectancy};
pub use floor::RatingFloor;
pub use observer::{NoopObserver, SearchDirection, SolverEvent, SolverObserver, TracingObserver};
pub use special::{SpecialObjective, SpecialSolver};
pub use standard::{BonusPolicy, StandardFormula};
pub use tournament::{
    rate_tournament, Bound, RatedUpdate, RatingMethod, RatingUpdate, TournamentContext,
};
