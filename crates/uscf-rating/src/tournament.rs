//! Rating one player's tournament.
//!
//! [`TournamentContext`] borrows a player and their results, picks the
//! standard or special formula from the player's rating type, and bounds the
//! raw result by the single-game rules or the rating floor. The outcome is a
//! [`RatingUpdate`] value; nothing changes on the player until
//! [`RatingUpdate::commit`] is called.

use crate::floor::{RatingFloor, FLOOR_EVENT_MIN_GAMES};
use crate::observer::{SolverObserver, TracingObserver};
use crate::special::{initial_estimate, SpecialObjective, SpecialSolver};
use crate::standard::{BonusPolicy, StandardFormula};
use crate::{RatingConfig, RatingError};
use serde::Serialize;
use uscf_core::{CareerDelta, Player, RatingType, TimeControl, TournamentResults};

/// Formula that produced a rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RatingMethod {
    Standard,
    Special,
    /// Standard formula without bonus, limited like a single game.
    IndividualMatch,
}

/// Which rule, if any, changed the raw rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Bound {
    Free,
    /// Raised to the rating floor.
    Floor,
    /// Limited to the largest single-game change.
    SingleGameLimit,
}

/// A rated tournament result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatedUpdate {
    /// The final, bounded rating.
    pub rating: f64,
    /// The formula's result before bounding.
    pub unbounded_rating: f64,
    pub method: RatingMethod,
    pub bound: Bound,
    /// The floor checked against, absent for single games and individual matches.
    pub floor: Option<RatingFloor>,
    /// Counters to add to the player's career.
    pub career: CareerDelta,
}

/// Outcome of rating one tournament.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum RatingUpdate {
    Rated(RatedUpdate),
    /// A single game against an opponent too far away in rating. Nothing changes.
    Unrated { rating: f64, rating_gap: f64 },
}

impl RatingUpdate {
    /// The player's rating after the tournament.
    pub fn rating(&self) -> f64 {
        match self {
            RatingUpdate::Rated(update) => update.rating,
            RatingUpdate::Unrated { rating, .. } => *rating,
        }
    }

    pub fn is_rated(&self) -> bool {
        matches!(self, RatingUpdate::Rated(_))
    }

    /// The counters a commit adds, if the tournament was rated.
    pub fn career(&self) -> Option<CareerDelta> {
        match self {
            RatingUpdate::Rated(update) => Some(update.career),
            RatingUpdate::Unrated { .. } => None,
        }
    }

    /// Adds the tournament to `player`'s career.
    ///
    /// `player` must be the player the update was computed for. The rating
    /// itself is not changed; publish it with [`Player::set_rating`].
    pub fn commit(&self, player: &mut Player) {
        if let Some(delta) = self.career() {
            player.record(delta);
        }
    }
}

/// Career counters for a rated tournament.
pub(crate) fn career_delta(results: &TournamentResults) -> CareerDelta {
    CareerDelta {
        games: u32::try_from(results.len()).unwrap_or(u32::MAX),
        wins: results.wins(),
        losses: results.losses(),
        floor_events: u32::from(results.len() >= FLOOR_EVENT_MIN_GAMES),
    }
}

/// One player's tournament, ready to be rated.
///
/// # Example
///
/// ```
/// use uscf_core::{Player, TimeControl, TournamentResults};
/// use uscf_rating::{NoopObserver, TournamentContext};
///
/// let player = Player::new("p1", Some(1500.0), 30, 15, 15).unwrap();
/// let results = TournamentResults::from_tuples([
///     ("a", 1450.0, 1.0),
///     ("b", 1520.0, 0.5),
///     ("c", 1600.0, 0.0),
/// ])
/// .unwrap();
///
/// let update = TournamentContext::new(&player, &results, TimeControl::new(90, 30))
///     .evaluate(&mut NoopObserver)
///     .unwrap();
/// assert!((update.rating() - 1503.98).abs() < 0.01);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TournamentContext<'a> {
    player: &'a Player,
    results: &'a TournamentResults,
    time_control: TimeControl,
    config: RatingConfig,
}

impl<'a> TournamentContext<'a> {
    pub fn new(player: &'a Player, results: &'a TournamentResults, time_control: TimeControl) -> Self {
        TournamentContext {
            player,
            results,
            time_control,
            config: RatingConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RatingConfig) -> Self {
        self.config = config;
        self
    }

    pub fn player(&self) -> &'a Player {
        self.player
    }

    pub fn results(&self) -> &'a TournamentResults {
        self.results
    }

    pub fn time_control(&self) -> TimeControl {
        self.time_control
    }

    pub fn config(&self) -> &RatingConfig {
        &self.config
    }

    /// Prior rating used by the special formula.
    ///
    /// A history of only wins counts as evidence the rating is 400 points
    /// too low, only losses as 400 points too high.
    pub fn adjusted_initial_rating(&self) -> f64 {
        let initial = self.player.initial_rating();
        match self.player.rating_type() {
            RatingType::OnlyWins => initial - 400.0,
            RatingType::OnlyLosses => initial + 400.0,
            RatingType::New | RatingType::Standard => initial,
        }
    }

    /// Tournament score plus the score credited for the prior games.
    pub fn adjusted_score(&self) -> f64 {
        let score = self.results.score();
        let prior_games = self.player.effective_games();
        match self.player.rating_type() {
            RatingType::OnlyWins => score + prior_games,
            RatingType::OnlyLosses => score,
            RatingType::New | RatingType::Standard => score + prior_games / 2.0,
        }
    }

    pub fn standard_rating(&self, bonus: BonusPolicy) -> f64 {
        StandardFormula::for_player(self.player, self.time_control, &self.config)
            .with_bonus(bonus)
            .rate(self.results)
    }

    pub fn special_objective(&self) -> SpecialObjective {
        SpecialObjective::new(
            self.player.effective_games(),
            self.adjusted_initial_rating(),
            self.adjusted_score(),
            self.results.opponent_ratings(),
        )
    }

    /// Solves the special rating equation, reporting each step to `observer`.
    pub fn special_rating(&self, observer: &mut dyn SolverObserver) -> Result<f64, RatingError> {
        let objective = self.special_objective();
        let initial = self.player.initial_rating();
        let start = initial_estimate(
            self.player.effective_games(),
            initial,
            objective.opponent_ratings(),
            self.results.score(),
        );
        SpecialSolver::new(&objective, &self.config, observer).solve(start, initial)
    }

    pub fn rating_floor(&self) -> RatingFloor {
        RatingFloor::compute(self.player, self.results, &self.config)
    }

    /// Rating difference to the opponent, if the tournament is a single game.
    pub fn single_game_gap(&self) -> Option<f64> {
        match self.results.games() {
            [game] => Some((self.player.initial_rating() - game.opponent_rating).abs()),
            _ => None,
        }
    }

    /// Rates the tournament.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError::InvariantViolation`] if the special rating
    /// search fails.
    pub fn evaluate(&self, observer: &mut dyn SolverObserver) -> Result<RatingUpdate, RatingError> {
        let initial = self.player.initial_rating();
        let single_game_gap = self.single_game_gap();

        if let Some(gap) = single_game_gap.filter(|&gap| gap > self.config.unrated_gap) {
            tracing::info!(
                player = self.player.id(),
                rating = initial,
                gap,
                "single game unrated, rating gap too large"
            );
            return Ok(RatingUpdate::Unrated {
                rating: initial,
                rating_gap: gap,
            });
        }

        let rating_type = self.player.rating_type();
        let (unbounded_rating, method) = if rating_type.is_special() {
            (self.special_rating(observer)?, RatingMethod::Special)
        } else {
            (self.standard_rating(BonusPolicy::Allowed), RatingMethod::Standard)
        };

        let update = if single_game_gap.is_some() {
            let (rating, bound) =
                limit_change(initial, unbounded_rating, self.config.single_game_max_change);
            RatedUpdate {
                rating,
                unbounded_rating,
                method,
                bound,
                floor: None,
                career: career_delta(self.results),
            }
        } else {
            let floor = self.rating_floor();
            let (rating, bound) = if unbounded_rating < floor.value {
                (floor.value, Bound::Floor)
            } else {
                (unbounded_rating, Bound::Free)
            };
            RatedUpdate {
                rating,
                unbounded_rating,
                method,
                bound,
                floor: Some(floor),
                career: career_delta(self.results),
            }
        };

        tracing::debug!(
            player = self.player.id(),
            %rating_type,
            method = ?update.method,
            bound = ?update.bound,
            unbounded = update.unbounded_rating,
            rating = update.rating,
            "tournament rated"
        );
        Ok(RatingUpdate::Rated(update))
    }

    /// Rates the tournament as an individual match between two players.
    ///
    /// The standard formula applies whatever the rating type, without bonus
    /// and without floor, and the change is limited like a single game.
    pub fn evaluate_individual_match(&self) -> RatedUpdate {
        let initial = self.player.initial_rating();
        let unbounded_rating = self.standard_rating(BonusPolicy::Disabled);
        let (rating, bound) =
            limit_change(initial, unbounded_rating, self.config.single_game_max_change);

        tracing::debug!(
            player = self.player.id(),
            unbounded = unbounded_rating,
            rating,
            "individual match rated"
        );
        RatedUpdate {
            rating,
            unbounded_rating,
            method: RatingMethod::IndividualMatch,
            bound,
            floor: None,
            career: career_delta(self.results),
        }
    }
}

fn limit_change(initial: f64, rating: f64, max_change: f64) -> (f64, Bound) {
    let limit = max_change.max(0.0);
    let limited = rating.max(initial - limit).min(initial + limit);
    if limited == rating {
        (rating, Bound::Free)
    } else {
        (limited, Bound::SingleGameLimit)
    }
}

/// Rates `results` for `player` and commits the career counters.
///
/// Solver steps are logged through [`TracingObserver`]. The rating is
/// returned in the update and not written to the player.
///
/// # Errors
///
/// Returns [`RatingError::InvariantViolation`] if the special rating
/// search fails; the player is left unchanged.
pub fn rate_tournament(
    player: &mut Player,
    results: &TournamentResults,
    time_control: TimeControl,
) -> Result<RatingUpdate, RatingError> {
    let update = TournamentContext::new(player, results, time_control).evaluate(&mut TracingObserver)?;
    update.commit(player);
    Ok(update)
}
