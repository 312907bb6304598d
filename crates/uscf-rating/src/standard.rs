//! Standard rating formula.
//!
//! Used for players whose history has mixed results over more than eight
//! games, and for individual matches.

use crate::expectancy::standard_expectancy;
use crate::RatingConfig;
use uscf_core::{Player, TimeControl, TournamentResults};

/// Bonus points need at least this many games in the event.
const BONUS_MIN_GAMES: usize = 3;
/// The bonus threshold grows with the square root of at least this many games.
const BONUS_SQRT_MIN_GAMES: usize = 4;
/// Playing any opponent more often than this forfeits the bonus.
const BONUS_MAX_GAMES_PER_OPPONENT: usize = 2;

/// Whether the over-performance bonus may be awarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BonusPolicy {
    /// Regular tournaments.
    Allowed,
    /// Individual matches never earn a bonus.
    Disabled,
}

/// Inputs of the standard formula for one player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardFormula {
    pub initial_rating: f64,
    pub effective_games: f64,
    pub time_control: TimeControl,
    pub bonus: BonusPolicy,
    pub bonus_threshold: f64,
}

impl StandardFormula {
    /// Sets up the formula for `player`, with the bonus allowed.
    pub fn for_player(player: &Player, time_control: TimeControl, config: &RatingConfig) -> Self {
        StandardFormula {
            initial_rating: player.initial_rating(),
            effective_games: player.effective_games(),
            time_control,
            bonus: BonusPolicy::Allowed,
            bonus_threshold: config.bonus_threshold,
        }
    }

    pub fn with_bonus(mut self, bonus: BonusPolicy) -> Self {
        self.bonus = bonus;
        self
    }

    /// The K-factor for an event of `games` games.
    ///
    /// Players above 2200 in events with a combined time control of 30 to
    /// 65 get a reduced K.
    pub fn k_factor(&self, games: usize) -> f64 {
        let denominator = self.effective_games + games as f64;
        let rating = self.initial_rating;
        let reduced = (30..=65).contains(&self.time_control.combined()) && rating > 2200.0;

        if !reduced {
            800.0 / denominator
        } else if rating < 2500.0 {
            800.0 * (6.5 - 0.0025 * rating) / denominator
        } else {
            200.0 / denominator
        }
    }

    /// Sum of logistic winning expectancies against every opponent.
    pub fn expected_score(&self, results: &TournamentResults) -> f64 {
        results
            .iter()
            .map(|g| standard_expectancy(self.initial_rating, g.opponent_rating))
            .sum()
    }

    fn bonus_applies(&self, results: &TournamentResults) -> bool {
        self.bonus == BonusPolicy::Allowed
            && results.len() >= BONUS_MIN_GAMES
            && results.max_games_against_one_opponent() <= BONUS_MAX_GAMES_PER_OPPONENT
    }

    /// Computes the new rating after `results`.
    pub fn rate(&self, results: &TournamentResults) -> f64 {
        let games = results.len();
        let gain = self.k_factor(games) * (results.score() - self.expected_score(results));

        if !self.bonus_applies(results) {
            return self.initial_rating + gain;
        }

        let threshold = self.bonus_threshold * (games.max(BONUS_SQRT_MIN_GAMES) as f64).sqrt();
        self.initial_rating + gain + (gain - threshold).max(0.0)
    }
}
