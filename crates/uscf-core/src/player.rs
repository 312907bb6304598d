//! Player career state and rating classification.
//!
//! A [`Player`] owns its career counters. Everything the rating formulas
//! read from a player (initial rating, established flag, effective game
//! count, rating type) is derived from those counters and recomputed by
//! every method that changes them.

use crate::InputError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Players with more than this many games have an established rating.
const ESTABLISHED_GAMES: u32 = 25;
/// Players with at most this many games are rated as new players.
const NEW_PLAYER_GAMES: u32 = 8;
const MAX_EFFECTIVE_GAMES: f64 = 50.0;
/// Above this rating the effective game count is not reduced.
const FULL_WEIGHT_RATING: f64 = 2355.0;
const DAYS_PER_YEAR: f64 = 365.25;
const ADULT_DEFAULT_RATING: f64 = 1300.0;
const INFANT_DEFAULT_RATING: f64 = 100.0;

/// Which rating formula a player's history calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RatingType {
    /// Eight or fewer rated games.
    New,
    /// Every previous rated game was won.
    OnlyWins,
    /// Every previous rated game was lost.
    OnlyLosses,
    /// Mixed results over more than eight games.
    Standard,
}

impl RatingType {
    /// Classifies a career by its game counts.
    pub const fn classify(games_played: u32, wins: u32, losses: u32) -> Self {
        if games_played <= NEW_PLAYER_GAMES {
            RatingType::New
        } else if wins == games_played {
            RatingType::OnlyWins
        } else if losses == games_played {
            RatingType::OnlyLosses
        } else {
            RatingType::Standard
        }
    }

    /// Returns true if this type is rated with the special formula.
    #[inline]
    pub const fn is_special(self) -> bool {
        !matches!(self, RatingType::Standard)
    }
}

impl std::fmt::Display for RatingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RatingType::New => write!(f, "special-new"),
            RatingType::OnlyWins => write!(f, "special-only-wins"),
            RatingType::OnlyLosses => write!(f, "special-only-losses"),
            RatingType::Standard => write!(f, "standard"),
        }
    }
}

/// Default rating for an unrated player of the given age in years.
pub fn age_based_rating(age: f64) -> f64 {
    if age < 2.0 {
        INFANT_DEFAULT_RATING
    } else if age <= 26.0 {
        50.0 * age
    } else {
        ADULT_DEFAULT_RATING
    }
}

/// Effective number of games: how many games the prior rating is worth.
///
/// Always within `[0, 50]` and never more than `games_played`.
pub fn effective_games(initial_rating: f64, games_played: u32) -> f64 {
    let n = if initial_rating > FULL_WEIGHT_RATING {
        MAX_EFFECTIVE_GAMES
    } else {
        let distance = 2569.0 - initial_rating;
        MAX_EFFECTIVE_GAMES / (0.662 + 0.000_007_39 * distance * distance).sqrt()
    };
    n.min(f64::from(games_played)).clamp(0.0, MAX_EFFECTIVE_GAMES)
}

fn default_birth_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1990, 1, 1).expect("1990-01-01 is a valid date")
}

fn default_reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 1, 1).expect("2021-01-01 is a valid date")
}

/// Counters added to a player's career when a rated result is committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CareerDelta {
    pub games: u32,
    pub wins: u32,
    pub losses: u32,
    /// Events with three or more games, counted toward the absolute floor.
    pub floor_events: u32,
}

/// Plain serialized form of a [`Player`].
///
/// Derived fields are never read from input; converting a record into a
/// player validates it and recomputes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub games_played: u32,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default = "default_birth_date")]
    pub birth_date: NaiveDate,
    #[serde(default = "default_reference_date")]
    pub reference_date: NaiveDate,
    #[serde(default)]
    pub floor_event_count: u32,
}

/// A rated player and their career history.
///
/// # Example
///
/// ```
/// use uscf_core::{Player, RatingType};
///
/// let player = Player::new("p1", Some(1200.0), 10, 8, 1).unwrap();
/// assert_eq!(player.draws(), 1);
/// assert_eq!(player.effective_games(), 10.0);
/// assert_eq!(player.rating_type(), RatingType::Standard);
/// assert!(!player.is_established());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PlayerRecord", into = "PlayerRecord")]
pub struct Player {
    id: String,
    rating: Option<f64>,
    games_played: u32,
    wins: u32,
    losses: u32,
    birth_date: NaiveDate,
    reference_date: NaiveDate,
    floor_event_count: u32,
    initial_rating: f64,
    established: bool,
    effective_games: f64,
    rating_type: RatingType,
}

impl Player {
    /// Creates a player with default birth and reference dates.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::InconsistentCareer`] if `wins + losses`
    /// exceeds `games_played`, or [`InputError::InvalidRating`] for a
    /// non-finite rating.
    pub fn new(
        id: impl Into<String>,
        rating: Option<f64>,
        games_played: u32,
        wins: u32,
        losses: u32,
    ) -> Result<Self, InputError> {
        Self::try_from(PlayerRecord {
            id: id.into(),
            rating,
            games_played,
            wins,
            losses,
            birth_date: default_birth_date(),
            reference_date: default_reference_date(),
            floor_event_count: 0,
        })
    }

    /// Sets the birth date used for age-based initial ratings.
    pub fn with_birth_date(mut self, birth_date: NaiveDate) -> Self {
        self.birth_date = birth_date;
        self.refresh();
        self
    }

    /// Sets the date at which the player's age is measured.
    pub fn with_reference_date(mut self, reference_date: NaiveDate) -> Self {
        self.reference_date = reference_date;
        self.refresh();
        self
    }

    /// Sets how many events with three or more games the player has completed.
    pub fn with_floor_event_count(mut self, floor_event_count: u32) -> Self {
        self.floor_event_count = floor_event_count;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The published rating, if the player has one.
    pub fn rating(&self) -> Option<f64> {
        self.rating
    }

    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    pub fn wins(&self) -> u32 {
        self.wins
    }

    pub fn losses(&self) -> u32 {
        self.losses
    }

    /// Games neither won nor lost. Zero if saturated counters overlap.
    pub fn draws(&self) -> u32 {
        self.games_played
            .saturating_sub(self.wins)
            .saturating_sub(self.losses)
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    pub fn floor_event_count(&self) -> u32 {
        self.floor_event_count
    }

    /// Age in years at the reference date.
    pub fn age(&self) -> f64 {
        let days = self
            .reference_date
            .signed_duration_since(self.birth_date)
            .num_days();
        days as f64 / DAYS_PER_YEAR
    }

    /// The rating the formulas start from: the published rating, or an
    /// age-based default for unrated players.
    pub fn initial_rating(&self) -> f64 {
        self.initial_rating
    }

    pub fn is_established(&self) -> bool {
        self.established
    }

    pub fn effective_games(&self) -> f64 {
        self.effective_games
    }

    pub fn rating_type(&self) -> RatingType {
        self.rating_type
    }

    /// Replaces the published rating.
    pub fn set_rating(&mut self, rating: Option<f64>) -> Result<(), InputError> {
        if let Some(r) = rating.filter(|r| !r.is_finite()) {
            return Err(InputError::InvalidRating(r));
        }
        self.rating = rating;
        self.refresh();
        Ok(())
    }

    /// Adds a committed tournament's counters to the career.
    pub fn record(&mut self, delta: CareerDelta) {
        self.games_played = self.games_played.saturating_add(delta.games);
        self.wins = self.wins.saturating_add(delta.wins);
        self.losses = self.losses.saturating_add(delta.losses);
        self.floor_event_count = self.floor_event_count.saturating_add(delta.floor_events);
        self.refresh();
    }

    fn refresh(&mut self) {
        self.initial_rating = self
            .rating
            .unwrap_or_else(|| age_based_rating(self.age()));
        self.established = self.games_played > ESTABLISHED_GAMES;
        self.effective_games = effective_games(self.initial_rating, self.games_played);
        self.rating_type = RatingType::classify(self.games_played, self.wins, self.losses);
    }
}

impl TryFrom<PlayerRecord> for Player {
    type Error = InputError;

    fn try_from(record: PlayerRecord) -> Result<Self, Self::Error> {
        if u64::from(record.wins) + u64::from(record.losses) > u64::from(record.games_played) {
            return Err(InputError::InconsistentCareer {
                games_played: record.games_played,
                wins: record.wins,
                losses: record.losses,
            });
        }
        if let Some(r) = record.rating.filter(|r| !r.is_finite()) {
            return Err(InputError::InvalidRating(r));
        }

        let mut player = Player {
            id: record.id,
            rating: record.rating,
            games_played: record.games_played,
            wins: record.wins,
            losses: record.losses,
            birth_date: record.birth_date,
            reference_date: record.reference_date,
            floor_event_count: record.floor_event_count,
            initial_rating: 0.0,
            established: false,
            effective_games: 0.0,
            rating_type: RatingType::New,
        };
        player.refresh();
        Ok(player)
    }
}

impl From<Player> for PlayerRecord {
    fn from(player: Player) -> Self {
        PlayerRecord {
            id: player.id,
            rating: player.rating,
            games_played: player.games_played,
            wins: player.wins,
            losses: player.losses,
            birth_date: player.birth_date,
            reference_date: player.reference_date,
            floor_event_count: player.floor_event_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, 1, 1).unwrap()
    }

    fn test_player() -> Player {
        Player::new("test", Some(1200.0), 10, 8, 1).unwrap()
    }

    fn newcomer() -> Player {
        Player::new("new", None, 0, 0, 0).unwrap()
    }

    #[test]
    fn age_based_ratings() {
        let unrated = |born| {
            newcomer()
                .with_birth_date(date(born))
                .with_reference_date(date(2021))
        };
        assert_eq!(unrated(1990).initial_rating(), 1300.0);
        assert!((unrated(2001).initial_rating() - 1000.0).abs() < 1e-9);
        assert_eq!(unrated(2020).initial_rating(), 100.0);
    }

    #[test]
    fn initial_rating_prefers_published_rating() {
        assert_eq!(newcomer().initial_rating(), 1300.0);
        assert_eq!(test_player().initial_rating(), 1200.0);
    }

    #[test]
    fn established_after_twenty_five_games() {
        assert!(!newcomer().is_established());
        assert!(!test_player().is_established());
        assert!(!Player::new("p", Some(1500.0), 25, 10, 10).unwrap().is_established());
        assert!(Player::new("p", Some(1500.0), 26, 10, 10).unwrap().is_established());
    }

    #[test]
    fn effective_game_counts() {
        let cases = [
            (900.0, 0, 0),
            (1200.0, 10, 10),
            (1300.0, 20, 14),
            (2400.0, 40, 40),
            (2400.0, 60, 50),
        ];
        for (rating, games, expected) in cases {
            let n = effective_games(rating, games);
            assert_eq!(n.trunc() as u32, expected, "rating {rating}, {games} games");
        }
    }

    #[test]
    fn rating_types() {
        assert_eq!(RatingType::classify(6, 0, 5), RatingType::New);
        assert_eq!(RatingType::classify(9, 9, 0), RatingType::OnlyWins);
        assert_eq!(RatingType::classify(9, 0, 9), RatingType::OnlyLosses);
        assert_eq!(RatingType::classify(10, 7, 1), RatingType::Standard);
        assert!(RatingType::New.is_special());
        assert!(!RatingType::Standard.is_special());
        assert_eq!(RatingType::OnlyWins.to_string(), "special-only-wins");
    }

    #[test]
    fn inconsistent_career_rejected() {
        let err = Player::new("p", Some(1500.0), 5, 4, 2).unwrap_err();
        assert_eq!(
            err,
            InputError::InconsistentCareer {
                games_played: 5,
                wins: 4,
                losses: 2
            }
        );
    }

    #[test]
    fn non_finite_rating_rejected() {
        assert!(Player::new("p", Some(f64::NAN), 0, 0, 0).is_err());
        let mut player = test_player();
        assert!(player.set_rating(Some(f64::INFINITY)).is_err());
        assert_eq!(player.rating(), Some(1200.0));
    }

    #[test]
    fn record_recomputes_derived_fields() {
        let mut player = Player::new("p", Some(1500.0), 8, 4, 4).unwrap();
        assert_eq!(player.rating_type(), RatingType::New);

        player.record(CareerDelta {
            games: 20,
            wins: 10,
            losses: 5,
            floor_events: 1,
        });

        assert_eq!(player.games_played(), 28);
        assert_eq!(player.wins(), 14);
        assert_eq!(player.losses(), 9);
        assert_eq!(player.draws(), 5);
        assert_eq!(player.floor_event_count(), 1);
        assert_eq!(player.rating_type(), RatingType::Standard);
        assert!(player.is_established());
        assert!((player.effective_games() - effective_games(1500.0, 28)).abs() < 1e-12);
    }

    #[test]
    fn record_saturates_counters() {
        let mut player = Player::new("p", Some(1500.0), u32::MAX, u32::MAX - 1, 0).unwrap();
        assert_eq!(player.draws(), 1);

        player.record(CareerDelta {
            games: 5,
            wins: 0,
            losses: 5,
            floor_events: 0,
        });

        assert_eq!(player.games_played(), u32::MAX);
        assert_eq!(player.losses(), 5);
        assert_eq!(player.draws(), 0);
        assert_eq!(player.rating_type(), RatingType::Standard);
    }

    #[test]
    fn set_rating_recomputes_initial_rating() {
        let mut player = newcomer();
        player.set_rating(Some(1800.0)).unwrap();
        assert_eq!(player.initial_rating(), 1800.0);
        player.set_rating(None).unwrap();
        assert_eq!(player.initial_rating(), 1300.0);
    }

    #[test]
    fn deserialize_recomputes_derived_fields() {
        let json = r#"{"id": "p9", "rating": null, "games_played": 12, "wins": 12,
                       "birth_date": "2011-01-01", "reference_date": "2021-01-01"}"#;
        let player: Player = serde_json::from_str(json).unwrap();
        assert_eq!(player.rating_type(), RatingType::OnlyWins);
        assert!((player.initial_rating() - 50.0 * player.age()).abs() < 1e-9);

        let bad = r#"{"id": "p9", "games_played": 2, "wins": 3}"#;
        assert!(serde_json::from_str::<Player>(bad).is_err());
    }

    proptest! {
        #[test]
        fn effective_games_bounded(rating in 0.0f64..3000.0, games in 0u32..500) {
            let n = effective_games(rating, games);
            prop_assert!((0.0..=50.0).contains(&n));
            prop_assert!(n <= f64::from(games));
        }
    }
}
