//! Rating floors.

use crate::RatingConfig;
use serde::Serialize;
use uscf_core::{Player, Score, TournamentResults};

/// Events with at least this many games count toward the absolute floor.
pub const FLOOR_EVENT_MIN_GAMES: usize = 3;
/// Established players rated at least this high get a floor below their rating.
const ESTABLISHED_FLOOR_MIN_RATING: f64 = 1200.0;
const ESTABLISHED_FLOOR_GAP: f64 = 200.0;

/// The lowest rating a player may drop to in one tournament.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingFloor {
    pub value: f64,
    /// The player's floor event count once this tournament is committed.
    pub floor_event_count: u32,
}

impl RatingFloor {
    /// Computes the floor for `player` after `results`, without changing the player.
    ///
    /// The absolute floor grows with career wins and draws (including this
    /// tournament's) and with the number of events of three or more games.
    /// Established players rated 1200 or more are instead held to their
    /// rating minus 200, rounded down to a multiple of 100.
    ///
    /// ```
    /// use uscf_core::{Player, TournamentResults};
    /// use uscf_rating::{RatingConfig, RatingFloor};
    ///
    /// let player = Player::new("p", Some(1455.0), 40, 20, 15).unwrap();
    /// let results = TournamentResults::from_tuples([("a", 1500.0, 0.0)]).unwrap();
    /// let floor = RatingFloor::compute(&player, &results, &RatingConfig::default());
    /// assert_eq!(floor.value, 1200.0);
    /// ```
    pub fn compute(player: &Player, results: &TournamentResults, config: &RatingConfig) -> Self {
        let wins = player.wins() + results.count(Score::Win);
        let draws = player.draws() + results.count(Score::Draw);

        let mut floor_event_count = player.floor_event_count();
        if results.len() >= FLOOR_EVENT_MIN_GAMES {
            floor_event_count = floor_event_count.saturating_add(1);
        }

        let initial = player.initial_rating();
        let value = if player.is_established() && initial >= ESTABLISHED_FLOOR_MIN_RATING {
            ((initial - ESTABLISHED_FLOOR_GAP) / 100.0).floor() * 100.0
        } else {
            let earned = 4.0 * f64::from(wins) + 2.0 * f64::from(draws) + f64::from(floor_event_count);
            (config.absolute_floor + earned).min(config.absolute_floor_cap)
        };

        RatingFloor {
            value,
            floor_event_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crosstable() -> TournamentResults {
        TournamentResults::from_tuples([
            ("opponent_1", 1300.0, 1.0),
            ("opponent_2", 1250.0, 0.5),
            ("opponent_3", 1200.0, 0.0),
            ("opponent_3", 1200.0, 0.5),
            ("opponent_2", 1250.0, 0.0),
            ("opponent_1", 1300.0, 1.0),
        ])
        .unwrap()
    }

    fn floor(player: &Player, results: &TournamentResults) -> RatingFloor {
        RatingFloor::compute(player, results, &RatingConfig::default())
    }

    #[test]
    fn counts_every_game() {
        // 10 wins, 3 draws, 1 floor event.
        let player = Player::new("test", Some(1200.0), 10, 8, 1).unwrap();
        let floor = floor(&player, &crosstable());
        assert_eq!(floor.value, 147.0);
        assert_eq!(floor.floor_event_count, 1);
    }

    #[test]
    fn newcomer_floor() {
        let player = Player::new("new", None, 0, 0, 0).unwrap();
        let results = TournamentResults::from_tuples([
            ("a", 900.0, 0.0),
            ("b", 800.0, 0.5),
            ("c", 1200.0, 0.0),
            ("d", 1200.0, 0.5),
            ("e", 600.0, 1.0),
            ("f", 750.0, 0.5),
        ])
        .unwrap();
        assert_eq!(floor(&player, &results).value, 111.0);
    }

    #[test]
    fn absolute_floor_capped() {
        let player = Player::new("p", Some(900.0), 30, 20, 5).unwrap();
        assert_eq!(floor(&player, &crosstable()).value, 150.0);
    }

    #[test]
    fn short_event_does_not_count() {
        let player = Player::new("p", Some(900.0), 4, 1, 3).unwrap().with_floor_event_count(2);
        let results = TournamentResults::from_tuples([("a", 900.0, 0.0), ("b", 900.0, 0.0)]).unwrap();
        let floor = floor(&player, &results);
        assert_eq!(floor.floor_event_count, 2);
        assert_eq!(floor.value, 106.0);
    }

    #[test]
    fn established_floor() {
        let player = Player::new("p", Some(1455.0), 30, 15, 15).unwrap();
        assert_eq!(floor(&player, &crosstable()).value, 1200.0);

        let player = Player::new("p", Some(1500.0), 30, 15, 15).unwrap();
        assert_eq!(floor(&player, &crosstable()).value, 1300.0);
    }

    #[test]
    fn unestablished_high_rating_uses_absolute_floor() {
        let player = Player::new("p", Some(1800.0), 20, 10, 10).unwrap();
        assert_eq!(floor(&player, &crosstable()).value, 150.0);
    }

    #[test]
    fn compute_is_idempotent() {
        let player = Player::new("test", Some(1200.0), 10, 8, 1).unwrap();
        let results = crosstable();
        assert_eq!(floor(&player, &results), floor(&player, &results));
        assert_eq!(player.floor_event_count(), 0);
    }
}
