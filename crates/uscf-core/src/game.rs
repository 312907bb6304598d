//! Game records and per-tournament result sequences.

use crate::{InputError, Score};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One rated game: who the opponent was, their rating, and the outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Opponent identifier, used to detect repeated pairings.
    pub opponent_id: String,
    /// Opponent's rating going into the event.
    pub opponent_rating: f64,
    /// Result for the rated player.
    pub score: Score,
}

impl GameRecord {
    /// Creates a game record, rejecting non-finite opponent ratings.
    pub fn new(
        opponent_id: impl Into<String>,
        opponent_rating: f64,
        score: Score,
    ) -> Result<Self, InputError> {
        if !opponent_rating.is_finite() {
            return Err(InputError::InvalidRating(opponent_rating));
        }
        Ok(GameRecord {
            opponent_id: opponent_id.into(),
            opponent_rating,
            score,
        })
    }
}

/// The ordered, non-empty list of games a player completed in one tournament.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<GameRecord>", into = "Vec<GameRecord>")]
pub struct TournamentResults {
    games: Vec<GameRecord>,
}

impl TournamentResults {
    /// Validates and wraps a list of games.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::EmptyTournament`] for an empty list, or
    /// [`InputError::InvalidRating`] if any opponent rating is not finite.
    pub fn new(games: Vec<GameRecord>) -> Result<Self, InputError> {
        if games.is_empty() {
            return Err(InputError::EmptyTournament);
        }
        if let Some(game) = games.iter().find(|g| !g.opponent_rating.is_finite()) {
            return Err(InputError::InvalidRating(game.opponent_rating));
        }
        Ok(TournamentResults { games })
    }

    /// Builds results from `(opponent_id, opponent_rating, score)` tuples.
    ///
    /// Scores must be exactly `0`, `0.5` or `1`.
    ///
    /// # Examples
    ///
    /// ```
    /// use uscf_core::TournamentResults;
    ///
    /// let results = TournamentResults::from_tuples([
    ///     ("alice", 1450.0, 1.0),
    ///     ("bob", 1520.0, 0.5),
    /// ])
    /// .unwrap();
    /// assert_eq!(results.score(), 1.5);
    /// ```
    pub fn from_tuples<I, S>(tuples: I) -> Result<Self, InputError>
    where
        I: IntoIterator<Item = (S, f64, f64)>,
        S: Into<String>,
    {
        let games = tuples
            .into_iter()
            .map(|(id, rating, score)| GameRecord::new(id, rating, Score::try_from(score)?))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(games)
    }

    /// Returns the games in the order they were played.
    pub fn games(&self) -> &[GameRecord] {
        &self.games
    }

    /// Returns an iterator over the games.
    pub fn iter(&self) -> std::slice::Iter<'_, GameRecord> {
        self.games.iter()
    }

    /// Returns the number of games in the tournament.
    pub fn len(&self) -> usize {
        self.games.len()
    }

    /// Always false; an empty tournament cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Returns the total points scored.
    pub fn score(&self) -> f64 {
        self.games.iter().map(|g| g.score.value()).sum()
    }

    /// Returns how many games ended with the given score.
    pub fn count(&self, score: Score) -> u32 {
        self.games.iter().filter(|g| g.score == score).count() as u32
    }

    pub fn wins(&self) -> u32 {
        self.count(Score::Win)
    }

    pub fn draws(&self) -> u32 {
        self.count(Score::Draw)
    }

    pub fn losses(&self) -> u32 {
        self.count(Score::Loss)
    }

    /// Returns the opponents' ratings in game order.
    pub fn opponent_ratings(&self) -> Vec<f64> {
        self.games.iter().map(|g| g.opponent_rating).collect()
    }

    /// Returns the largest number of games played against any one opponent.
    pub fn max_games_against_one_opponent(&self) -> usize {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for game in &self.games {
            *counts.entry(game.opponent_id.as_str()).or_insert(0) += 1;
        }
        counts.into_values().max().unwrap_or(0)
    }
}

impl TryFrom<Vec<GameRecord>> for TournamentResults {
    type Error = InputError;

    fn try_from(games: Vec<GameRecord>) -> Result<Self, Self::Error> {
        Self::new(games)
    }
}

impl From<TournamentResults> for Vec<GameRecord> {
    fn from(results: TournamentResults) -> Self {
        results.games
    }
}

impl<'a> IntoIterator for &'a TournamentResults {
    type Item = &'a GameRecord;
    type IntoIter = std::slice::Iter<'a, GameRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.games.iter()
    }
}
