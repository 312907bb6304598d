//! Rating every player of one event.
//!
//! An [`Event`] takes the participants and the pairing list, derives each
//! player's results, and rates them all from their pre-event state. A
//! two-player event is an individual match and follows its own rules.

use crate::observer::{SolverObserver, TracingObserver};
use crate::tournament::{RatingUpdate, TournamentContext};
use crate::{RatingConfig, RatingError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uscf_core::{GameRecord, InputError, Player, Score, TimeControl, TournamentResults};

/// Players in an individual match must be within this many points to be rated.
const MATCH_MAX_RATING_GAP: f64 = 400.0;

/// One game of an event. A `winner` of `None` is a draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    pub white: String,
    pub black: String,
    #[serde(default)]
    pub winner: Option<String>,
}

impl Pairing {
    pub fn new(white: impl Into<String>, black: impl Into<String>, winner: Option<&str>) -> Self {
        Pairing {
            white: white.into(),
            black: black.into(),
            winner: winner.map(str::to_string),
        }
    }

    /// Returns true if `player_id` played this game.
    pub fn involves(&self, player_id: &str) -> bool {
        self.white == player_id || self.black == player_id
    }

    /// The other player of the game, if `player_id` played it.
    pub fn opponent_of(&self, player_id: &str) -> Option<&str> {
        if self.white == player_id {
            Some(&self.black)
        } else if self.black == player_id {
            Some(&self.white)
        } else {
            None
        }
    }

    /// `player_id`'s result in this game.
    pub fn score_for(&self, player_id: &str) -> Score {
        match self.winner.as_deref() {
            None => Score::Draw,
            Some(winner) if winner == player_id => Score::Win,
            Some(_) => Score::Loss,
        }
    }
}

/// Why an event is not rated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "kebab-case")]
pub enum UnratedEvent {
    /// Fewer than two players took part.
    TooFewPlayers { players: usize },
    /// An individual match player does not have an established rating.
    UnestablishedMatchPlayer { player_id: String },
    /// The individual match players are more than 400 points apart.
    MatchRatingGap { rating_gap: f64 },
}

/// One player's line in an event's rating report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingReport {
    pub player_id: String,
    pub event_date: NaiveDate,
    pub games: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub new_rating: f64,
    /// The player's single game was too lopsided to rate.
    pub unrated: bool,
    pub update: RatingUpdate,
}

impl RatingReport {
    fn new(
        player: &Player,
        event_date: NaiveDate,
        results: &TournamentResults,
        update: RatingUpdate,
    ) -> Self {
        RatingReport {
            player_id: player.id().to_string(),
            event_date,
            games: u32::try_from(results.len()).unwrap_or(u32::MAX),
            wins: results.wins(),
            draws: results.draws(),
            losses: results.losses(),
            new_rating: update.rating(),
            unrated: !update.is_rated(),
            update,
        }
    }
}

/// Outcome of rating an event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventRating {
    /// One report per player who played at least one game.
    Rated(Vec<RatingReport>),
    Unrated(UnratedEvent),
}

impl EventRating {
    pub fn reports(&self) -> &[RatingReport] {
        match self {
            EventRating::Rated(reports) => reports,
            EventRating::Unrated(_) => &[],
        }
    }

    /// Records each report's career counters on the matching player.
    ///
    /// Players without a report are left unchanged. Does nothing for an
    /// unrated event.
    pub fn commit(&self, players: &mut [Player]) {
        for report in self.reports() {
            if let Some(player) = players.iter_mut().find(|p| p.id() == report.player_id) {
                report.update.commit(player);
            }
        }
    }
}

/// A validated event, ready to be rated.
#[derive(Debug, Clone)]
pub struct Event<'a> {
    players: &'a [Player],
    pairings: Vec<Pairing>,
    date: NaiveDate,
    time_control: TimeControl,
    config: RatingConfig,
}

impl<'a> Event<'a> {
    /// Validates the players and pairings of an event.
    ///
    /// # Errors
    ///
    /// - [`InputError::DuplicatePlayer`] if two players share an id
    /// - [`InputError::UnknownPlayer`] if a pairing names someone not in `players`
    /// - [`InputError::InvalidPairing`] if a player is paired with themselves,
    ///   or the winner did not play the game
    pub fn new(
        players: &'a [Player],
        pairings: Vec<Pairing>,
        date: NaiveDate,
        time_control: TimeControl,
    ) -> Result<Self, InputError> {
        let mut ids = HashSet::new();
        for player in players {
            if !ids.insert(player.id()) {
                return Err(InputError::DuplicatePlayer(player.id().to_string()));
            }
        }

        for pairing in &pairings {
            for id in [&pairing.white, &pairing.black] {
                if !ids.contains(id.as_str()) {
                    return Err(InputError::UnknownPlayer(id.clone()));
                }
            }
            if pairing.white == pairing.black {
                return Err(InputError::InvalidPairing(format!(
                    "{} is paired with themselves",
                    pairing.white
                )));
            }
            if let Some(winner) = pairing.winner.as_deref().filter(|w| !pairing.involves(w)) {
                return Err(InputError::InvalidPairing(format!(
                    "winner {winner} did not play {} - {}",
                    pairing.white, pairing.black
                )));
            }
        }

        Ok(Event {
            players,
            pairings,
            date,
            time_control,
            config: RatingConfig::default(),
        })
    }

    pub fn with_config(mut self, config: RatingConfig) -> Self {
        self.config = config;
        self
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn pairings(&self) -> &[Pairing] {
        &self.pairings
    }

    /// Returns true if exactly two players took part.
    pub fn is_individual_match(&self) -> bool {
        self.players.len() == 2
    }

    /// The reason this event cannot be rated, if any.
    pub fn unrated_reason(&self) -> Option<UnratedEvent> {
        match self.players {
            [] | [_] => Some(UnratedEvent::TooFewPlayers {
                players: self.players.len(),
            }),
            [first, second] => {
                if let Some(p) = [first, second].into_iter().find(|p| !p.is_established()) {
                    return Some(UnratedEvent::UnestablishedMatchPlayer {
                        player_id: p.id().to_string(),
                    });
                }
                let rating_gap = (first.initial_rating() - second.initial_rating()).abs();
                (rating_gap > MATCH_MAX_RATING_GAP).then_some(UnratedEvent::MatchRatingGap { rating_gap })
            }
            _ => None,
        }
    }

    fn player(&self, id: &str) -> Result<&'a Player, InputError> {
        self.players
            .iter()
            .find(|p| p.id() == id)
            .ok_or_else(|| InputError::UnknownPlayer(id.to_string()))
    }

    /// `player`'s games in this event, or `None` if they played none.
    ///
    /// Opponent ratings are the opponents' pre-event initial ratings.
    pub fn results_for(&self, player: &Player) -> Result<Option<TournamentResults>, InputError> {
        let id = player.id();
        let games = self
            .pairings
            .iter()
            .filter_map(|pairing| pairing.opponent_of(id).map(|opponent| (pairing, opponent)))
            .map(|(pairing, opponent)| {
                let opponent = self.player(opponent)?;
                GameRecord::new(opponent.id(), opponent.initial_rating(), pairing.score_for(id))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if games.is_empty() {
            return Ok(None);
        }
        TournamentResults::new(games).map(Some)
    }

    /// Rates every player who played, without changing anyone.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError::InvariantViolation`] if a special rating
    /// search fails.
    pub fn evaluate(&self, observer: &mut dyn SolverObserver) -> Result<EventRating, RatingError> {
        if let Some(reason) = self.unrated_reason() {
            tracing::info!(date = %self.date, ?reason, "event not rated");
            return Ok(EventRating::Unrated(reason));
        }

        let mut reports = Vec::with_capacity(self.players.len());
        for player in self.players {
            let Some(results) = self.results_for(player)? else {
                tracing::debug!(player = player.id(), "no games in event");
                continue;
            };

            let context =
                TournamentContext::new(player, &results, self.time_control).with_config(self.config);
            let update = if self.is_individual_match() {
                RatingUpdate::Rated(context.evaluate_individual_match())
            } else {
                context.evaluate(observer)?
            };

            tracing::debug!(
                player = player.id(),
                games = results.len(),
                rating = update.rating(),
                "player rated"
            );
            reports.push(RatingReport::new(player, self.date, &results, update));
        }

        tracing::info!(
            date = %self.date,
            players = reports.len(),
            individual_match = self.is_individual_match(),
            "event rated"
        );
        Ok(EventRating::Rated(reports))
    }
}

/// Rates an event and commits every player's career counters.
///
/// # Errors
///
/// Returns [`RatingError::InvalidInput`] if the event fails validation. No
/// player is changed on error.
pub fn rate_event(
    players: &mut [Player],
    pairings: Vec<Pairing>,
    date: NaiveDate,
    time_control: TimeControl,
) -> Result<EventRating, RatingError> {
    let rating = Event::new(players, pairings, date, time_control)?.evaluate(&mut TracingObserver)?;
    rating.commit(players);
    Ok(rating)
}
