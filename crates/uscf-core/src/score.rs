//! Game score representation.

use crate::InputError;
use serde::{Deserialize, Serialize};

/// The outcome of a single game from the rated player's point of view.
///
/// Serialized as its numeric value (`0`, `0.5` or `1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum Score {
    Loss,
    Draw,
    Win,
}

impl Score {
    /// All scores in ascending order.
    pub const ALL: [Score; 3] = [Score::Loss, Score::Draw, Score::Win];

    /// Returns the points earned for this outcome.
    #[inline]
    pub const fn value(self) -> f64 {
        match self {
            Score::Loss => 0.0,
            Score::Draw => 0.5,
            Score::Win => 1.0,
        }
    }

    /// Returns the opponent's outcome for the same game.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Score::Loss => Score::Win,
            Score::Draw => Score::Draw,
            Score::Win => Score::Loss,
        }
    }
}

impl TryFrom<f64> for Score {
    type Error = InputError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if value == 1.0 {
            Ok(Score::Win)
        } else if value == 0.5 {
            Ok(Score::Draw)
        } else if value == 0.0 {
            Ok(Score::Loss)
        } else {
            Err(InputError::InvalidScore(value))
        }
    }
}

impl From<Score> for f64 {
    fn from(score: Score) -> Self {
        score.value()
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Score::Loss => write!(f, "0"),
            Score::Draw => write!(f, "½"),
            Score::Win => write!(f, "1"),
        }
    }
}
