//! Rating computation errors.

use thiserror::Error;
use uscf_core::InputError;

/// Errors that can occur while computing a rating update.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RatingError {
    /// The player or results failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),
    /// The special rating search reached a state a piecewise-linear,
    /// non-decreasing objective cannot produce. This is a logic defect.
    #[error("special rating invariant violated: {0}")]
    InvariantViolation(String),
}
