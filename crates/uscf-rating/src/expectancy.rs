//! Winning expectancy curves.
//!
//! The standard formula uses the logistic curve. The special formula uses a
//! linear curve clamped to `[0, 1]`, which keeps its equation piecewise-linear.

/// Rating difference at which the special curve saturates.
pub const SPECIAL_SPREAD: f64 = 400.0;

/// Expected score of `rating` against `opponent_rating` on the logistic curve.
///
/// # Example
///
/// ```
/// use uscf_rating::standard_expectancy;
///
/// assert_eq!(standard_expectancy(1500.0, 1500.0), 0.5);
/// assert!((standard_expectancy(1500.0, 1400.0) - 0.64).abs() < 0.01);
/// ```
pub fn standard_expectancy(rating: f64, opponent_rating: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf(-(rating - opponent_rating) / 400.0))
}

/// Expected score on the linear curve used by special ratings.
///
/// Zero at or below `opponent_rating - 400`, one at or above
/// `opponent_rating + 400`, linear in between.
pub fn special_expectancy(rating: f64, opponent_rating: f64) -> f64 {
    if rating <= opponent_rating - SPECIAL_SPREAD {
        0.0
    } else if rating >= opponent_rating + SPECIAL_SPREAD {
        1.0
    } else {
        0.5 + (rating - opponent_rating) / (2.0 * SPECIAL_SPREAD)
    }
}
