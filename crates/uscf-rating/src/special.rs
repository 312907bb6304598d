//! Special rating formula.
//!
//! Players with eight or fewer games, or whose every previous game had the
//! same result, are rated by solving
//!
//! ```text
//! f(M) = N' * PWe(M, R0') + sum_i PWe(M, R_i) - S' = 0
//! ```
//!
//! where `PWe` is the linear [`special_expectancy`] curve, `N'` the effective
//! game count, `R0'` and `S'` the adjusted initial rating and score, and
//! `R_i` the opponents' ratings. `f` is non-decreasing and piecewise-linear
//! with knots at every `R_i ± 400` (and `R0' ± 400` when `N' > 0`), so the
//! root is found by secant steps confined to one linear cell at a time.

use crate::expectancy::{special_expectancy, SPECIAL_SPREAD};
use crate::observer::{SearchDirection, SolverEvent, SolverObserver};
use crate::{RatingConfig, RatingError};

/// The special rating equation for one player in one tournament.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecialObjective {
    effective_games: f64,
    adjusted_initial_rating: f64,
    adjusted_score: f64,
    opponent_ratings: Vec<f64>,
}

impl SpecialObjective {
    pub fn new(
        effective_games: f64,
        adjusted_initial_rating: f64,
        adjusted_score: f64,
        opponent_ratings: Vec<f64>,
    ) -> Self {
        SpecialObjective {
            effective_games,
            adjusted_initial_rating,
            adjusted_score,
            opponent_ratings,
        }
    }

    /// Residual of the equation at `rating`.
    pub fn evaluate(&self, rating: f64) -> f64 {
        let opponents: f64 = self
            .opponent_ratings
            .iter()
            .map(|&opponent| special_expectancy(rating, opponent))
            .sum();
        self.effective_games * special_expectancy(rating, self.adjusted_initial_rating)
            + opponents
            - self.adjusted_score
    }

    /// The opponents' knots `R_i ± 400`, sorted and de-duplicated.
    pub fn opponent_knots(&self) -> Vec<f64> {
        knots_around(self.opponent_ratings.iter().copied())
    }

    /// Every point where the slope of `f` can change.
    fn search_knots(&self) -> Vec<f64> {
        let prior = (self.effective_games > 0.0).then_some(self.adjusted_initial_rating);
        knots_around(self.opponent_ratings.iter().copied().chain(prior))
    }

    pub fn opponent_ratings(&self) -> &[f64] {
        &self.opponent_ratings
    }

    pub fn adjusted_initial_rating(&self) -> f64 {
        self.adjusted_initial_rating
    }

    pub fn adjusted_score(&self) -> f64 {
        self.adjusted_score
    }
}

fn knots_around(centers: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut knots: Vec<f64> = centers
        .flat_map(|c| [c - SPECIAL_SPREAD, c + SPECIAL_SPREAD])
        .collect();
    knots.sort_by(f64::total_cmp);
    knots.dedup();
    knots
}

/// Largest knot strictly below `rating`.
fn knot_below(knots: &[f64], rating: f64) -> Option<f64> {
    let idx = knots.partition_point(|&z| z < rating);
    idx.checked_sub(1).map(|i| knots[i])
}

/// Smallest knot strictly above `rating`.
fn knot_above(knots: &[f64], rating: f64) -> Option<f64> {
    let idx = knots.partition_point(|&z| z <= rating);
    knots.get(idx).copied()
}

/// First estimate of the special rating, from the unadjusted rating and score.
pub fn initial_estimate(
    effective_games: f64,
    initial_rating: f64,
    opponent_ratings: &[f64],
    tournament_score: f64,
) -> f64 {
    let games = opponent_ratings.len() as f64;
    let opponents: f64 = opponent_ratings.iter().sum();
    (effective_games * initial_rating + opponents + 400.0 * (2.0 * tournament_score - games))
        / (effective_games + games)
}

/// Root finder for a [`SpecialObjective`].
pub struct SpecialSolver<'a> {
    objective: &'a SpecialObjective,
    search_knots: Vec<f64>,
    opponent_knots: Vec<f64>,
    epsilon: f64,
    cap: f64,
    observer: &'a mut dyn SolverObserver,
}

impl<'a> SpecialSolver<'a> {
    pub fn new(
        objective: &'a SpecialObjective,
        config: &RatingConfig,
        observer: &'a mut dyn SolverObserver,
    ) -> Self {
        SpecialSolver {
            objective,
            search_knots: objective.search_knots(),
            opponent_knots: objective.opponent_knots(),
            epsilon: config.epsilon,
            cap: config.special_rating_cap,
            observer,
        }
    }

    /// Finds the special rating, starting the search at `start`.
    ///
    /// `initial_rating` is the player's unadjusted rating; it decides which
    /// root to report when the equation is zero along a whole flat stretch.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError::InvariantViolation`] if the search ends away
    /// from a root, which a valid objective cannot cause.
    pub fn solve(&mut self, start: f64, initial_rating: f64) -> Result<f64, RatingError> {
        let mut estimate = start;
        let mut residual = self.objective.evaluate(estimate);
        self.observer.observe(&SolverEvent::Started { estimate, residual });

        if residual > self.epsilon {
            (estimate, residual) = self.descend(estimate, residual);
        }
        if residual < -self.epsilon {
            (estimate, residual) = self.ascend(estimate, residual);
        }
        if residual.is_nan() || residual.abs() >= self.epsilon {
            return Err(RatingError::InvariantViolation(format!(
                "search stopped at {estimate} with residual {residual}"
            )));
        }

        let resolved = self.resolve_flat_root(estimate, residual, initial_rating)?;
        if resolved > self.cap {
            self.observer.observe(&SolverEvent::Capped {
                estimate: resolved,
                cap: self.cap,
            });
            return Ok(self.cap);
        }
        Ok(resolved)
    }

    fn step_budget(&self) -> usize {
        4 * self.search_knots.len() + 8
    }

    /// Moves left while the residual is positive.
    fn descend(&mut self, mut estimate: f64, mut residual: f64) -> (f64, f64) {
        let direction = SearchDirection::Down;
        for step in 1..=self.step_budget() {
            let Some(knot) = knot_below(&self.search_knots, estimate) else {
                self.observer.observe(&SolverEvent::OutOfKnots {
                    direction,
                    estimate,
                    residual,
                });
                return (estimate, residual);
            };
            let knot_residual = self.objective.evaluate(knot);

            if (residual - knot_residual).abs() < self.epsilon {
                estimate = knot;
                residual = knot_residual;
                self.observer.observe(&SolverEvent::FlatJump {
                    direction,
                    knot,
                    residual,
                });
                continue;
            }

            let secant = estimate - residual * (estimate - knot) / (residual - knot_residual);
            if secant < knot {
                estimate = knot;
                residual = knot_residual;
                self.observer.observe(&SolverEvent::KnotStep {
                    direction,
                    knot,
                    residual,
                });
            } else if secant < estimate {
                estimate = secant;
                residual = self.objective.evaluate(secant);
                self.observer.observe(&SolverEvent::SecantStep {
                    direction,
                    estimate,
                    residual,
                });
            } else {
                self.observer.observe(&SolverEvent::Converged {
                    direction,
                    estimate,
                    residual,
                    steps: step,
                });
                return (estimate, residual);
            }
        }

        self.observer.observe(&SolverEvent::StepBudgetExhausted {
            direction,
            estimate,
            residual,
        });
        (estimate, residual)
    }

    /// Moves right while the residual is negative.
    fn ascend(&mut self, mut estimate: f64, mut residual: f64) -> (f64, f64) {
        let direction = SearchDirection::Up;
        for step in 1..=self.step_budget() {
            let Some(knot) = knot_above(&self.search_knots, estimate) else {
                self.observer.observe(&SolverEvent::OutOfKnots {
                    direction,
                    estimate,
                    residual,
                });
                return (estimate, residual);
            };
            let knot_residual = self.objective.evaluate(knot);

            if (knot_residual - residual).abs() < self.epsilon {
                estimate = knot;
                residual = knot_residual;
                self.observer.observe(&SolverEvent::FlatJump {
                    direction,
                    knot,
                    residual,
                });
                continue;
            }

            let secant = estimate - residual * (knot - estimate) / (knot_residual - residual);
            if secant > knot {
                estimate = knot;
                residual = knot_residual;
                self.observer.observe(&SolverEvent::KnotStep {
                    direction,
                    knot,
                    residual,
                });
            } else if secant > estimate {
                estimate = secant;
                residual = self.objective.evaluate(secant);
                self.observer.observe(&SolverEvent::SecantStep {
                    direction,
                    estimate,
                    residual,
                });
            } else {
                self.observer.observe(&SolverEvent::Converged {
                    direction,
                    estimate,
                    residual,
                    steps: step,
                });
                return (estimate, residual);
            }
        }

        self.observer.observe(&SolverEvent::StepBudgetExhausted {
            direction,
            estimate,
            residual,
        });
        (estimate, residual)
    }

    /// Picks the reported root when no rating within 400 points supports `estimate`.
    ///
    /// A root with no opponent (and not the prior rating) within 400 points
    /// lies on a flat stretch of `f`, where every point is a root. The
    /// player's unadjusted rating is used if it lies in the enclosing cell of
    /// opponent knots, otherwise the cell edge nearest to it.
    fn resolve_flat_root(
        &mut self,
        estimate: f64,
        residual: f64,
        initial_rating: f64,
    ) -> Result<f64, RatingError> {
        let near = |rating: f64| (estimate - rating).abs() <= SPECIAL_SPREAD;

        let mut support = 0;
        if residual.abs() < self.epsilon {
            support = self
                .objective
                .opponent_ratings
                .iter()
                .filter(|&&opponent| near(opponent))
                .count();
        }
        if near(self.objective.adjusted_initial_rating) {
            support += 1;
        }
        if support > 0 {
            return Ok(estimate);
        }

        let lower = knot_below(&self.opponent_knots, estimate).unwrap_or(f64::NEG_INFINITY);
        let upper = knot_above(&self.opponent_knots, estimate).unwrap_or(f64::INFINITY);
        let resolved = if (lower..=upper).contains(&initial_rating) {
            initial_rating
        } else if initial_rating < lower {
            lower
        } else if initial_rating > upper {
            upper
        } else {
            return Err(RatingError::InvariantViolation(format!(
                "initial rating {initial_rating} cannot be placed against cell [{lower}, {upper}]"
            )));
        };

        self.observer
            .observe(&SolverEvent::DegenerateRoot { estimate, resolved });
        Ok(resolved)
    }
}
