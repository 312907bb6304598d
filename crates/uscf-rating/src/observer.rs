//! Observation of the special rating search.
//!
//! The solver never logs on its own. Each step is reported as a
//! [`SolverEvent`] to the [`SolverObserver`] the caller passes in, so tests
//! can record the path and services can route it to `tracing`.

/// Direction the search is moving in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDirection {
    /// Toward lower ratings (residual above zero).
    Down,
    /// Toward higher ratings (residual below zero).
    Up,
}

/// One step of the special rating search.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverEvent {
    /// First estimate and its residual.
    Started { estimate: f64, residual: f64 },
    /// The objective is flat up to the next knot; the search jumped there.
    FlatJump {
        direction: SearchDirection,
        knot: f64,
        residual: f64,
    },
    /// The secant root fell outside the current cell; the search moved to its edge.
    KnotStep {
        direction: SearchDirection,
        knot: f64,
        residual: f64,
    },
    /// The secant root fell inside the current cell and became the estimate.
    SecantStep {
        direction: SearchDirection,
        estimate: f64,
        residual: f64,
    },
    /// The search in one direction stopped.
    Converged {
        direction: SearchDirection,
        estimate: f64,
        residual: f64,
        steps: usize,
    },
    /// No knot was left in the search direction.
    OutOfKnots {
        direction: SearchDirection,
        estimate: f64,
        residual: f64,
    },
    /// The step budget ran out before the search converged.
    StepBudgetExhausted {
        direction: SearchDirection,
        estimate: f64,
        residual: f64,
    },
    /// The root lay on a flat stretch with no nearby opponent and was re-anchored.
    DegenerateRoot { estimate: f64, resolved: f64 },
    /// The result was lowered to the special rating cap.
    Capped { estimate: f64, cap: f64 },
}

/// Receives solver events.
pub trait SolverObserver {
    fn observe(&mut self, event: &SolverEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SolverObserver for NoopObserver {
    fn observe(&mut self, _event: &SolverEvent) {}
}

/// Forwards events to `tracing`: search steps at `trace`, outcomes at `debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl SolverObserver for TracingObserver {
    fn observe(&mut self, event: &SolverEvent) {
        match *event {
            SolverEvent::Started { estimate, residual } => {
                tracing::trace!(estimate, residual, "special rating search started");
            }
            SolverEvent::FlatJump {
                direction,
                knot,
                residual,
            } => {
                tracing::trace!(?direction, knot, residual, "flat segment, jumped to knot");
            }
            SolverEvent::KnotStep {
                direction,
                knot,
                residual,
            } => {
                tracing::trace!(?direction, knot, residual, "secant overshot, moved to knot");
            }
            SolverEvent::SecantStep {
                direction,
                estimate,
                residual,
            } => {
                tracing::trace!(?direction, estimate, residual, "secant step");
            }
            SolverEvent::Converged {
                direction,
                estimate,
                residual,
                steps,
            } => {
                tracing::debug!(?direction, estimate, residual, steps, "search converged");
            }
            SolverEvent::OutOfKnots {
                direction,
                estimate,
                residual,
            } => {
                tracing::debug!(?direction, estimate, residual, "no knot left in direction");
            }
            SolverEvent::StepBudgetExhausted {
                direction,
                estimate,
                residual,
            } => {
                tracing::warn!(?direction, estimate, residual, "step budget exhausted");
            }
            SolverEvent::DegenerateRoot { estimate, resolved } => {
                tracing::debug!(estimate, resolved, "degenerate root re-anchored");
            }
            SolverEvent::Capped { estimate, cap } => {
                tracing::debug!(estimate, cap, "special rating capped");
            }
        }
    }
}

/// Records every event, in order.
impl SolverObserver for Vec<SolverEvent> {
    fn observe(&mut self, event: &SolverEvent) {
        self.push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_records_in_order() {
        let mut events: Vec<SolverEvent> = Vec::new();
        events.observe(&SolverEvent::Started {
            estimate: 1500.0,
            residual: 0.25,
        });
        events.observe(&SolverEvent::Capped {
            estimate: 2750.0,
            cap: 2700.0,
        });
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], SolverEvent::Capped { cap, .. } if cap == 2700.0));
    }

    #[test]
    fn tracing_observer_accepts_every_event() {
        let mut observer = TracingObserver;
        let direction = SearchDirection::Down;
        let events = [
            SolverEvent::Started { estimate: 1.0, residual: 1.0 },
            SolverEvent::FlatJump { direction, knot: 1.0, residual: 1.0 },
            SolverEvent::KnotStep { direction, knot: 1.0, residual: 1.0 },
            SolverEvent::SecantStep { direction, estimate: 1.0, residual: 0.0 },
            SolverEvent::Converged { direction, estimate: 1.0, residual: 0.0, steps: 3 },
            SolverEvent::OutOfKnots { direction, estimate: 1.0, residual: 1.0 },
            SolverEvent::StepBudgetExhausted { direction, estimate: 1.0, residual: 1.0 },
            SolverEvent::DegenerateRoot { estimate: 1.0, resolved: 2.0 },
            SolverEvent::Capped { estimate: 3.0, cap: 2.0 },
        ];
        for event in &events {
            observer.observe(event);
        }
    }
}
