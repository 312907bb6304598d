//! Time control descriptor.

use crate::InputError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Base time in minutes plus a per-move increment in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeControl {
    pub minutes: u32,
    pub increment_seconds: u32,
}

impl TimeControl {
    pub const fn new(minutes: u32, increment_seconds: u32) -> Self {
        TimeControl {
            minutes,
            increment_seconds,
        }
    }

    /// Minutes plus increment seconds, the quantity the K-factor rules test.
    /// Saturates at `u32::MAX`.
    #[inline]
    pub const fn combined(self) -> u32 {
        self.minutes.saturating_add(self.increment_seconds)
    }
}

impl Default for TimeControl {
    fn default() -> Self {
        TimeControl::new(60, 0)
    }
}

impl FromStr for TimeControl {
    type Err = InputError;

    /// Parses `"90+30"` or a bare `"90"` (no increment).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InputError::InvalidTimeControl(s.to_string());
        let (minutes, increment) = match s.trim().split_once('+') {
            Some((m, i)) => (m.trim(), i.trim()),
            None => (s.trim(), "0"),
        };
        let minutes = minutes.parse::<u32>().map_err(|_| invalid())?;
        let increment_seconds = increment.parse::<u32>().map_err(|_| invalid())?;
        Ok(TimeControl::new(minutes, increment_seconds))
    }
}

impl std::fmt::Display for TimeControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}+{}", self.minutes, self.increment_seconds)
    }
}
