//! Shared stage deadline.

use std::time::Duration;
use tokio::time::Instant;

/// Absolute instant after which no new attempt may start.
///
/// Computed once at stage entry and shared read-only by every task in the
/// stage. Uses the monotonic clock (tokio's, so paused-time tests see it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StageDeadline {
    at: Instant,
}

impl StageDeadline {
    /// Deadline `budget` from now.
    pub fn after(budget: Duration) -> Self {
        Self {
            at: Instant::now() + budget,
        }
    }

    /// Deadline at a specific instant.
    pub fn at(at: Instant) -> Self {
        Self { at }
    }

    /// The deadline instant.
    pub fn instant(&self) -> Instant {
        self.at
    }

    /// Time left, zero once passed.
    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    /// True once the deadline has been reached.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.at
    }

    /// True if an attempt started after waiting `wait` would still begin before the deadline.
    pub fn admits_start_after(&self, wait: Duration) -> bool {
        Instant::now() + wait < self.at
    }
}
