//! Spacing policy between poll cycles
//!
//! Polling at a fixed rhythm is easy for the remote side to spot, so the
//! default policy draws each pause from a uniform range. Tests and tooling
//! use the fixed variant.

use rand::Rng;
use std::time::Duration;

/// Source of pauses between consecutive poll cycles
pub trait RetryDelay: Send + Sync {
    /// Pick the pause to apply before the next cycle
    fn next_delay(&self) -> Duration;
}

/// Draws each pause uniformly from an inclusive range of seconds
///
/// # Examples
///
/// ```
/// use slotwatch::watch::{RetryDelay, UniformDelay};
///
/// let delay = UniformDelay::new(120, 419);
/// let pause = delay.next_delay();
/// assert!(pause.as_secs() >= 120 && pause.as_secs() <= 419);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct UniformDelay {
    min_secs: u64,
    max_secs: u64,
}

impl UniformDelay {
    /// Create a policy drawing from `min_secs..=max_secs`
    ///
    /// Callers validate the range before constructing; `min_secs` must not
    /// exceed `max_secs`.
    pub fn new(min_secs: u64, max_secs: u64) -> Self {
        Self { min_secs, max_secs }
    }
}

impl RetryDelay for UniformDelay {
    fn next_delay(&self) -> Duration {
        let secs = rand::rng().random_range(self.min_secs..=self.max_secs);
        Duration::from_secs(secs)
    }
}

/// Always returns the same pause
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    pause: Duration,
}

impl FixedDelay {
    pub fn new(pause: Duration) -> Self {
        Self { pause }
    }
}

impl RetryDelay for FixedDelay {
    fn next_delay(&self) -> Duration {
        self.pause
    }
}
