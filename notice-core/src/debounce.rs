//! Debounce timing for raw search input.
//!
//! [`DebounceState`] decides when a rapidly changing input has become
//! stable. It owns no timer: the caller reports each change together with
//! the current instant, sleeps until [`DebounceState::deadline`], and then
//! calls [`DebounceState::poll`]. Every change restarts the quiet period, so
//! a burst of keystrokes yields exactly one value: the last one.
//!
//! The state is generic over the instant type so the async driver can use
//! `tokio::time::Instant` (and its paused test clock) while unit tests use
//! `std::time::Instant`.

use std::ops::Add;
use std::time::{Duration, Instant};

/// Quiet period used when none is configured.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
struct Pending<I> {
    value: String,
    deadline: I,
}

/// Pending-value tracker for a debounced input.
#[derive(Debug, Clone)]
pub struct DebounceState<I = Instant> {
    quiet: Duration,
    pending: Option<Pending<I>>,
}

impl<I> DebounceState<I>
where
    I: Copy + Ord + Add<Duration, Output = I>,
{
    /// Create a tracker with the given quiet period.
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    /// The configured quiet period.
    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    /// Record a change to the raw input observed at `now`.
    ///
    /// Replaces any pending value and restarts the quiet period. Returns the
    /// instant at which the value becomes stable.
    pub fn observe(&mut self, value: impl Into<String>, now: I) -> I {
        let deadline = now + self.quiet;
        self.pending = Some(Pending {
            value: value.into(),
            deadline,
        });
        deadline
    }

    /// When the pending value becomes stable, if there is one.
    pub fn deadline(&self) -> Option<I> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Check if a value is waiting for its quiet period to elapse.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Emit the pending value if its quiet period has elapsed at `now`.
    pub fn poll(&mut self, now: I) -> Option<String> {
        match &self.pending {
            Some(pending) if now >= pending.deadline => self.pending.take().map(|p| p.value),
            _ => None,
        }
    }

    /// Emit the pending value immediately, regardless of its deadline.
    ///
    /// Used when the input source closes so the final value of a burst is
    /// never dropped.
    pub fn flush(&mut self) -> Option<String> {
        self.pending.take().map(|p| p.value)
    }
}

impl Default for DebounceState<Instant> {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}
