//! Condition Poller
//!
//! Blocks the calling thread until a condition over a subject holds or a
//! timeout elapses. Every waiting helper in the crate bottoms out here.
//!
//! ## Guarantees
//!
//! - A condition that already holds returns after a single evaluation, with
//!   no sleep, whatever the timeout.
//! - A condition that starts holding mid-wait returns on the next poll.
//! - A zero timeout evaluates the condition exactly once.
//! - The poller never sleeps past the deadline.

use std::time::{Duration, Instant};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout for waiting assertions (8 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 8_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Lower bound for the sleep between polls
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Timeout and polling interval for a single wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    timeout: Duration,
    poll_interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that check once and never wait
    #[must_use]
    pub fn immediate() -> Self {
        Self::default().with_timeout(Duration::ZERO)
    }

    /// Set the timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Timeout for this wait
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Interval between evaluations
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

// =============================================================================
// POLL OUTCOME
// =============================================================================

/// Outcome of waiting for a condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PollOutcome {
    /// The condition held before the timeout
    Satisfied,
    /// The timeout elapsed with the condition still false
    TimedOut,
}

impl PollOutcome {
    /// Whether the condition held
    #[must_use]
    pub const fn is_satisfied(&self) -> bool {
        matches!(self, Self::Satisfied)
    }

    /// Whether the wait ran out of time
    #[must_use]
    pub const fn is_timed_out(&self) -> bool {
        matches!(self, Self::TimedOut)
    }
}

impl From<bool> for PollOutcome {
    fn from(satisfied: bool) -> Self {
        if satisfied {
            Self::Satisfied
        } else {
            Self::TimedOut
        }
    }
}

/// Outcome plus the timing of how it was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollReport {
    /// Whether the condition held
    pub outcome: PollOutcome,
    /// Time spent from the first evaluation to the outcome
    pub elapsed: Duration,
    /// How many times the condition was evaluated
    pub evaluations: u32,
}

impl PollReport {
    /// Report for a satisfied wait
    #[must_use]
    pub const fn satisfied(elapsed: Duration, evaluations: u32) -> Self {
        Self {
            outcome: PollOutcome::Satisfied,
            elapsed,
            evaluations,
        }
    }

    /// Report for a wait that ran out of time
    #[must_use]
    pub const fn timed_out(elapsed: Duration, evaluations: u32) -> Self {
        Self {
            outcome: PollOutcome::TimedOut,
            elapsed,
            evaluations,
        }
    }

    /// Whether the condition held
    #[must_use]
    pub const fn is_satisfied(&self) -> bool {
        self.outcome.is_satisfied()
    }
}

// =============================================================================
// POLLER
// =============================================================================

/// Evaluate `condition` against `subject` until it holds or the timeout
/// elapses.
pub fn poll_until<S, F>(subject: &S, condition: F, options: &WaitOptions) -> PollReport
where
    S: ?Sized,
    F: Fn(&S) -> bool,
{
    let start = Instant::now();
    let mut evaluations = 1;

    if condition(subject) {
        return PollReport::satisfied(start.elapsed(), evaluations);
    }

    let timeout = options.timeout();
    let interval = options.poll_interval().max(MIN_POLL_INTERVAL);

    loop {
        let elapsed = start.elapsed();
        if elapsed >= timeout {
            return PollReport::timed_out(elapsed, evaluations);
        }

        std::thread::sleep(interval.min(timeout - elapsed));

        evaluations += 1;
        if condition(subject) {
            return PollReport::satisfied(start.elapsed(), evaluations);
        }
    }
}

/// Capability shared by every subject a helper can wait on.
///
/// The provided [`wait_until`](Awaitable::wait_until) sleeps between polls on
/// the calling thread. Hosts whose automation runtime can wait on UI events
/// (and let the app go idle in between) override it.
pub trait Awaitable {
    /// Wait for `condition` to hold for `self`
    fn wait_until(&self, condition: &dyn Fn(&Self) -> bool, options: &WaitOptions) -> PollReport {
        poll_until(self, condition, options)
    }
}

// =============================================================================
// TESTS
// =============================================================================
