use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::clock::{self, Clock, Reference};
use crate::limiter::{Limiter, Reservation};
use crate::pacing::{Pacing, PacingState, Transition};
use crate::Quota;

/// A limiter whose pacing state lives behind a mutex.
///
/// [`take`](Limiter::take) holds the lock for the entire request: it reads the clock, computes
/// the new state, sleeps for whatever wait that state demands and only then commits it and
/// lets go. The next caller can not even start computing its own wait before the previous one
/// is done sleeping, so callers are served one at a time, in the order they acquire the lock.
///
/// Compared to [`LockFreeLimiter`][crate::LockFreeLimiter], this never retries, but under
/// contention every waiting caller queues behind the sleeping one even if their ideal waits
/// would have overlapped.
#[derive(Debug)]
pub struct LockBasedLimiter<C: Clock = clock::DefaultClock> {
    state: Mutex<Option<PacingState>>,
    pacing: Pacing,
    quota: Quota,
    clock: C,
    start: C::Instant,
}

impl LockBasedLimiter<clock::DefaultClock> {
    /// Constructs a lock-based limiter for a quota with the default real-time clock.
    pub fn new(quota: Quota) -> Self {
        Self::with_clock(quota, clock::DefaultClock::default())
    }
}

impl<C: Clock> LockBasedLimiter<C> {
    /// Constructs a lock-based limiter for a quota with a custom clock.
    pub fn with_clock(quota: Quota, clock: C) -> Self {
        let pacing = Pacing::new(quota);
        let start = clock.now();
        debug!(
            interval = ?pacing.interval(),
            max_slack = ?pacing.max_slack(),
            "constructed lock-based limiter"
        );
        LockBasedLimiter {
            state: Mutex::new(None),
            pacing,
            quota,
            clock,
            start,
        }
    }

    fn transition(&self, previous: Option<PacingState>) -> Transition {
        let now = self.clock.now().duration_since(self.start);
        self.pacing.transition(previous, now)
    }

    /// Commits the caller's slot in the schedule without waiting for it.
    ///
    /// The lock is released before this returns, so unlike [`take`](Limiter::take), other
    /// callers are scheduled while this caller waits for its reservation.
    pub fn reserve(&self) -> Reservation<C::Instant> {
        let mut state = self.state.lock();
        let Transition { next, wait } = self.transition(*state);
        *state = Some(next);
        trace!(?wait, scheduled = ?next.last, "committed pacing state");
        Reservation::new(wait.into(), self.start + next.last)
    }

    /// Sleeps on the limiter's clock until the reserved slot arrives, and returns its time.
    pub fn wait_for(&self, reservation: Reservation<C::Instant>) -> C::Instant {
        if !reservation.is_immediate() {
            self.clock.sleep(reservation.wait());
        }
        reservation.scheduled_at()
    }

    /// The quota this limiter was constructed with.
    pub fn quota(&self) -> Quota {
        self.quota
    }

    /// The ideal spacing between two requests.
    pub fn interval(&self) -> Duration {
        self.pacing.interval()
    }

    /// The most burst credit this limiter banks during idle time.
    pub fn max_slack(&self) -> Duration {
        self.pacing.max_slack()
    }
}

impl<C: Clock> Limiter for LockBasedLimiter<C> {
    type Instant = C::Instant;

    fn take(&self) -> C::Instant {
        let mut state = self.state.lock();
        let Transition { next, wait } = self.transition(*state);
        if !wait.is_zero() {
            // Sleeping with the lock held serializes all callers.
            self.clock.sleep(wait.into());
        }
        *state = Some(next);
        trace!(?wait, scheduled = ?next.last, "committed pacing state");
        self.start + next.last
    }
}
