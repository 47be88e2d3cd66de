use std::time::Duration;

use tracing::{debug, trace};

use crate::clock::{self, Clock, Reference};
use crate::limiter::{Limiter, Reservation};
use crate::pacing::{Pacing, PacingState};
use crate::state::AtomicState;
use crate::Quota;

/// A limiter whose pacing state lives in a single atomic cell.
///
/// Each request reads the committed state, computes its successor against a fresh reading of
/// the clock, and tries to swap it in. A request that loses the race to another one starts
/// over on the newer state, so no caller is ever told to wait based on a state that was not
/// committed. The wait happens after the commit: while one caller sleeps, others are already
/// being scheduled behind it.
///
/// # Example
/// ```rust
/// # use nonzero_ext::nonzero;
/// use pacer::{Limiter, LockFreeLimiter, Quota};
///
/// let limiter = LockFreeLimiter::new(Quota::per_second(nonzero!(1000u32)).without_slack());
/// let first = limiter.take();
/// let second = limiter.take();
/// assert!(second > first);
/// ```
#[derive(Debug)]
pub struct LockFreeLimiter<C: Clock = clock::DefaultClock> {
    state: AtomicState<PacingState>,
    pacing: Pacing,
    quota: Quota,
    clock: C,
    start: C::Instant,
}

impl LockFreeLimiter<clock::DefaultClock> {
    /// Constructs a lock-free limiter for a quota with the default real-time clock.
    pub fn new(quota: Quota) -> Self {
        Self::with_clock(quota, clock::DefaultClock::default())
    }
}

impl<C: Clock> LockFreeLimiter<C> {
    /// Constructs a lock-free limiter for a quota with a custom clock.
    pub fn with_clock(quota: Quota, clock: C) -> Self {
        let pacing = Pacing::new(quota);
        let start = clock.now();
        debug!(
            interval = ?pacing.interval(),
            max_slack = ?pacing.max_slack(),
            native_atomics = AtomicState::<PacingState>::is_lock_free(),
            "constructed lock-free limiter"
        );
        LockFreeLimiter {
            state: AtomicState::default(),
            pacing,
            quota,
            clock,
            start,
        }
    }

    /// Commits the caller's slot in the schedule without waiting for it.
    ///
    /// The limiter treats the reservation as taken: subsequent callers are paced behind it
    /// whether or not the caller ever waits.
    pub fn reserve(&self) -> Reservation<C::Instant> {
        let mut attempts: u32 = 0;
        let (wait, scheduled) = self.state.measure_and_replace(|previous| {
            attempts += 1;
            let now = self.clock.now().duration_since(self.start);
            let transition = self.pacing.transition(previous, now);
            (
                (transition.wait, transition.next.last),
                transition.next,
            )
        });
        trace!(?wait, ?scheduled, attempts, "committed pacing state");
        Reservation::new(wait.into(), self.start + scheduled)
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

impl<C: Clock> Limiter for LockFreeLimiter<C> {
    type Instant = C::Instant;

    fn take(&self) -> C::Instant {
        // Only the winning attempt's wait is applied, and only after it was committed.
        let reservation = self.reserve();
        self.wait_for(reservation)
    }
}
