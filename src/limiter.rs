//! Limiters that pace the callers sharing them.
//!
//! All limiters here implement [`Limiter`]: a blocking [`take`](Limiter::take) that returns
//! once it is the caller's turn. They differ in how concurrent callers are coordinated:
//!
//! * [`LockFreeLimiter`] commits each request's pacing state with a compare-and-swap and
//!   waits afterwards, outside of any critical section.
//! * [`LockBasedLimiter`] holds a mutex across computing, waiting and committing, so callers
//!   proceed strictly one after the other.
//! * [`TokenBucketLimiter`] hands out tokens that collect in a bucket of bounded capacity,
//!   and lets callers take several at once.
//! * [`Unlimited`] never waits.

use std::time::Duration;

mod lock_based;
mod lock_free;
mod token_bucket;
mod unlimited;

pub use lock_based::*;
pub use lock_free::*;
pub use token_bucket::*;
pub use unlimited::*;

/// A rate limiter that paces callers by blocking them.
pub trait Limiter {
    /// The timestamps a limiter hands out.
    type Instant;

    /// Blocks until it is the caller's turn to proceed and returns the time the caller was
    /// scheduled at.
    ///
    /// This never fails; the first call on a fresh limiter returns immediately.
    fn take(&self) -> Self::Instant;
}

/// A committed slot in a limiter's schedule that the caller has not waited for yet.
///
/// Reservations are made with the `reserve` method of the limiters; by the time one is
/// returned, the limiter has already moved on and will schedule the next caller after it.
/// Pass it to the limiter's `wait_for` method to sleep until the slot arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a reservation is only honored by waiting for it"]
pub struct Reservation<P> {
    wait: Duration,
    scheduled_at: P,
}

impl<P: Copy> Reservation<P> {
    pub(crate) fn new(wait: Duration, scheduled_at: P) -> Self {
        Reservation { wait, scheduled_at }
    }

    /// How long the caller must wait (measured from when the reservation was made) before
    /// proceeding.
    pub fn wait(&self) -> Duration {
        self.wait
    }

    /// The time at which the caller is scheduled to proceed.
    pub fn scheduled_at(&self) -> P {
        self.scheduled_at
    }

    /// Whether the caller may proceed right away.
    pub fn is_immediate(&self) -> bool {
        self.wait.is_zero()
    }
}
