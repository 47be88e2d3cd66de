//! Time sources for rate limiters.
//!
//! A limiter needs two things from its environment: a way to read the
//! current time, and a way to suspend the calling thread. The [`Clock`]
//! trait bundles both, which allows the passage of time to be mocked
//! entirely in tests (see [`FakeRelativeClock`]).

use std::fmt::Debug;
use std::ops::Add;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::nanos::Nanos;

/// A measurement from a clock.
pub trait Reference:
    Sized + Add<Nanos, Output = Self> + PartialEq + Eq + Ord + Copy + Clone + Send + Sync + Debug
{
    /// Determines the time that separates two measurements of a
    /// clock. Implementations of this must perform a saturating
    /// subtraction - if the `earlier` timestamp should be later,
    /// `duration_since` must return the zero duration.
    fn duration_since(&self, earlier: Self) -> Nanos;
}

/// A time source used by rate limiters.
pub trait Clock: Clone {
    /// A measurement of a monotonically increasing clock.
    type Instant: Reference;

    /// Returns a measurement of the clock.
    fn now(&self) -> Self::Instant;

    /// Suspends the calling thread for (at least, on a best-effort basis) `duration`.
    ///
    /// The default implementation parks the thread with [`std::thread::sleep`]. Clocks that do
    /// not follow real time must override this so that sleeping advances *their* notion of now.
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration)
    }
}

/// A mock implementation of a clock. All it does is keep track of
/// what "now" is (relative to some point meaningful to the program),
/// and returns that.
///
/// Sleeping on this clock does not block: it advances the fake time by the
/// requested duration and returns immediately.
///
/// # Thread safety
/// The mock time is represented as an atomic u64 count of nanoseconds, behind an [`Arc`].
/// Clones of this clock will all show the same time, even if the original advances.
#[derive(Debug, Clone, Default)]
pub struct FakeRelativeClock {
    now: Arc<AtomicU64>,
}

impl FakeRelativeClock {
    /// Advances the fake clock by the given amount.
    pub fn advance(&self, by: Duration) {
        let by: u64 = Nanos::from(by).as_u64();

        let mut prev = self.now.load(Ordering::Acquire);
        let mut next = prev + by;
        while let Err(next_prev) =
            self.now
                .compare_exchange_weak(prev, next, Ordering::Release, Ordering::Relaxed)
        {
            prev = next_prev;
            next = prev + by;
        }
    }
}

impl PartialEq for FakeRelativeClock {
    fn eq(&self, other: &Self) -> bool {
        self.now.load(Ordering::Relaxed) == other.now.load(Ordering::Relaxed)
    }
}

impl Clock for FakeRelativeClock {
    type Instant = Nanos;

    fn now(&self) -> Self::Instant {
        self.now.load(Ordering::Relaxed).into()
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}

mod with_std;
pub use with_std::*;

#[cfg(feature = "quanta")]
mod quanta;
#[cfg(feature = "quanta")]
pub use self::quanta::*;

mod default;
pub use default::*;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fake_clock_parity() {
        let c1 = FakeRelativeClock::default();
        let c2 = c1.clone();
        c1.advance(Duration::from_millis(10));
        assert_eq!(c1, c2);
        assert_eq!(c2.now(), Nanos::from(Duration::from_millis(10)));
    }

    #[test]
    fn fake_clock_sleep_advances() {
        let clock = FakeRelativeClock::default();
        let before = clock.now();
        clock.sleep(Duration::from_secs(3));
        assert_eq!(
            clock.now().duration_since(before),
            Nanos::from(Duration::from_secs(3))
        );
    }

    #[test]
    fn fake_clock_concurrent_advances() {
        let clock = FakeRelativeClock::default();
        crossbeam::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|_| {
                    for _ in 0..100 {
                        clock.advance(Duration::from_nanos(1));
                    }
                });
            }
        })
        .unwrap();
        assert_eq!(clock.now(), Nanos::new(800));
    }
}
