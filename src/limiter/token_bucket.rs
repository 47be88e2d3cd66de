use std::num::NonZeroU32;
use std::time::Duration;

use tracing::{debug, trace};

use crate::bucket::{Bucket, BucketState};
use crate::clock::{self, Clock, Reference};
use crate::limiter::{Limiter, Reservation};
use crate::state::AtomicState;
use crate::Quota;

/// The number of tokens a token bucket holds unless told otherwise.
pub const DEFAULT_CAPACITY: NonZeroU32 = match NonZeroU32::new(10) {
    Some(capacity) => capacity,
    None => panic!("capacity must be positive"),
};

/// A lock-free limiter that hands out tokens from a bucket, letting callers take several at
/// once.
///
/// Tokens drip in one per [`interval`](Quota::interval) of the quota, and collect in the bucket
/// up to its capacity while nobody takes them. A request that finds enough tokens proceeds
/// immediately; otherwise it waits for the missing ones to drip in. A request larger than the
/// capacity is allowed, it just always waits. The quota's slack plays no part here: the
/// capacity alone bounds bursts.
///
/// Like [`LockFreeLimiter`][crate::LockFreeLimiter], the bucket lives in a single atomic
/// cell that requests update with a compare-and-swap, and callers wait after their tokens have
/// been committed.
///
/// # Example
/// ```rust
/// # use nonzero_ext::nonzero;
/// use pacer::{clock::FakeRelativeClock, Quota, TokenBucketLimiter};
/// use std::time::Duration;
///
/// let clock = FakeRelativeClock::default();
/// let quota = Quota::per_second(nonzero!(100u32));
/// let limiter = TokenBucketLimiter::with_clock(quota, nonzero!(5u32), clock.clone());
///
/// limiter.take_n(nonzero!(1u32));
/// clock.advance(Duration::from_secs(1));
/// // The bucket has filled up to its capacity of five tokens:
/// assert!(limiter.reserve_n(nonzero!(5u32)).is_immediate());
/// // And is empty now:
/// assert_eq!(limiter.reserve_n(nonzero!(2u32)).wait(), Duration::from_millis(20));
/// ```
#[derive(Debug)]
pub struct TokenBucketLimiter<C: Clock = clock::DefaultClock> {
    state: AtomicState<BucketState>,
    bucket: Bucket,
    quota: Quota,
    clock: C,
    start: C::Instant,
}

impl TokenBucketLimiter<clock::DefaultClock> {
    /// Constructs a token bucket holding up to `capacity` tokens, which refill at the
    /// quota's rate, with the default real-time clock.
    pub fn new(quota: Quota, capacity: NonZeroU32) -> Self {
        Self::with_clock(quota, capacity, clock::DefaultClock::default())
    }
}

impl<C: Clock> TokenBucketLimiter<C> {
    /// Constructs a token bucket holding up to `capacity` tokens with a custom clock.
    pub fn with_clock(quota: Quota, capacity: NonZeroU32, clock: C) -> Self {
        let bucket = Bucket::new(quota, capacity);
        let start = clock.now();
        debug!(
            interval = ?bucket.interval(),
            capacity = capacity.get(),
            native_atomics = AtomicState::<BucketState>::is_lock_free(),
            "constructed token bucket limiter"
        );
        TokenBucketLimiter {
            state: AtomicState::default(),
            bucket,
            quota,
            clock,
            start,
        }
    }

    /// Takes `n` tokens out of the bucket without waiting for them.
    ///
    /// The tokens count as taken whether or not the caller ever waits for the reservation.
    pub fn reserve_n(&self, n: NonZeroU32) -> Reservation<C::Instant> {
        let mut attempts: u32 = 0;
        let (wait, scheduled) = self.state.measure_and_replace(|previous| {
            attempts += 1;
            let now = self.clock.now().duration_since(self.start);
            let transition = self.bucket.transition(previous, now, n.get());
            let scheduled = if transition.wait.is_zero() {
                now
            } else {
                transition.next.last
            };
            ((transition.wait, scheduled), transition.next)
        });
        trace!(tokens = n.get(), ?wait, ?scheduled, attempts, "committed bucket state");
        Reservation::new(wait.into(), self.start + scheduled)
    }

    /// Takes a single token out of the bucket without waiting for it.
    pub fn reserve(&self) -> Reservation<C::Instant> {
        self.reserve_n(NonZeroU32::MIN)
    }

    /// Blocks until `n` tokens are available and takes them, returning the time they were
    /// scheduled at.
    pub fn take_n(&self, n: NonZeroU32) -> C::Instant {
        let reservation = self.reserve_n(n);
        self.wait_for(reservation)
    }

    /// Sleeps on the limiter's clock until the reserved tokens have dripped in, and returns
    /// their time.
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

    /// The time it takes one token to drip in.
    pub fn interval(&self) -> Duration {
        self.bucket.interval()
    }

    /// The most tokens the bucket holds.
    pub fn capacity(&self) -> NonZeroU32 {
        self.bucket.capacity()
    }
}

impl<C: Clock> Limiter for TokenBucketLimiter<C> {
    type Instant = C::Instant;

    fn take(&self) -> C::Instant {
        self.take_n(NonZeroU32::MIN)
    }
}
