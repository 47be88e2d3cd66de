//! The token-bucket arithmetic behind [`TokenBucketLimiter`](crate::TokenBucketLimiter).
//!
//! Tokens drip into the bucket one per interval, up to its capacity. A request for `n` tokens
//! takes them out; if the bucket holds fewer, the request waits until the missing tokens have
//! dripped in, and the bucket is left empty at that point in time.

use std::cmp;
use std::num::NonZeroU32;
use std::time::Duration;

use crate::nanos::Nanos;
use crate::pacing::Transition;
use crate::state;
use crate::Quota;

/// The committed state of a token bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BucketState {
    /// The offset from the limiter's start up to which the bucket has been refilled. Partial
    /// intervals since then still count towards the next token. Lies in the future while
    /// requests are queued for tokens that have not dripped in yet.
    pub(crate) last: Nanos,

    /// Tokens in the bucket as of `last`. Committed states hold a value in `[0, capacity]`.
    pub(crate) tokens: i64,
}

impl state::Packed for BucketState {
    fn into_halves(self) -> (Nanos, i64) {
        (self.last, self.tokens)
    }

    fn from_halves(last: Nanos, tokens: i64) -> Self {
        BucketState { last, tokens }
    }
}

/// The constants a token bucket derives from its [`Quota`] and capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Bucket {
    /// The time it takes one token to drip in.
    interval: i64,

    /// The most tokens the bucket holds.
    capacity: NonZeroU32,
}

impl Bucket {
    pub(crate) fn new(quota: Quota, capacity: NonZeroU32) -> Self {
        Bucket {
            interval: cmp::min(quota.interval().as_nanos(), i64::MAX as u128) as i64,
            capacity,
        }
    }

    pub(crate) fn interval(&self) -> Duration {
        Duration::from_nanos(self.interval as u64)
    }

    pub(crate) fn capacity(&self) -> NonZeroU32 {
        self.capacity
    }

    /// Takes `n` tokens out of the bucket at `now`, given the previously committed state.
    ///
    /// The first request ever seeds an empty bucket and never waits, however many tokens it
    /// asks for.
    pub(crate) fn transition(
        &self,
        previous: Option<BucketState>,
        now: Nanos,
        n: u32,
    ) -> Transition<BucketState> {
        let previous = match previous {
            None => {
                return Transition {
                    next: BucketState {
                        last: now,
                        tokens: 0,
                    },
                    wait: Nanos::ZERO,
                }
            }
            Some(previous) => previous,
        };

        let elapsed = now.signed_since(previous.last);
        let (anchor, tokens) = if elapsed < 0 {
            // Queued requests own every token up to `last`; nothing new has dripped in.
            (previous.last, previous.tokens)
        } else {
            let refill = elapsed / self.interval;
            let tokens = previous.tokens.saturating_add(refill);
            let capacity = i64::from(self.capacity.get());
            if tokens >= capacity {
                (now, capacity)
            } else {
                let partial = elapsed % self.interval;
                (Nanos::new(now.as_u64() - partial as u64), tokens)
            }
        };

        let remaining = tokens - i64::from(n);
        if remaining >= 0 {
            return Transition {
                next: BucketState {
                    last: anchor,
                    tokens: remaining,
                },
                wait: Nanos::ZERO,
            };
        }

        let missing = remaining.unsigned_abs();
        let refilled_at = anchor + Nanos::new(missing.saturating_mul(self.interval as u64));
        Transition {
            next: BucketState {
                last: refilled_at,
                tokens: 0,
            },
            wait: Nanos::new(refilled_at.as_u64().saturating_sub(now.as_u64())),
        }
    }
}
