use std::num::NonZeroU32;
use std::time::Duration;

use crate::errors::InvalidQuota;

/// The number of requests' worth of burst credit a quota allows unless told otherwise.
pub const DEFAULT_SLACK: u32 = 10;

/// A pacing quota.
///
/// Quotas are expressed as a positive number of requests (the "rate") that may pass in a
/// given positive period of time, plus a number of requests' worth of "slack": credit that
/// idle time can bank, and that a burst of requests following the idle time may spend without
/// waiting.
///
/// Limiters spread requests evenly over the period: a quota of 100 requests per second lets
/// one request through every 10ms. That spacing is the quota's [`interval`](Quota::interval).
///
/// # Slack
/// Without slack, a caller that arrives late does not make the next caller any earlier: every
/// request is spaced at least one interval from the one before it. With a slack of `n`,
/// up to `n` intervals of lateness are remembered as credit, so that after an idle spell up to
/// `n` additional requests can proceed immediately before pacing resumes.
///
/// # Examples
///
/// Construct a quota that allows 50 requests per second (one every 20 milliseconds), with
/// the default slack of 10 requests:
/// ```rust
/// # use pacer::Quota;
/// # use nonzero_ext::nonzero;
/// # use std::time::Duration;
/// let q = Quota::per_second(nonzero!(50u32));
/// assert_eq!(q.interval(), Duration::from_millis(20));
/// assert_eq!(q.slack(), 10);
/// assert_eq!(q, Quota::new(50, Duration::from_secs(1)).unwrap());
/// ```
///
/// Construct a quota that allows 2 requests per hour (one every 30 minutes) and strictly
/// forbids bursting:
/// ```rust
/// # use pacer::Quota;
/// # use nonzero_ext::nonzero;
/// # use std::time::Duration;
/// let q = Quota::per_hour(nonzero!(2u32)).without_slack();
/// assert_eq!(q.interval(), Duration::from_secs(30 * 60));
/// assert_eq!(q.slack(), 0);
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Quota {
    pub(crate) rate: NonZeroU32,
    pub(crate) period: Duration,
    pub(crate) slack: u32,
}

/// Constructors for Quotas
impl Quota {
    /// Construct a quota for a number of requests per second.
    pub const fn per_second(rate: NonZeroU32) -> Quota {
        Quota {
            rate,
            period: Duration::from_secs(1),
            slack: DEFAULT_SLACK,
        }
    }

    /// Construct a quota for a number of requests per 60-second period.
    pub const fn per_minute(rate: NonZeroU32) -> Quota {
        Quota {
            rate,
            period: Duration::from_secs(60),
            slack: DEFAULT_SLACK,
        }
    }

    /// Construct a quota for a number of requests per 60-minute (3600-second) period.
    pub const fn per_hour(rate: NonZeroU32) -> Quota {
        Quota {
            rate,
            period: Duration::from_secs(60 * 60),
            slack: DEFAULT_SLACK,
        }
    }

    /// Construct a quota for `rate` requests in an arbitrary `period`, with the default slack.
    ///
    /// Returns an error if either value is zero, if the period is too long to be represented in
    /// signed 64-bit nanoseconds, or if a single request would have to take less than a
    /// nanosecond.
    pub fn new(rate: u32, period: Duration) -> Result<Quota, InvalidQuota> {
        let rate = NonZeroU32::new(rate).ok_or(InvalidQuota::ZeroRate)?;
        if period.is_zero() {
            return Err(InvalidQuota::ZeroPeriod);
        }
        if period.as_nanos() > i64::MAX as u128 {
            return Err(InvalidQuota::PeriodTooLong);
        }
        if period.as_nanos() < u128::from(rate.get()) {
            return Err(InvalidQuota::IntervalTooShort);
        }
        Ok(Quota {
            rate,
            period,
            slack: DEFAULT_SLACK,
        })
    }

    /// Adjusts the slack of a quota: after idling, up to `slack` requests beyond the
    /// ordinary pace may proceed without waiting.
    pub const fn allow_slack(self, slack: u32) -> Quota {
        Quota { slack, ..self }
    }

    /// Disables bursting entirely: every request is spaced at least one interval apart.
    pub const fn without_slack(self) -> Quota {
        self.allow_slack(0)
    }
}

/// Retrieving information about a quota
impl Quota {
    /// The number of requests allowed per period.
    pub const fn rate(&self) -> NonZeroU32 {
        self.rate
    }

    /// The period over which [`rate`](Quota::rate) requests are allowed.
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// The number of requests' worth of burst credit that idle time can bank.
    pub const fn slack(&self) -> u32 {
        self.slack
    }

    /// The ideal spacing between two requests: the period divided by the rate.
    ///
    /// Quotas built by the `per_*` constructors with more than a billion requests per second
    /// are paced at one request per nanosecond.
    pub const fn interval(&self) -> Duration {
        let interval_ns = self.period.as_nanos() / (self.rate.get() as u128);
        if interval_ns == 0 {
            Duration::from_nanos(1)
        } else {
            Duration::from_nanos(interval_ns as u64)
        }
    }

    /// The most burst credit a limiter on this quota can bank: `slack` intervals.
    pub fn max_slack(&self) -> Duration {
        self.interval().saturating_mul(self.slack)
    }
}
