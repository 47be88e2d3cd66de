use std::fmt;

/// Error indicating that a [`Quota`][crate::Quota] can not pace requests.
///
/// This is the only error a limiter can produce, and it is produced when the
/// quota is constructed: once a limiter exists, taking from it always
/// succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidQuota {
    /// The number of requests per period is zero.
    ZeroRate,

    /// The period is zero.
    ZeroPeriod,

    /// The period is longer than the pacing arithmetic can represent
    /// (about 292 years).
    PeriodTooLong,

    /// The period is so short relative to the rate that a single request
    /// would take less than a nanosecond.
    IntervalTooShort,
}

impl fmt::Display for InvalidQuota {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidQuota::ZeroRate => write!(f, "rate must be at least one request per period"),
            InvalidQuota::ZeroPeriod => write!(f, "period must be longer than zero"),
            InvalidQuota::PeriodTooLong => {
                write!(f, "period exceeds the representable range of {} ns", i64::MAX)
            }
            InvalidQuota::IntervalTooShort => {
                write!(f, "period divided by rate is shorter than one nanosecond")
            }
        }
    }
}

impl std::error::Error for InvalidQuota {}
