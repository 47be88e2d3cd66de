//! The leaky-bucket pacing arithmetic shared by every limiter.
//!
//! A limiter remembers two things: when it last scheduled a request, and how far that schedule
//! is behind (or ahead of) the ideal pace. Each request computes a fresh [`PacingState`] from
//! the previous one and the current time; the limiters only differ in how they commit it.

use std::cmp;
use std::time::Duration;

use crate::nanos::Nanos;
use crate::state;
use crate::Quota;

/// The committed pacing state of a limiter.
///
/// Values of this type are never mutated in place: every request derives a new state from the
/// previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PacingState {
    /// The (virtual) offset from the limiter's start at which the most recent request was
    /// scheduled. This is "now" as observed by that request, pushed later by any wait it was
    /// told to perform.
    pub(crate) last: Nanos,

    /// Signed nanoseconds of pacing debt. Committed states only ever hold a value in
    /// `[max_slack, 0]`: positive debt is always paid off by waiting before it is stored.
    pub(crate) debt: i64,
}

impl state::Packed for PacingState {
    fn into_halves(self) -> (Nanos, i64) {
        (self.last, self.debt)
    }

    fn from_halves(last: Nanos, debt: i64) -> Self {
        PacingState { last, debt }
    }
}

/// The outcome of pacing one request: the state to commit, and how long the request must wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Transition<S = PacingState> {
    pub(crate) next: S,
    pub(crate) wait: Nanos,
}

/// The constants a limiter derives from its [`Quota`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Pacing {
    /// The ideal spacing between two requests.
    interval: i64,

    /// The lower bound on debt (i.e., the most credit that can be banked). Never positive.
    max_slack: i64,
}

impl Pacing {
    pub(crate) fn new(quota: Quota) -> Self {
        let interval = cmp::min(quota.interval().as_nanos(), i64::MAX as u128) as i64;
        let max_slack = interval.saturating_mul(i64::from(quota.slack)).saturating_neg();
        Pacing {
            interval,
            max_slack,
        }
    }

    pub(crate) fn interval(&self) -> Duration {
        Duration::from_nanos(self.interval as u64)
    }

    pub(crate) fn max_slack(&self) -> Duration {
        Duration::from_nanos(self.max_slack.unsigned_abs())
    }

    /// Paces a request arriving at `now`, given the previously committed state.
    ///
    /// The first request ever (no previous state) seeds the schedule and never waits. Every
    /// other request accrues one interval of debt and pays off however much time has passed
    /// since the last scheduled request; debt is floored at `max_slack`, and any positive
    /// remainder becomes the request's wait.
    pub(crate) fn transition(&self, previous: Option<PacingState>, now: Nanos) -> Transition {
        let previous = match previous {
            None => {
                return Transition {
                    next: PacingState { last: now, debt: 0 },
                    wait: Nanos::ZERO,
                }
            }
            Some(previous) => previous,
        };

        // Negative when a racing request already scheduled itself after our "now".
        let elapsed = now.signed_since(previous.last);
        let debt = previous
            .debt
            .saturating_add(self.interval.saturating_sub(elapsed));
        let debt = cmp::max(debt, self.max_slack);

        if debt > 0 {
            let wait = Nanos::new(debt as u64);
            Transition {
                next: PacingState {
                    last: now + wait,
                    debt: 0,
                },
                wait,
            }
        } else {
            Transition {
                next: PacingState { last: now, debt },
                wait: Nanos::ZERO,
            }
        }
    }
}
