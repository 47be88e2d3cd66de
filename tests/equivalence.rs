use nonzero_ext::nonzero;
use pacer::{
    clock::{FakeRelativeClock, Reference},
    nanos::Nanos,
    Limiter, LockBasedLimiter, LockFreeLimiter, Quota,
};
use proptest::prelude::*;
use std::time::Duration;

/// Takes from `limiter` once after each idle gap, returning the handed out timestamps.
fn drive<L: Limiter<Instant = Nanos>>(
    limiter: &L,
    clock: &FakeRelativeClock,
    idle: &[Duration],
) -> Vec<Nanos> {
    idle.iter()
        .map(|gap| {
            clock.advance(*gap);
            limiter.take()
        })
        .collect()
}

fn both(quota: Quota, idle: &[Duration]) -> (Vec<Nanos>, Vec<Nanos>) {
    let clock = FakeRelativeClock::default();
    let lock_free = LockFreeLimiter::with_clock(quota, clock.clone());
    let a = drive(&lock_free, &clock, idle);

    let clock = FakeRelativeClock::default();
    let lock_based = LockBasedLimiter::with_clock(quota, clock.clone());
    let b = drive(&lock_based, &clock, idle);
    (a, b)
}

#[test]
fn saturated_callers_converge_on_the_rate() {
    let quota = Quota::per_second(nonzero!(50u32));
    let idle = vec![Duration::ZERO; 500];
    let (lock_free, lock_based) = both(quota, &idle);
    assert_eq!(lock_free, lock_based);

    let span: Duration = lock_free[lock_free.len() - 1]
        .duration_since(lock_free[0])
        .into();
    assert_eq!(span / 499, quota.interval());
}

proptest! {
    #[test]
    fn identical_arrivals_get_identical_schedules(
        slack in 0u32..20,
        idle_ms in prop::collection::vec(0u64..40, 1..300),
    ) {
        let quota = Quota::per_second(nonzero!(100u32)).allow_slack(slack);
        let idle: Vec<Duration> = idle_ms.iter().map(|ms| Duration::from_millis(*ms)).collect();
        let (lock_free, lock_based) = both(quota, &idle);
        prop_assert_eq!(lock_free, lock_based);
    }

    #[test]
    fn no_window_admits_more_than_rate_plus_slack(
        slack in 0u32..20,
        idle_ms in prop::collection::vec(0u64..40, 1..150),
    ) {
        let quota = Quota::per_second(nonzero!(100u32)).allow_slack(slack);
        let interval = quota.interval();
        let idle: Vec<Duration> = idle_ms.iter().map(|ms| Duration::from_millis(*ms)).collect();
        let (stamps, _) = both(quota, &idle);

        for i in 0..stamps.len() {
            for j in (i + 1)..stamps.len() {
                let span: Duration = stamps[j].duration_since(stamps[i]).into();
                let paced = (j - i) as u32;
                let allowed = interval * paced.saturating_sub(slack);
                prop_assert!(
                    span >= allowed,
                    "requests {} and {} only {:?} apart, expected at least {:?}",
                    i, j, span, allowed
                );
            }
        }
    }
}
