use all_asserts::assert_ge;
use nonzero_ext::nonzero;
use pacer::{
    clock::{Clock, FakeRelativeClock, Reference},
    nanos::Nanos,
    Limiter, LockBasedLimiter, Quota,
};
use std::time::Duration;

fn hundred_per_second(
    slack: u32,
    clock: &FakeRelativeClock,
) -> LockBasedLimiter<FakeRelativeClock> {
    LockBasedLimiter::with_clock(
        Quota::per_second(nonzero!(100u32)).allow_slack(slack),
        clock.clone(),
    )
}

fn gap(later: Nanos, earlier: Nanos) -> Duration {
    later.duration_since(earlier).into()
}

#[test]
fn first_take_is_immediate() {
    let clock = FakeRelativeClock::default();
    let lim = hundred_per_second(0, &clock);
    clock.advance(Duration::from_secs(7));
    assert_eq!(lim.take(), clock.now());
    assert_eq!(clock.now(), Nanos::from(Duration::from_secs(7)));
}

#[test]
fn sequential_takes_are_spaced_one_interval_apart() {
    let clock = FakeRelativeClock::default();
    let lim = hundred_per_second(0, &clock);
    let ms = Duration::from_millis(1);

    let stamps: Vec<Nanos> = (0..10).map(|_| lim.take()).collect();
    for pair in stamps.windows(2) {
        assert_eq!(gap(pair[1], pair[0]), ms * 10, "{:?}", stamps);
    }
    assert_eq!(clock.now(), Nanos::from(ms * 90));
}

#[test]
fn idle_time_allows_a_bounded_burst() {
    let clock = FakeRelativeClock::default();
    let lim = hundred_per_second(10, &clock);
    let ms = Duration::from_millis(1);

    lim.take();
    clock.advance(ms * 500);
    let idle_until = clock.now();

    for i in 0..11 {
        assert_eq!(lim.take(), idle_until, "burst request #{}", i);
    }
    assert_eq!(lim.take(), idle_until + ms * 10);
    assert_eq!(clock.now(), idle_until + ms * 10);
}

#[test]
fn idling_for_exactly_the_slack_allows_slack_requests() {
    let clock = FakeRelativeClock::default();
    let lim = hundred_per_second(10, &clock);
    let ms = Duration::from_millis(1);

    lim.take();
    // 100ms is ten intervals: one for the next request on schedule, nine banked.
    clock.advance(ms * 100);
    let idle_until = clock.now();
    for i in 0..10 {
        assert_eq!(lim.take(), idle_until, "burst request #{}", i);
    }
    assert_eq!(clock.now(), idle_until);

    assert_eq!(lim.take(), idle_until + ms * 10);
    assert_eq!(clock.now(), idle_until + ms * 10);
}

#[test]
fn concurrent_takes_are_served_one_after_another() {
    let clock = FakeRelativeClock::default();
    let lim = hundred_per_second(10, &clock);
    let ms = Duration::from_millis(1);
    let threads = 20;

    let mut stamps: Vec<Nanos> = crossbeam::scope(|scope| {
        let handles: Vec<_> = (0..threads).map(|_| scope.spawn(|_| lim.take())).collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
    .unwrap();
    stamps.sort();

    // Only the lock holder ever sleeps, so the fake clock moves one interval at a time:
    let expected: Vec<Nanos> = (0..threads).map(|i| Nanos::from(ms * 10 * i)).collect();
    assert_eq!(stamps, expected);
    assert_eq!(clock.now(), Nanos::from(ms * 10 * (threads - 1)));
}

#[test]
fn concurrent_reservations_are_all_committed() {
    let clock = FakeRelativeClock::default();
    let lim = hundred_per_second(0, &clock);
    let interval = Duration::from_millis(10);

    let mut stamps: Vec<Nanos> = crossbeam::scope(|scope| {
        let handles: Vec<_> = (0..16)
            .map(|_| scope.spawn(|_| lim.reserve().scheduled_at()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
    .unwrap();
    stamps.sort();

    assert_eq!(stamps.len(), 16);
    for pair in stamps.windows(2) {
        assert_ge!(gap(pair[1], pair[0]), interval);
    }
}
