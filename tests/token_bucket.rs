use all_asserts::assert_ge;
use nonzero_ext::nonzero;
use pacer::{
    clock::{Clock, FakeRelativeClock, Reference},
    nanos::Nanos,
    Limiter, Quota, TokenBucketLimiter,
};
use std::num::NonZeroU32;
use std::time::Duration;

fn hundred_per_second(
    capacity: NonZeroU32,
    clock: &FakeRelativeClock,
) -> TokenBucketLimiter<FakeRelativeClock> {
    TokenBucketLimiter::with_clock(
        Quota::per_second(nonzero!(100u32)),
        capacity,
        clock.clone(),
    )
}

fn gap(later: Nanos, earlier: Nanos) -> Duration {
    later.duration_since(earlier).into()
}

#[test]
fn first_take_is_immediate() {
    let clock = FakeRelativeClock::default();
    let lim = hundred_per_second(nonzero!(10u32), &clock);
    clock.advance(Duration::from_secs(3));
    assert_eq!(lim.take_n(nonzero!(4u32)), clock.now());
    assert_eq!(clock.now(), Nanos::from(Duration::from_secs(3)));
}

#[test]
fn sequential_takes_are_spaced_one_interval_apart() {
    let clock = FakeRelativeClock::default();
    let lim = hundred_per_second(nonzero!(10u32), &clock);
    let ms = Duration::from_millis(1);

    let stamps: Vec<Nanos> = (0..10).map(|_| lim.take()).collect();
    for pair in stamps.windows(2) {
        assert_eq!(gap(pair[1], pair[0]), ms * 10, "{:?}", stamps);
    }
    assert_eq!(clock.now(), Nanos::from(ms * 90));
}

#[test]
fn idle_time_refills_the_bucket() {
    let clock = FakeRelativeClock::default();
    let lim = hundred_per_second(nonzero!(10u32), &clock);
    let ms = Duration::from_millis(1);

    lim.take();
    // Four tokens drip in over 45ms; the 5ms towards the fifth are not lost.
    clock.advance(ms * 45);
    let idle_until = clock.now();
    assert_eq!(lim.take_n(nonzero!(3u32)), idle_until);
    assert_eq!(lim.take(), idle_until);
    assert_eq!(clock.now(), idle_until);

    assert_eq!(lim.take(), idle_until + ms * 5);
    assert_eq!(lim.take(), idle_until + ms * 15);
}

#[test]
fn refill_is_capped_at_capacity() {
    let clock = FakeRelativeClock::default();
    let lim = hundred_per_second(nonzero!(10u32), &clock);
    let ms = Duration::from_millis(1);

    lim.take();
    clock.advance(Duration::from_secs(60));
    let idle_until = clock.now();

    for i in 0..10 {
        assert_eq!(lim.take(), idle_until, "burst request #{}", i);
    }
    assert_eq!(lim.take(), idle_until + ms * 10);
    assert_eq!(clock.now(), idle_until + ms * 10);
}

#[test]
fn missing_tokens_cost_one_interval_each() {
    let clock = FakeRelativeClock::default();
    let lim = hundred_per_second(nonzero!(10u32), &clock);
    let ms = Duration::from_millis(1);

    lim.take();
    for k in 1..=5u32 {
        let reservation = lim.reserve_n(NonZeroU32::new(k).unwrap());
        assert_eq!(reservation.wait(), ms * 10 * k, "taking {} tokens", k);
        lim.wait_for(reservation);
    }
}

#[test]
fn requests_beyond_capacity_wait_for_the_difference() {
    let clock = FakeRelativeClock::default();
    let lim = hundred_per_second(nonzero!(4u32), &clock);
    let ms = Duration::from_millis(1);

    lim.take();
    clock.advance(Duration::from_secs(1));
    let idle_until = clock.now();
    assert_eq!(lim.take_n(nonzero!(7u32)), idle_until + ms * 30);
    assert_eq!(clock.now(), idle_until + ms * 30);
}

#[test]
fn concurrent_reservations_are_all_committed() {
    let clock = FakeRelativeClock::default();
    let lim = hundred_per_second(nonzero!(10u32), &clock);
    let ms = Duration::from_millis(1);
    lim.take();
    let threads = 20;

    let mut stamps: Vec<Nanos> = crossbeam::scope(|scope| {
        let handles: Vec<_> = (0..threads)
            .map(|_| scope.spawn(|_| lim.reserve_n(nonzero!(2u32)).scheduled_at()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
    .unwrap();
    stamps.sort();

    // Every request queued behind the others for two fresh tokens:
    let expected: Vec<Nanos> = (1..=threads)
        .map(|i| Nanos::from(ms * 20 * i))
        .collect();
    assert_eq!(stamps, expected);
    assert_eq!(clock.now(), Nanos::ZERO);
}

#[test]
fn concurrent_takes_never_outpace_the_refill() {
    let clock = FakeRelativeClock::default();
    let lim = hundred_per_second(nonzero!(10u32), &clock);
    lim.take();
    let interval = Duration::from_millis(10);

    let mut stamps: Vec<Nanos> = crossbeam::scope(|scope| {
        let handles: Vec<_> = (0..16).map(|_| scope.spawn(|_| lim.take())).collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
    .unwrap();
    stamps.sort();

    // The bucket started out empty, so the j-th token can't have dripped in before j intervals.
    for (j, stamp) in stamps.iter().enumerate() {
        assert_ge!(gap(*stamp, Nanos::ZERO), interval * (j as u32 + 1));
    }
}
