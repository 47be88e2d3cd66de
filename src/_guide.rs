//! # A more in-depth guide to `pacer`
//!
//! # Constructing a limiter
//!
//! #### Quotas
//!
//! Each limiter has a quota: a number of requests (API calls, emails,
//! database writes... anything really) per period of time, plus some
//! slack. Specify these in a [`Quota`][crate::Quota] object like so:
//!
//! ```rust
//! # use nonzero_ext::*;
//! use pacer::Quota;
//! Quota::per_second(nonzero!(20u32));
//! ```
//!
//! The `per_*` constructors take a [`NonZeroU32`][std::num::NonZeroU32]
//! (use the [`nonzero!`](../../nonzero_ext/macro.nonzero.html) macro to
//! construct one conveniently) and can not fail. If the rate and period
//! are only known at runtime, use [`Quota::new`][crate::Quota::new],
//! which rejects a zero rate or period up front:
//!
//! ```rust
//! # use pacer::{InvalidQuota, Quota};
//! # use std::time::Duration;
//! assert_eq!(Quota::new(0, Duration::from_secs(1)), Err(InvalidQuota::ZeroRate));
//! let q = Quota::new(5, Duration::from_millis(250)).unwrap();
//! assert_eq!(q.interval(), Duration::from_millis(50));
//! ```
//!
//! #### Slack
//!
//! A quota paces requests one [`interval`][crate::Quota::interval]
//! apart. Without slack, a caller that shows up late can't make up for
//! it: the next caller is still spaced a full interval after it. With
//! slack (10 requests by default, adjustable with
//! [`allow_slack`][crate::Quota::allow_slack] and
//! [`without_slack`][crate::Quota::without_slack]), lateness is banked as
//! credit, so after a quiet spell a burst of callers can proceed
//! without waiting until the credit runs out.
//!
//! #### Choosing a limiter
//!
//! Both [`LockFreeLimiter`][crate::LockFreeLimiter] and
//! [`LockBasedLimiter`][crate::LockBasedLimiter] implement
//! [`Limiter`][crate::Limiter] and pace identically when callers arrive
//! one at a time. Under contention, the lock-free limiter schedules
//! every caller right away and lets them sleep concurrently; the
//! lock-based one makes each caller wait for the previous caller's sleep
//! to finish before it is even scheduled.
//!
//! ```rust
//! # use nonzero_ext::*;
//! use pacer::{Limiter, LockBasedLimiter, Quota};
//! let limiter = LockBasedLimiter::new(Quota::per_second(nonzero!(500u32)));
//! limiter.take();
//! ```
//!
//! When callers need more than one permit at a time (say, a batch of
//! writes that should count individually), use a
//! [`TokenBucketLimiter`][crate::TokenBucketLimiter]. It refills one
//! token per interval into a bucket of fixed capacity
//! ([`DEFAULT_CAPACITY`][crate::DEFAULT_CAPACITY] holds 10), and
//! [`take_n`][crate::TokenBucketLimiter::take_n] waits until enough
//! tokens have dripped in:
//!
//! ```rust
//! # use nonzero_ext::*;
//! use pacer::{Limiter, Quota, TokenBucketLimiter, DEFAULT_CAPACITY};
//! let limiter = TokenBucketLimiter::new(Quota::per_second(nonzero!(1000u32)), DEFAULT_CAPACITY);
//! limiter.take_n(nonzero!(3u32));
//! limiter.take();
//! ```
//!
//! #### Clocks
//!
//! Limiters read time from, and sleep on, a [`Clock`][crate::clock::Clock].
//! The default clock uses `quanta` (or [`Instant`][std::time::Instant]
//! without the `quanta` feature). For tests, the
//! [`FakeRelativeClock`][crate::clock::FakeRelativeClock] only moves
//! when advanced by hand or when a limiter sleeps on it, which makes
//! pacing fully deterministic:
//!
//! ```rust
//! # use nonzero_ext::*;
//! # use pacer::{clock::FakeRelativeClock, nanos::Nanos, Limiter, LockFreeLimiter, Quota};
//! # use std::time::Duration;
//! let clock = FakeRelativeClock::default();
//! let limiter =
//!     LockFreeLimiter::with_clock(Quota::per_second(nonzero!(4u32)).without_slack(), clock);
//! assert_eq!(limiter.take(), Nanos::ZERO);
//! assert_eq!(limiter.take(), Nanos::from(Duration::from_millis(250)));
//! assert_eq!(limiter.take(), Nanos::from(Duration::from_millis(500)));
//! ```
//!
//! #### Reserving instead of taking
//!
//! `reserve` commits the caller's slot without sleeping and reports how
//! long the caller should wait; `wait_for` performs that wait later. A
//! `take` on the lock-free limiter is exactly a `reserve` followed by a
//! `wait_for`.
//!
//! # Usage in multiple threads
//!
//! Limiters are `Send` and `Sync`, and can't be cloned: share them by
//! reference. To use a limiter in multiple threads without lifetime
//! issues, there are two equally valid strategies:
//!
//! #### `crossbeam` scoped tasks
//!
//! The `crossbeam` crate's
//! [scopes](https://docs.rs/crossbeam/0.8/crossbeam/thread/struct.Scope.html#method.spawn)
//! allow code to guarantee that a thread spawned in a scope
//! terminates before the scope terminates. This allows using
//! stack-allocated variables:
//!
//! ```rust
//! # use crossbeam;
//! # use nonzero_ext::*;
//! # use pacer::{Limiter, LockFreeLimiter, Quota};
//! let lim = LockFreeLimiter::new(Quota::per_second(nonzero!(1000u32)));
//!
//! crossbeam::scope(|scope| {
//!     for _i in 0..20 {
//!         scope.spawn(|_| {
//!             lim.take();
//!         });
//!     }
//! })
//! .unwrap();
//! ```
//!
//! #### Wrapping the limiter in an [`Arc`][std::sync::Arc]
//!
//! The other method uses only the standard library: Wrapping the
//! limiter in an [`Arc`][std::sync::Arc] keeps it alive for as long as
//! there exist references to it - perfect for passing to threads. The
//! thing that actually gets cloned is the `Arc`; the limiter and its
//! schedule stay shared.
//!
//! ```rust
//! # use nonzero_ext::*;
//! # use pacer::{Limiter, LockBasedLimiter, Quota};
//! # use std::sync::Arc;
//! # use std::thread;
//! let limiter = Arc::new(LockBasedLimiter::new(Quota::per_second(nonzero!(1000u32))));
//! let handles: Vec<_> = (0..4)
//!     .map(|_| {
//!         let limiter = limiter.clone();
//!         thread::spawn(move || limiter.take())
//!     })
//!     .collect();
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! ```
