//! # pacer - rate limiters that pace their callers
//!
//! Rather than rejecting requests that exceed a rate, the limiters in this crate make callers
//! *wait*: [`take`](Limiter::take) blocks until it is the caller's turn, spacing requests
//! evenly at the rate given by a [`Quota`]. A configurable amount of slack lets a limited
//! burst through right after an idle spell.
//!
//! Two interchangeable limiters share the same pacing arithmetic:
//!
//! * [`LockFreeLimiter`] keeps its state in a single atomic cell and updates it with a
//!   compare-and-swap loop; callers sleep after their slot has been committed.
//! * [`LockBasedLimiter`] keeps its state behind a mutex that callers hold while they sleep,
//!   serving them strictly one at a time.
//!
//! [`TokenBucketLimiter`] is a lock-free alternative for callers that need several permits at
//! once: it hands out tokens that collect, up to a fixed capacity, while nobody takes them.
//!
//! ## Quick example
//!
//! ```rust
//! # use nonzero_ext::*;
//! use pacer::{Limiter, LockFreeLimiter, Quota};
//! use std::time::{Duration, Instant};
//!
//! let limiter = LockFreeLimiter::new(Quota::per_second(nonzero!(200u32)).without_slack());
//! let started = Instant::now();
//! for _ in 0..5 {
//!     limiter.take();
//! }
//! // The first call goes through at once, the four others are spaced 5ms apart:
//! assert!(started.elapsed() >= Duration::from_millis(15));
//! ```
//!
//! For a more in-depth explanation of how to use the limiters, see the [guide](_guide/index.html).

pub mod r#_guide;
mod bucket;
pub mod clock;
mod errors;
mod limiter;
pub mod nanos;
mod pacing;
mod quota;
mod state;

pub use errors::*;
pub use limiter::*;
pub use quota::{Quota, DEFAULT_SLACK};
