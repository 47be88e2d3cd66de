//! The atomic cell that lock-free limiters keep their state in.

use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::Ordering;

use portable_atomic::AtomicU128;

use crate::nanos::Nanos;

/// Set on every packed value that holds a state; the all-zero value means "not seeded yet".
const SEEDED: u128 = 1 << 127;
const LAST_MASK: u64 = !(1 << 63);

/// A limiter state that fits in one 128-bit word: an offset from the limiter's start, plus a
/// signed 64-bit quantity (pacing debt, or available tokens).
pub(crate) trait Packed: Copy {
    fn into_halves(self) -> (Nanos, i64);
    fn from_halves(last: Nanos, value: i64) -> Self;
}

/// An in-memory representation of a limiter's state.
///
/// Implemented using [`AtomicU128`] operations: both halves of a state are packed into one
/// 128-bit word, so that they are always read and replaced together. The top bit marks the
/// word as seeded, the remainder of the upper half holds the offset of the last scheduled
/// request, and the lower half holds the signed value in two's complement.
///
/// On targets without a native 16-byte compare-and-swap, `portable-atomic` provides the cell
/// with a lock of its own; it never splits the state across two atomics.
pub(crate) struct AtomicState<S> {
    cell: AtomicU128,
    state: PhantomData<S>,
}

impl<S> Default for AtomicState<S> {
    fn default() -> Self {
        AtomicState {
            cell: AtomicU128::new(0),
            state: PhantomData,
        }
    }
}

fn pack<S: Packed>(state: Option<S>) -> u128 {
    match state.map(Packed::into_halves) {
        None => 0,
        Some((last, value)) => {
            debug_assert!(last.as_u64() <= LAST_MASK, "{:?} is too far out", last);
            SEEDED | u128::from(last.as_u64() & LAST_MASK) << 64 | u128::from(value as u64)
        }
    }
}

fn unpack<S: Packed>(raw: u128) -> Option<S> {
    if raw & SEEDED == 0 {
        return None;
    }
    Some(S::from_halves(
        Nanos::new((raw >> 64) as u64 & LAST_MASK),
        raw as u64 as i64,
    ))
}

impl<S: Packed> AtomicState<S> {
    /// Whether the cell is backed by native lock-free instructions on this target.
    pub(crate) fn is_lock_free() -> bool {
        AtomicU128::is_lock_free()
    }

    /// Reads the committed state.
    pub(crate) fn load(&self) -> Option<S> {
        unpack(self.cell.load(Ordering::Acquire))
    }

    /// Replaces the committed state with the one computed by `f` from it.
    ///
    /// `f` receives the state as it was observed and returns a result along with the state to
    /// commit. If another thread commits first, the observed state is stale: `f` runs again on
    /// the newer state, and only the result of the invocation whose state got committed is
    /// returned. `f` must therefore be free of side effects that should not be repeated.
    pub(crate) fn measure_and_replace<T, F>(&self, mut f: F) -> T
    where
        F: FnMut(Option<S>) -> (T, S),
    {
        let mut prev = self.cell.load(Ordering::Acquire);
        loop {
            let (result, next) = f(unpack(prev));
            match self.cell.compare_exchange_weak(
                prev,
                pack(Some(next)),
                Ordering::Release,
                Ordering::Relaxed,
            ) {
                Ok(_) => return result,
                Err(next_prev) => prev = next_prev,
            }
        }
    }
}

impl<S: Packed + fmt::Debug> fmt::Debug for AtomicState<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self.load() {
            None => write!(f, "AtomicState(unseeded)"),
            Some(state) => write!(f, "AtomicState({:?})", state),
        }
    }
}
