use std::time::Duration;

use crate::clock::{self, Clock};
use crate::limiter::{Limiter, Reservation};

/// A limiter that lets every caller through immediately.
///
/// Useful wherever a [`Limiter`] is expected but pacing should be switched off.
#[derive(Debug, Clone, Default)]
pub struct Unlimited<C: Clock = clock::DefaultClock> {
    clock: C,
}

impl Unlimited<clock::DefaultClock> {
    /// Constructs an unlimited limiter reporting times from the default real-time clock.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Clock> Unlimited<C> {
    /// Constructs an unlimited limiter reporting times from a custom clock.
    pub fn with_clock(clock: C) -> Self {
        Unlimited { clock }
    }

    /// Returns an immediate reservation for the current time.
    pub fn reserve(&self) -> Reservation<C::Instant> {
        Reservation::new(Duration::ZERO, self.clock.now())
    }

    /// Sleeps for the reservation's wait (which is zero for reservations made by this limiter)
    /// and returns its time.
    pub fn wait_for(&self, reservation: Reservation<C::Instant>) -> C::Instant {
        if !reservation.is_immediate() {
            self.clock.sleep(reservation.wait());
        }
        reservation.scheduled_at()
    }
}

impl<C: Clock> Limiter for Unlimited<C> {
    type Instant = C::Instant;

    fn take(&self) -> C::Instant {
        self.clock.now()
    }
}
