use crate::clock::{Clock, Reference};
use crate::nanos::Nanos;
use std::ops::Add;

/// A clock using the default [`quanta::Clock`] structure.
///
/// This clock uses [`quanta::Clock.raw`], which reads the time stamp
/// counter synchronously and scales it to nanoseconds. Sleeping on this
/// clock parks the thread with [`std::thread::sleep`].
#[derive(Debug, Clone, Default)]
pub struct QuantaClock {
    clock: quanta::Clock,
}

impl Clock for QuantaClock {
    type Instant = QuantaInstant;

    fn now(&self) -> Self::Instant {
        let nowish = self.clock.raw();
        QuantaInstant(Nanos::new(self.clock.delta_as_nanos(0, nowish)))
    }
}

/// A nanosecond-scale opaque instant (already scaled to reference time) returned from a
/// [`QuantaClock`].
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct QuantaInstant(Nanos);

impl Add<Nanos> for QuantaInstant {
    type Output = QuantaInstant;

    fn add(self, other: Nanos) -> QuantaInstant {
        QuantaInstant(self.0 + other)
    }
}

impl Reference for QuantaInstant {
    fn duration_since(&self, earlier: Self) -> Nanos {
        self.0.duration_since(earlier.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::time::Duration;

    #[test]
    fn quanta_impls_coverage() {
        let one_ns = Nanos::new(1);
        let c = QuantaClock::default();
        let now = c.now();
        assert_ne!(now + one_ns, now);
        assert_eq!(one_ns, Reference::duration_since(&(now + one_ns), now));
        assert_eq!(Nanos::ZERO, Reference::duration_since(&now, now + one_ns));
    }

    #[test]
    fn quanta_clock_moves_forward() {
        let c = QuantaClock::default();
        let before = c.now();
        c.sleep(Duration::from_millis(2));
        assert!(c.now() > before);
    }
}
