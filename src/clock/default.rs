cfg_if::cfg_if! {
    if #[cfg(feature = "quanta")] {
        /// The default clock using [`quanta`] for extremely fast timekeeping (at a 1ns resolution).
        pub type DefaultClock = crate::clock::QuantaClock;
    } else {
        /// The default clock that reports [`Instant`][std::time::Instant]s.
        pub type DefaultClock = crate::clock::MonotonicClock;
    }
}
