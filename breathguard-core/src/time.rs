//! Time management for the control loop
//!
//! All timing in the monitor derives from one monotonic millisecond clock,
//! read once per cycle and quantized to whole seconds. The quantization is an
//! accepted ±1 s of jitter in breathing rate and alarm timing.
//!
//! Clock sources:
//! - `MonotonicTime`: `std::time::Instant`, ms since creation (requires std)
//! - `MockTimeSource`: set and advanced by hand, for tests and simulations
//!
//! Counter wraparound is not handled; a `u64` of milliseconds outlives the device.

use core::cell::Cell;

use crate::constants::time::MS_PER_SECOND;

/// Monotonic timestamp in milliseconds since device boot
pub type Timestamp = u64;

/// Whole seconds since device boot
pub type Seconds = u64;

/// Source of monotonic time
pub trait TimeSource {
    /// Get current timestamp in milliseconds
    fn now(&self) -> Timestamp;

    /// Current time quantized to whole seconds
    fn now_secs(&self) -> Seconds {
        to_seconds(self.now())
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

/// Truncate a millisecond timestamp to whole seconds
pub const fn to_seconds(timestamp: Timestamp) -> Seconds {
    timestamp / MS_PER_SECOND
}

/// Elapsed whole seconds between two quantized times
///
/// Saturates at zero instead of underflowing if `later` is before `earlier`.
pub const fn elapsed_secs(earlier: Seconds, later: Seconds) -> Seconds {
    later.saturating_sub(earlier)
}

/// Monotonic time source backed by `std::time::Instant`
///
/// Starts at 0 when created, always increases
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct MonotonicTime {
    start: std::time::Instant,
}

#[cfg(feature = "std")]
impl MonotonicTime {
    /// Start a new clock at zero
    pub fn new() -> Self {
        Self { start: std::time::Instant::now() }
    }
}

#[cfg(feature = "std")]
impl Default for MonotonicTime {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl TimeSource for MonotonicTime {
    fn now(&self) -> Timestamp {
        self.start.elapsed().as_millis() as Timestamp
    }
}

/// Hand-driven time source for testing and simulation
///
/// Interior mutability lets a test keep advancing the clock while the
/// monitor holds a shared reference to it.
#[derive(Debug, Default)]
pub struct MockTimeSource {
    timestamp: Cell<Timestamp>,
}

impl MockTimeSource {
    /// Create a clock reading `timestamp`
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp: Cell::new(timestamp) }
    }

    /// Jump to an absolute timestamp
    pub fn set(&self, timestamp: Timestamp) {
        self.timestamp.set(timestamp);
    }

    /// Move the clock forward
    pub fn advance(&self, ms: u64) {
        self.timestamp.set(self.timestamp.get().saturating_add(ms));
    }

    /// Move the clock forward by whole seconds
    pub fn advance_secs(&self, secs: Seconds) {
        self.advance(secs.saturating_mul(MS_PER_SECOND));
    }
}

impl TimeSource for MockTimeSource {
    fn now(&self) -> Timestamp {
        self.timestamp.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_time_advances() {
        let time = MockTimeSource::new(1000);
        assert_eq!(time.now(), 1000);

        time.advance(500);
        assert_eq!(time.now(), 1500);
        assert_eq!(time.now_secs(), 1);

        time.advance_secs(2);
        assert_eq!(time.now_secs(), 3);
    }

    #[test]
    fn quantization_truncates() {
        assert_eq!(to_seconds(0), 0);
        assert_eq!(to_seconds(999), 0);
        assert_eq!(to_seconds(1000), 1);
        assert_eq!(to_seconds(61_999), 61);
    }

    #[test]
    fn elapsed_saturates() {
        assert_eq!(elapsed_secs(10, 14), 4);
        assert_eq!(elapsed_secs(14, 10), 0);
    }

    #[test]
    fn shared_reference_is_a_source() {
        let time = MockTimeSource::new(2500);
        let by_ref: &MockTimeSource = &time;
        assert_eq!(TimeSource::now_secs(&by_ref), 2);
    }

    #[cfg(feature = "std")]
    #[test]
    fn monotonic_never_goes_back() {
        let clock = MonotonicTime::new();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
