//! Sensor and delay abstractions
//!
//! The monitor never talks to hardware directly. A board crate implements
//! [`TemperatureSensor`] for its thermocouple/thermistor driver and [`Delay`]
//! for its timer, and the [`Sampler`](crate::sampler::Sampler) pulls readings
//! through them.
//!
//! Reads use `nb::Result`, so drivers that need a conversion cycle can return
//! `WouldBlock` instead of spinning internally:
//!
//! ```rust
//! use breathguard_core::sensor::TemperatureSensor;
//!
//! struct Thermistor { adc_ready: bool, raw: u16 }
//!
//! impl TemperatureSensor for Thermistor {
//!     type Error = ();
//!
//!     fn read_temperature(&mut self) -> nb::Result<f32, Self::Error> {
//!         if !self.adc_ready {
//!             return Err(nb::Error::WouldBlock);
//!         }
//!         Ok(self.raw as f32 * 0.0625)
//!     }
//! }
//! ```

use crate::config::TemperatureUnit;

/// Source of raw air-temperature readings
pub trait TemperatureSensor {
    /// Driver-level error
    type Error;

    /// Take one raw reading in [`native_unit`](Self::native_unit)
    ///
    /// Returns:
    /// - `Ok(value)` - Reading available
    /// - `Err(nb::Error::WouldBlock)` - Conversion still in progress
    /// - `Err(nb::Error::Other(e))` - Driver failure
    fn read_temperature(&mut self) -> nb::Result<f32, Self::Error>;

    /// Unit the driver reports in
    ///
    /// Most thermocouple amplifiers report Celsius.
    fn native_unit(&self) -> TemperatureUnit {
        TemperatureUnit::Celsius
    }

    /// Ambient or case temperature, when the device has a cold-junction sensor
    fn ambient_temperature(&mut self) -> Option<f32> {
        None
    }
}

/// Blocking millisecond delay
pub trait Delay {
    /// Pause for at least `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);
}

/// Delay that returns immediately, for tests and replaying recorded data
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl Delay for NoDelay {
    fn delay_ms(&mut self, _ms: u32) {}
}

/// Delay backed by `std::thread::sleep`
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

#[cfg(feature = "std")]
impl Delay for StdDelay {
    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(ms as u64));
    }
}
