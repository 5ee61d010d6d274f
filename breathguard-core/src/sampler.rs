//! Temperature sampler
//!
//! Reduces `N` raw readings to one averaged [`Measurement`] per cycle and
//! flags implausible averages as a sensor fault.
//!
//! Sampling costs `N × sample_interval_ms` of real time every cycle. That
//! latency is bounded and everything downstream works in whole seconds, so
//! it only shows up as part of the ±1 s timing jitter.
//!
//! The fault check is transient: each cycle is judged on its own average,
//! with no retry and no latch.

use crate::{
    config::{MonitorConfig, TemperatureUnit},
    errors::{MonitorError, MonitorResult},
    sensor::{Delay, TemperatureSensor},
};

/// One averaged temperature per cycle, in the configured unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Mean of the cycle's raw readings
    pub value: f32,
    /// Set when the average failed the plausibility check
    pub fault: Option<MonitorError>,
    /// Ambient/case temperature reported alongside, if any
    pub ambient: Option<f32>,
}

impl Measurement {
    /// A measurement that passed the plausibility check
    pub const fn plausible(value: f32) -> Self {
        Self { value, fault: None, ambient: None }
    }

    /// A measurement rejected as a sensor fault
    pub const fn faulted(value: f32, fault: MonitorError) -> Self {
        Self { value, fault: Some(fault), ambient: None }
    }

    /// Attach the ambient temperature
    pub fn with_ambient(mut self, ambient: Option<f32>) -> Self {
        self.ambient = ambient;
        self
    }

    /// Whether this cycle's outputs must be suppressed
    pub const fn is_fault(&self) -> bool {
        match &self.fault {
            Some(fault) => fault.is_sensor_fault(),
            None => false,
        }
    }
}

/// Check an averaged measurement against the plausibility ceiling
pub fn check_plausible(value: f32, ceiling: f32) -> MonitorResult<()> {
    if !value.is_finite() {
        return Err(MonitorError::InvalidValue);
    }
    if value > ceiling {
        return Err(MonitorError::SensorFault { value, ceiling });
    }
    Ok(())
}

/// Fixed-window averaging sampler
#[derive(Debug, Clone)]
pub struct Sampler {
    sample_count: u8,
    sample_interval_ms: u32,
    fault_ceiling: f32,
    unit: TemperatureUnit,
}

impl Sampler {
    /// Create a sampler; `sample_count` is clamped to at least 1
    pub fn new(sample_count: u8, sample_interval_ms: u32, fault_ceiling: f32, unit: TemperatureUnit) -> Self {
        Self {
            sample_count: sample_count.max(1),
            sample_interval_ms,
            fault_ceiling,
            unit,
        }
    }

    /// Sampler matching a monitor configuration
    pub fn from_config(config: &MonitorConfig) -> Self {
        Self::new(
            config.sample_count,
            config.sample_interval_ms,
            config.sensor_fault_ceiling,
            config.temperature_unit,
        )
    }

    /// Classify an already-averaged value
    pub fn assess(&self, value: f32) -> Measurement {
        match check_plausible(value, self.fault_ceiling) {
            Ok(()) => Measurement::plausible(value),
            Err(fault) => Measurement::faulted(value, fault),
        }
    }

    /// Take `N` raw readings and average them
    ///
    /// Each reading is converted from the sensor's native unit before
    /// summing. A driver error aborts the cycle's sampling and is reported
    /// as a fault measurement rather than an `Err`: the loop keeps running
    /// and tries again next cycle.
    pub fn sample<S, D>(&self, sensor: &mut S, delay: &mut D) -> Measurement
    where
        S: TemperatureSensor,
        D: Delay,
    {
        let native = sensor.native_unit();
        let mut sum = 0.0f32;

        for _ in 0..self.sample_count {
            match nb::block!(sensor.read_temperature()) {
                Ok(raw) => sum += self.unit.convert(raw, native),
                Err(_) => {
                    log_warn!("temperature sensor read failed");
                    return Measurement::faulted(f32::NAN, MonitorError::SensorUnavailable);
                }
            }
            delay.delay_ms(self.sample_interval_ms);
        }

        let ambient = sensor
            .ambient_temperature()
            .map(|value| self.unit.convert(value, native));

        self.assess(sum / self.sample_count as f32).with_ambient(ambient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::NoDelay;

    struct Fixed {
        values: &'static [f32],
        next: usize,
        unit: TemperatureUnit,
    }

    impl TemperatureSensor for Fixed {
        type Error = ();

        fn read_temperature(&mut self) -> nb::Result<f32, ()> {
            let value = self.values.get(self.next).copied().ok_or(nb::Error::Other(()))?;
            self.next += 1;
            Ok(value)
        }

        fn native_unit(&self) -> TemperatureUnit {
            self.unit
        }
    }

    struct CountingDelay(u32);

    impl Delay for CountingDelay {
        fn delay_ms(&mut self, ms: u32) {
            self.0 += ms;
        }
    }

    #[test]
    fn averages_window() {
        let sampler = Sampler::new(4, 10, 1000.0, TemperatureUnit::Fahrenheit);
        let mut sensor = Fixed { values: &[90.0, 91.0, 92.0, 93.0], next: 0, unit: TemperatureUnit::Fahrenheit };
        let mut delay = CountingDelay(0);

        let m = sampler.sample(&mut sensor, &mut delay);
        assert_eq!(m.value, 91.5);
        assert!(!m.is_fault());
        assert_eq!(delay.0, 40);
    }

    #[test]
    fn converts_native_unit() {
        let sampler = Sampler::new(2, 0, 1000.0, TemperatureUnit::Fahrenheit);
        let mut sensor = Fixed { values: &[100.0, 100.0], next: 0, unit: TemperatureUnit::Celsius };

        let m = sampler.sample(&mut sensor, &mut NoDelay);
        assert_eq!(m.value, 212.0);
    }

    #[test]
    fn flags_implausible_average() {
        let sampler = Sampler::new(2, 0, 1000.0, TemperatureUnit::Fahrenheit);
        let mut sensor = Fixed { values: &[2000.0, 2100.0], next: 0, unit: TemperatureUnit::Fahrenheit };

        let m = sampler.sample(&mut sensor, &mut NoDelay);
        assert!(matches!(m.fault, Some(MonitorError::SensorFault { .. })));
    }

    #[test]
    fn driver_error_is_a_fault() {
        let sampler = Sampler::new(3, 0, 1000.0, TemperatureUnit::Fahrenheit);
        let mut sensor = Fixed { values: &[90.0], next: 0, unit: TemperatureUnit::Fahrenheit };

        let m = sampler.sample(&mut sensor, &mut NoDelay);
        assert_eq!(m.fault, Some(MonitorError::SensorUnavailable));
    }

    #[test]
    fn plausibility_check() {
        assert!(check_plausible(95.0, 1000.0).is_ok());
        assert!(check_plausible(1000.0, 1000.0).is_ok());
        assert!(check_plausible(1000.5, 1000.0).is_err());
        assert_eq!(check_plausible(f32::NAN, 1000.0), Err(MonitorError::InvalidValue));
        assert_eq!(check_plausible(f32::INFINITY, 1000.0), Err(MonitorError::InvalidValue));
    }

    #[test]
    fn zero_count_is_clamped() {
        let sampler = Sampler::new(0, 5, 1000.0, TemperatureUnit::Celsius);
        let mut sensor = Fixed { values: &[30.0, 40.0], next: 0, unit: TemperatureUnit::Celsius };
        let mut delay = CountingDelay(0);

        let m = sampler.sample(&mut sensor, &mut delay);
        assert_eq!(m.value, 30.0);
        assert_eq!(sensor.next, 1);
        assert_eq!(delay.0, 5);
    }
}
