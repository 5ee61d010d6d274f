//! Monitor configuration
//!
//! Every tunable the control loop reads is in [`MonitorConfig`]. It is fixed
//! at process start; only the two thresholds are later changed at runtime, and
//! those live in the presence detector and phase state machine, not here.
//!
//! ```rust
//! use breathguard_core::{MonitorConfig, TemperatureUnit};
//!
//! let config = MonitorConfig::celsius()
//!     .with_alarm_delay_secs(20)
//!     .with_sample_count(8);
//!
//! assert_eq!(config.temperature_unit, TemperatureUnit::Celsius);
//! assert!(config.validate().is_ok());
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::defaults::*;
use crate::errors::{MonitorError, MonitorResult};

/// Unit every measurement and threshold is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TemperatureUnit {
    /// Degrees Celsius
    Celsius,
    /// Degrees Fahrenheit
    Fahrenheit,
}

impl TemperatureUnit {
    /// Short label for status output
    pub const fn label(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "C",
            TemperatureUnit::Fahrenheit => "F",
        }
    }

    /// Convert a Celsius value into this unit
    pub fn from_celsius(&self, celsius: f32) -> f32 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        }
    }

    /// Convert a value in this unit back to Celsius
    pub fn to_celsius(&self, value: f32) -> f32 {
        match self {
            TemperatureUnit::Celsius => value,
            TemperatureUnit::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
        }
    }

    /// Convert a value expressed in `from` into this unit
    pub fn convert(&self, value: f32, from: TemperatureUnit) -> f32 {
        if from == *self {
            value
        } else {
            self.from_celsius(from.to_celsius(value))
        }
    }
}

/// Output collaborator a [`StatusSink`](crate::status::StatusSink) feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OutputChannel {
    /// Per-cycle status stream (serial, log)
    Status,
    /// Character or graphic display
    Display,
    /// Analog output channel
    AnalogOut,
}

/// Optional output collaborators, enabled when the loop is composed
///
/// The monitor itself always computes the full status; these flags only
/// decide which sinks get it (see [`Monitor::publish`](crate::Monitor::publish)).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Capabilities {
    /// Publish the per-cycle status record (serial/log stream)
    pub status_output: bool,
    /// A status display is attached
    pub display: bool,
    /// An analog output channel is attached
    pub analog_out: bool,
}

impl Capabilities {
    /// Every output enabled
    pub const fn all() -> Self {
        Self {
            status_output: true,
            display: true,
            analog_out: true,
        }
    }

    /// Whether sinks on `channel` should be fed
    pub const fn enables(&self, channel: OutputChannel) -> bool {
        match channel {
            OutputChannel::Status => self.status_output,
            OutputChannel::Display => self.display,
            OutputChannel::AnalogOut => self.analog_out,
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            status_output: true,
            display: false,
            analog_out: false,
        }
    }
}

/// Control loop configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MonitorConfig {
    /// Initial presence threshold
    pub presence_threshold: f32,
    /// Initial phase threshold
    pub phase_threshold: f32,
    /// Half-width of the presence dead zone
    pub presence_hysteresis: f32,
    /// Margin above the phase threshold required to enter exhale
    pub phase_hysteresis: f32,
    /// Seconds without a phase change before the alarm is raised
    pub alarm_delay_secs: u64,
    /// Raw readings averaged per cycle (N >= 1)
    pub sample_count: u8,
    /// Delay between raw readings
    pub sample_interval_ms: u32,
    /// Fixed delay after processing each cycle
    pub cycle_period_ms: u32,
    /// Averaged measurements above this are a sensor fault
    pub sensor_fault_ceiling: f32,
    /// Unit for measurements and thresholds
    pub temperature_unit: TemperatureUnit,
    /// Output collaborators attached to the loop
    pub capabilities: Capabilities,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::fahrenheit()
    }
}

impl MonitorConfig {
    /// Fahrenheit operating profile (the shipping default)
    pub fn fahrenheit() -> Self {
        Self {
            presence_threshold: PRESENCE_THRESHOLD_F,
            phase_threshold: PHASE_THRESHOLD_F,
            presence_hysteresis: PRESENCE_HYSTERESIS_F,
            phase_hysteresis: PHASE_HYSTERESIS_F,
            alarm_delay_secs: DEFAULT_ALARM_DELAY_SECS,
            sample_count: DEFAULT_SAMPLE_COUNT,
            sample_interval_ms: DEFAULT_SAMPLE_INTERVAL_MS,
            cycle_period_ms: DEFAULT_CYCLE_PERIOD_MS,
            sensor_fault_ceiling: SENSOR_FAULT_CEILING_F,
            temperature_unit: TemperatureUnit::Fahrenheit,
            capabilities: Capabilities::default(),
        }
    }

    /// Celsius operating profile
    pub fn celsius() -> Self {
        Self {
            presence_threshold: PRESENCE_THRESHOLD_C,
            phase_threshold: PHASE_THRESHOLD_C,
            presence_hysteresis: PRESENCE_HYSTERESIS_C,
            phase_hysteresis: PHASE_HYSTERESIS_C,
            sensor_fault_ceiling: SENSOR_FAULT_CEILING_C,
            temperature_unit: TemperatureUnit::Celsius,
            ..Self::fahrenheit()
        }
    }

    /// Set both initial thresholds
    pub fn with_thresholds(mut self, presence: f32, phase: f32) -> Self {
        self.presence_threshold = presence;
        self.phase_threshold = phase;
        self
    }

    /// Set both hysteresis bands
    pub fn with_hysteresis(mut self, presence: f32, phase: f32) -> Self {
        self.presence_hysteresis = presence;
        self.phase_hysteresis = phase;
        self
    }

    /// Set the stuck-phase alarm delay
    pub fn with_alarm_delay_secs(mut self, secs: u64) -> Self {
        self.alarm_delay_secs = secs;
        self
    }

    /// Set the number of raw readings averaged per cycle
    pub fn with_sample_count(mut self, count: u8) -> Self {
        self.sample_count = count;
        self
    }

    /// Set sampling and post-cycle delays
    pub fn with_timing(mut self, sample_interval_ms: u32, cycle_period_ms: u32) -> Self {
        self.sample_interval_ms = sample_interval_ms;
        self.cycle_period_ms = cycle_period_ms;
        self
    }

    /// Set the sensor fault ceiling
    pub fn with_fault_ceiling(mut self, ceiling: f32) -> Self {
        self.sensor_fault_ceiling = ceiling;
        self
    }

    /// Set the attached output collaborators
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Real time one cycle spends sampling
    pub fn sampling_latency_ms(&self) -> u32 {
        self.sample_count as u32 * self.sample_interval_ms
    }

    /// Reject configurations the loop cannot run with
    pub fn validate(&self) -> MonitorResult<()> {
        if self.sample_count == 0 {
            return Err(MonitorError::InvalidConfig { reason: "sample_count must be at least 1" });
        }
        if !self.presence_threshold.is_finite() || !self.phase_threshold.is_finite() {
            return Err(MonitorError::InvalidConfig { reason: "thresholds must be finite" });
        }
        if !(self.presence_hysteresis >= 0.0 && self.presence_hysteresis.is_finite()) {
            return Err(MonitorError::InvalidConfig { reason: "presence_hysteresis must be finite and non-negative" });
        }
        if !(self.phase_hysteresis >= 0.0 && self.phase_hysteresis.is_finite()) {
            return Err(MonitorError::InvalidConfig { reason: "phase_hysteresis must be finite and non-negative" });
        }
        if !(self.sensor_fault_ceiling > 0.0 && self.sensor_fault_ceiling.is_finite()) {
            return Err(MonitorError::InvalidConfig { reason: "sensor_fault_ceiling must be finite and positive" });
        }
        if self.alarm_delay_secs == 0 {
            return Err(MonitorError::InvalidConfig { reason: "alarm_delay_secs must be at least 1" });
        }
        Ok(())
    }
}
