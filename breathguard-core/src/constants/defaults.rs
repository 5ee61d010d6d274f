//! Default Monitor Parameters
//!
//! Thresholds are given for both supported units. The Fahrenheit set is the
//! shipping default; the Celsius set is the same physical operating point.
//!
//! Typical values measured inside a surgical mask:
//! - Room air: 68-75°F (20-24°C)
//! - Mask air with a patient present: 82-90°F (28-32°C)
//! - Exhaled breath at the sensor: 90-95°F (32-35°C)

// ===== FAHRENHEIT PROFILE =====

/// Presence threshold (°F). Mask air above this means a face is at the sensor.
pub const PRESENCE_THRESHOLD_F: f32 = 80.0;

/// Phase threshold (°F). Separates inhale (cooler) from exhale (warmer).
pub const PHASE_THRESHOLD_F: f32 = 88.0;

/// Presence hysteresis half-band (°F).
pub const PRESENCE_HYSTERESIS_F: f32 = 1.0;

/// Phase hysteresis (°F).
pub const PHASE_HYSTERESIS_F: f32 = 0.5;

/// Averaged readings above this are treated as a sensor fault (°F).
///
/// A disconnected thermocouple amplifier reads in the thousands.
pub const SENSOR_FAULT_CEILING_F: f32 = 1000.0;

// ===== CELSIUS PROFILE =====

/// Presence threshold (°C).
pub const PRESENCE_THRESHOLD_C: f32 = 26.7;

/// Phase threshold (°C).
pub const PHASE_THRESHOLD_C: f32 = 31.1;

/// Presence hysteresis half-band (°C).
pub const PRESENCE_HYSTERESIS_C: f32 = 0.5;

/// Phase hysteresis (°C).
pub const PHASE_HYSTERESIS_C: f32 = 0.3;

/// Sensor fault ceiling (°C).
pub const SENSOR_FAULT_CEILING_C: f32 = 500.0;

// ===== TIMING =====

/// Seconds without a phase change before the alarm is raised.
pub const DEFAULT_ALARM_DELAY_SECS: u64 = 15;

/// Raw readings averaged into one measurement.
pub const DEFAULT_SAMPLE_COUNT: u8 = 10;

/// Delay between raw readings (milliseconds).
///
/// 10 samples x 10 ms keeps sampling latency at 100 ms per cycle.
pub const DEFAULT_SAMPLE_INTERVAL_MS: u32 = 10;

/// Fixed post-processing delay at the end of each cycle (milliseconds).
pub const DEFAULT_CYCLE_PERIOD_MS: u32 = 100;
