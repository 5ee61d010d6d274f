//! Constants for BreathGuard Core
//!
//! Centralized numeric values used by the monitor. Anything a deployment
//! might tune lives in [`crate::config::MonitorConfig`]; the values here are
//! its defaults and the fixed unit conversions.
//!
//! ## Organization
//!
//! - **Time**: Unit conversions and loop timing defaults
//! - **Defaults**: Per-unit default thresholds, hysteresis bands and ceilings

/// Time unit conversions and loop timing defaults.
pub mod time;

/// Default thresholds and bands for each temperature unit.
pub mod defaults;

pub use time::{MS_PER_SECOND, SECONDS_PER_MINUTE};
pub use defaults::{
    DEFAULT_ALARM_DELAY_SECS, DEFAULT_SAMPLE_COUNT, DEFAULT_SAMPLE_INTERVAL_MS,
    DEFAULT_CYCLE_PERIOD_MS,
};
