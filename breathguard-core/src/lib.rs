//! Respiratory state inference engine for BreathGuard
//!
//! Infers a patient's breath phase (inhale/exhale) and breathing rate from
//! the air temperature measured inside a face mask, and raises an alarm when
//! the phase stops changing.
//!
//! Designed for edge devices with limited resources.
//!
//! Key constraints:
//! - Single-threaded, cycle-based control loop
//! - No heap allocation in hot path
//! - Only single-word atomics cross the interrupt boundary
//!
//! ```no_run
//! use breathguard_core::{CalibrationRequests, Monitor, MonitorConfig, Measurement};
//!
//! static REQUESTS: CalibrationRequests = CalibrationRequests::new();
//!
//! let mut monitor = Monitor::new(MonitorConfig::default(), &REQUESTS)?;
//!
//! // Feed one averaged measurement per cycle with the current second
//! let report = monitor.step(Measurement::plausible(93.0), 12);
//! if report.indicators.alarm {
//!     // Sound the buzzer
//! }
//! # Ok::<(), breathguard_core::MonitorError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod alarm;
pub mod bpm;
pub mod calibration;
pub mod config;
pub mod constants;
pub mod errors;
pub mod monitor;
pub mod phase;
pub mod presence;
pub mod sampler;
pub mod sensor;
pub mod status;
pub mod time;

// Public API
pub use calibration::{CalibrationRequests, ThresholdChange, ThresholdKind};
pub use config::{Capabilities, MonitorConfig, OutputChannel, TemperatureUnit};
pub use errors::{MonitorError, MonitorResult};
pub use monitor::{CycleReport, Monitor};
pub use phase::BreathPhase;
pub use presence::PresenceState;
pub use sampler::{Measurement, Sampler};
pub use sensor::{Delay, TemperatureSensor};
pub use status::{Indicators, StatusRecord, StatusSink};
pub use time::{Seconds, TimeSource, Timestamp};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
