//! Error Types for the Respiratory Monitor
//!
//! ## Design Philosophy
//!
//! The error system is kept embedded-friendly:
//!
//! 1. **Small Size**: Each variant carries at most two `f32`s, so errors can be
//!    returned from the sampling hot path every cycle.
//!
//! 2. **No Heap Allocation**: Messages are `&'static str` only.
//!
//! 3. **Copy Semantics**: Errors implement Copy and can be stored in the cycle
//!    report without ownership juggling.
//!
//! ## Error Categories
//!
//! ### Sensor Faults (recovered every cycle)
//! - `SensorFault`: Averaged measurement above the plausibility ceiling
//! - `InvalidValue`: Averaged measurement is NaN or infinite
//! - `SensorUnavailable`: The sensor driver itself reported a failure
//!
//! None of these latch. The next cycle re-evaluates from scratch and the fault
//! clears as soon as a plausible reading returns.
//!
//! ### Setup Issues
//! - `InvalidConfig`: Configuration rejected before the loop starts
//!
//! A zero elapsed time in the breathing-rate computation is not an error at
//! all: it yields a rate of zero.
//!
//! ```rust
//! use breathguard_core::{MonitorError, sampler::check_plausible};
//!
//! match check_plausible(5000.0, 1000.0) {
//!     Ok(()) => {}
//!     Err(MonitorError::SensorFault { value, .. }) => {
//!         // Suppress inference outputs for this cycle
//!         let _ = value;
//!     }
//!     Err(_) => {}
//! }
//! ```

use thiserror_no_std::Error;

/// Result type for monitor operations
pub type MonitorResult<T> = Result<T, MonitorError>;

/// Monitor errors - kept small for embedded use
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum MonitorError {
    /// Averaged measurement is physically implausible
    #[error("Measurement {value} exceeds plausibility ceiling {ceiling}")]
    SensorFault {
        /// The averaged measurement that failed the check
        value: f32,
        /// Configured ceiling
        ceiling: f32,
    },

    /// Measurement makes no numerical sense (NaN, infinity)
    #[error("Invalid value: not a valid number")]
    InvalidValue,

    /// Raw sensor read failed
    #[error("Temperature sensor unavailable")]
    SensorUnavailable,

    /// Configuration rejected at startup
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// Which option was rejected
        reason: &'static str,
    },
}

impl MonitorError {
    /// Whether this error is a per-cycle sensor fault (as opposed to a setup error)
    pub const fn is_sensor_fault(&self) -> bool {
        !matches!(self, MonitorError::InvalidConfig { .. })
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for MonitorError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::SensorFault { value, ceiling } =>
                defmt::write!(fmt, "Measurement {} above ceiling {}", value, ceiling),
            Self::InvalidValue =>
                defmt::write!(fmt, "Invalid value"),
            Self::SensorUnavailable =>
                defmt::write!(fmt, "Sensor unavailable"),
            Self::InvalidConfig { reason } =>
                defmt::write!(fmt, "Invalid config: {}", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fault_classification() {
        assert!(MonitorError::SensorFault { value: 2000.0, ceiling: 1000.0 }.is_sensor_fault());
        assert!(MonitorError::InvalidValue.is_sensor_fault());
        assert!(MonitorError::SensorUnavailable.is_sensor_fault());
        assert!(!MonitorError::InvalidConfig { reason: "sample_count" }.is_sensor_fault());
    }

    #[test]
    fn errors_stay_small() {
        assert!(core::mem::size_of::<MonitorError>() <= 24);
    }
}
