//! Time-Related Constants
//!
//! Conversion factors and loop timing used by the monitor.

// ===== TIME UNIT CONVERSIONS =====

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1000;

/// Seconds per minute.
///
/// Breathing rate is `SECONDS_PER_MINUTE / elapsed_seconds` for one breath.
pub const SECONDS_PER_MINUTE: f32 = 60.0;
