//! Patient presence detection with dual-band hysteresis
//!
//! A face at the mask warms the sensor well above room air. Presence is
//! decided against a threshold with a dead zone on both sides:
//!
//! ```text
//!   measurement
//!       ▲
//!       │            enter: m >= threshold + hyst
//!  t+h ─┼───────────────────────────────
//!       │   dead zone: keep previous state
//!  t-h ─┼───────────────────────────────
//!       │            leave: m <  threshold - hyst
//! ```
//!
//! A single-sided check (enter-only threshold, no exit band) chatters when the
//! mask sits near the boundary, so both bands are always applied.

/// Whether a patient is at the sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PresenceState {
    /// No patient, all outputs cleared
    #[default]
    Absent,
    /// Patient at the sensor, phase tracking active
    Present,
}

impl PresenceState {
    /// Convenience for indicator outputs
    pub const fn is_present(&self) -> bool {
        matches!(self, PresenceState::Present)
    }
}

/// Result of feeding one measurement to the detector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceUpdate {
    /// `Absent -> Present`: a new patient, downstream state must be reset
    Arrived,
    /// `Present -> Absent`
    Departed,
    /// No transition this cycle
    Unchanged(PresenceState),
}

impl PresenceUpdate {
    /// State after this update
    pub const fn state(&self) -> PresenceState {
        match self {
            PresenceUpdate::Arrived => PresenceState::Present,
            PresenceUpdate::Departed => PresenceState::Absent,
            PresenceUpdate::Unchanged(state) => *state,
        }
    }
}

/// Presence state machine
#[derive(Debug, Clone)]
pub struct PresenceDetector {
    threshold: f32,
    hysteresis: f32,
    state: PresenceState,
}

impl PresenceDetector {
    /// Start in `Absent`
    pub fn new(threshold: f32, hysteresis: f32) -> Self {
        Self {
            threshold,
            hysteresis: hysteresis.abs(),
            state: PresenceState::Absent,
        }
    }

    /// Current state
    pub fn state(&self) -> PresenceState {
        self.state
    }

    /// Current threshold
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Install a new threshold (calibration). State is kept.
    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = threshold;
    }

    /// Feed one averaged measurement
    pub fn update(&mut self, measurement: f32) -> PresenceUpdate {
        match self.state {
            PresenceState::Absent if measurement >= self.threshold + self.hysteresis => {
                self.state = PresenceState::Present;
                PresenceUpdate::Arrived
            }
            PresenceState::Present if measurement < self.threshold - self.hysteresis => {
                self.state = PresenceState::Absent;
                PresenceUpdate::Departed
            }
            state => PresenceUpdate::Unchanged(state),
        }
    }
}
