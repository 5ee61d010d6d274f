//! Breaths-per-minute from exhale-start spacing
//!
//! Two successive exhale starts bound one full breath. The calculator counts
//! exhale starts; once two have been seen since the last reset it converts
//! the time between them into a rate and starts counting again.
//!
//! ```text
//!  exhale start:   t1          t2          t3          t4
//!  counter:        1           2 → bpm     1           2 → bpm
//!  rate:                       60/(t2-t1)              60/(t4-t3)
//! ```
//!
//! Timestamps are whole seconds, so two exhale starts in the same second
//! give a zero interval. That yields `bpm = 0` instead of a division by zero.

use crate::constants::time::SECONDS_PER_MINUTE;
use crate::phase::PhaseTransition;
use crate::time::{elapsed_secs, Seconds};

/// Rate from one breath interval
///
/// Returns 0 for a zero interval.
pub fn breaths_per_minute(elapsed: Seconds) -> f32 {
    if elapsed == 0 {
        return 0.0;
    }
    SECONDS_PER_MINUTE / elapsed as f32
}

/// Breathing-rate state
#[derive(Debug, Clone, Default)]
pub struct BpmCalculator {
    exhale_count: u8,
    bpm_time: Seconds,
    bpm_prev_time: Seconds,
    bpm: f32,
}

impl BpmCalculator {
    /// Empty calculator at time zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Last computed rate, 0 until the first full breath
    pub fn bpm(&self) -> f32 {
        self.bpm
    }

    /// Exhale starts counted since the last reset
    pub fn exhale_count(&self) -> u8 {
        self.exhale_count
    }

    /// New patient: clear the counter and the rate, anchor timers at `now`
    pub fn reset(&mut self, now: Seconds) {
        self.exhale_count = 0;
        self.bpm = 0.0;
        self.bpm_time = now;
        self.bpm_prev_time = now;
    }

    /// Patient gone: rate reads zero
    pub fn clear(&mut self) {
        self.bpm = 0.0;
    }

    /// Observe a phase transition
    ///
    /// Returns the new rate when this transition completed a breath.
    pub fn on_transition(&mut self, transition: PhaseTransition, now: Seconds) -> Option<f32> {
        if transition.is_exhale_start() {
            self.exhale_count = self.exhale_count.saturating_add(1);
            self.bpm_prev_time = self.bpm_time;
            self.bpm_time = now;
        }

        if self.exhale_count < 2 {
            return None;
        }

        self.bpm = breaths_per_minute(elapsed_secs(self.bpm_prev_time, now));
        log_debug!("breath interval {}s -> {} bpm", now.saturating_sub(self.bpm_prev_time), self.bpm);

        self.exhale_count = 0;
        self.bpm_prev_time = now;
        self.bpm_time = now;
        Some(self.bpm)
    }
}
