//! Per-cycle outputs
//!
//! Each cycle the monitor produces:
//! - Four discrete [`Indicators`] (LEDs / GPIO lines)
//! - One [`StatusRecord`] for logging, telemetry and analog-output collaborators
//! - Zero to two threshold-changed events (see [`crate::calibration`])
//!
//! During a sensor fault the inference fields of the status record are
//! `None`: unknown, not zero. The indicators are all deasserted.

use crate::calibration::ThresholdChange;
use crate::config::OutputChannel;
use crate::phase::BreathPhase;
use crate::presence::PresenceState;
use crate::time::Seconds;

/// Discrete output signals, updated once per cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Indicators {
    /// Exhale in progress
    pub exhale: bool,
    /// Inhale in progress
    pub inhale: bool,
    /// Patient at the sensor
    pub patient_present: bool,
    /// Stuck-phase alarm
    pub alarm: bool,
}

impl Indicators {
    /// Everything deasserted
    pub const fn cleared() -> Self {
        Self {
            exhale: false,
            inhale: false,
            patient_present: false,
            alarm: false,
        }
    }

    /// Indicators for a present patient in `phase`
    pub const fn present(phase: BreathPhase, alarm: bool) -> Self {
        Self {
            exhale: matches!(phase, BreathPhase::Exhale),
            inhale: matches!(phase, BreathPhase::Inhale),
            patient_present: true,
            alarm,
        }
    }
}

/// Status snapshot exposed once per cycle
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StatusRecord {
    /// Cycle number; increments by one every cycle
    pub cycle: u64,
    /// Quantized time of the cycle
    pub time_secs: Seconds,
    /// Averaged measurement
    pub measurement: f32,
    /// Measurement was implausible this cycle
    pub sensor_fault: bool,
    /// Presence, `None` while faulted
    pub presence: Option<PresenceState>,
    /// Current phase, `None` while faulted or absent
    pub phase: Option<BreathPhase>,
    /// Alarm state, `None` while faulted
    pub alarm: Option<bool>,
    /// Breathing rate, `None` while faulted
    pub bpm: Option<f32>,
    /// Ambient/case temperature, if the sensor reports one
    pub ambient: Option<f32>,
    /// Unit label for `measurement` and `ambient`
    pub unit: &'static str,
}

impl StatusRecord {
    /// Whether a patient is known to be present
    pub fn patient_present(&self) -> bool {
        self.presence.map_or(false, |p| p.is_present())
    }
}

/// Consumer of per-cycle outputs (serial stream, display, telemetry)
pub trait StatusSink {
    /// Called once per cycle after all state is final
    fn publish(&mut self, status: &StatusRecord, indicators: &Indicators, changes: &[ThresholdChange]);

    /// Which capability flag gates this sink
    fn channel(&self) -> OutputChannel {
        OutputChannel::Status
    }
}

/// Sink that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl StatusSink for NullSink {
    fn publish(&mut self, _status: &StatusRecord, _indicators: &Indicators, _changes: &[ThresholdChange]) {}
}

/// Sink writing one `log` line per cycle
#[cfg(feature = "log")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

#[cfg(feature = "log")]
impl StatusSink for LogSink {
    fn publish(&mut self, status: &StatusRecord, _indicators: &Indicators, changes: &[ThresholdChange]) {
        if status.sensor_fault {
            log::warn!(
                "cycle={} t={}s temp={}{} SENSOR FAULT",
                status.cycle, status.time_secs, status.measurement, status.unit
            );
        } else {
            log::info!(
                "cycle={} t={}s temp={:.1}{} present={} phase={} alarm={} bpm={:.1}",
                status.cycle,
                status.time_secs,
                status.measurement,
                status.unit,
                status.patient_present(),
                status.phase.map_or("-", |p| p.name()),
                status.alarm.unwrap_or(false),
                status.bpm.unwrap_or(0.0),
            );
        }

        for change in changes {
            log::info!("{} threshold set to {}{}", change.kind.name(), change.value, status.unit);
        }
    }
}
