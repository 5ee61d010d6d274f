//! The control loop
//!
//! [`Monitor`] owns every piece of respiratory state and advances it exactly
//! once per cycle. Nothing here is global: the presence detector, phase
//! machine, rate calculator, alarm timer and calibration controller are
//! fields of one context, and each cycle runs them in a fixed order:
//!
//! ```text
//! Sampler ─▶ Presence ─┬─▶ Phase ─▶ BPM + Alarm ─┬─▶ Calibration ─▶ Sinks
//!                      └─ (absent: clear) ───────┘
//! ```
//!
//! Everything in a cycle sees the same measurement and the same quantized
//! second. The only state touched from outside the loop is the calibration
//! request flags (see [`crate::calibration`]).
//!
//! ## Sensor Faults
//!
//! A faulted measurement does not advance any state machine. The cycle
//! reports unknown presence/phase/alarm/rate, deasserts the indicators and
//! leaves calibration requests pending. The next plausible measurement picks
//! up where the loop left off.
//!
//! ```rust
//! use breathguard_core::{CalibrationRequests, Monitor, MonitorConfig, PresenceState};
//!
//! let requests = CalibrationRequests::new();
//! let mut monitor = Monitor::new(MonitorConfig::default(), &requests)?;
//!
//! let report = monitor.observe(85.0, 0);
//! assert_eq!(report.status.presence, Some(PresenceState::Present));
//!
//! requests.request_phase_threshold();
//! let report = monitor.observe(91.7, 1);
//! assert_eq!(monitor.phase_threshold(), 91.0);
//! assert_eq!(report.threshold_changes.len(), 1);
//! # Ok::<(), breathguard_core::MonitorError>(())
//! ```

use crate::{
    alarm::AlarmTimer,
    bpm::BpmCalculator,
    calibration::{CalibrationController, CalibrationRequests, ThresholdChanges},
    config::MonitorConfig,
    errors::{MonitorError, MonitorResult},
    phase::{BreathPhase, PhaseStateMachine},
    presence::{PresenceDetector, PresenceState, PresenceUpdate},
    sampler::{Measurement, Sampler},
    sensor::{Delay, TemperatureSensor},
    status::{Indicators, StatusRecord, StatusSink},
    time::{Seconds, TimeSource},
};

/// Everything one cycle produced
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// Status snapshot
    pub status: StatusRecord,
    /// Discrete outputs
    pub indicators: Indicators,
    /// Thresholds changed this cycle (only this cycle)
    pub threshold_changes: ThresholdChanges,
}

/// Respiratory monitor context and per-cycle driver
pub struct Monitor<'r> {
    config: MonitorConfig,
    requests: &'r CalibrationRequests,
    sampler: Sampler,
    presence: PresenceDetector,
    phase: PhaseStateMachine,
    bpm: BpmCalculator,
    alarm: AlarmTimer,
    calibration: CalibrationController,
    sensor_fault: bool,
    cycle: u64,
}

impl<'r> Monitor<'r> {
    /// Build a monitor from a validated configuration
    ///
    /// `requests` is the flag pair the calibration triggers write to; on a
    /// device this is usually a `static`.
    pub fn new(config: MonitorConfig, requests: &'r CalibrationRequests) -> MonitorResult<Self> {
        config.validate()?;

        Ok(Self {
            sampler: Sampler::from_config(&config),
            presence: PresenceDetector::new(config.presence_threshold, config.presence_hysteresis),
            phase: PhaseStateMachine::new(config.phase_threshold, config.phase_hysteresis),
            bpm: BpmCalculator::new(),
            alarm: AlarmTimer::new(config.alarm_delay_secs),
            calibration: CalibrationController::new(),
            sensor_fault: false,
            cycle: 0,
            requests,
            config,
        })
    }

    /// Configuration the monitor was built with
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Calibration request flags
    pub fn requests(&self) -> &'r CalibrationRequests {
        self.requests
    }

    /// Cycles run so far
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Current presence state
    pub fn presence(&self) -> PresenceState {
        self.presence.state()
    }

    /// Current phase (meaningful only while present)
    pub fn phase(&self) -> BreathPhase {
        self.phase.phase()
    }

    /// Last computed breathing rate
    pub fn bpm(&self) -> f32 {
        self.bpm.bpm()
    }

    /// Exhale starts since the last rate computation or new patient
    pub fn exhale_count(&self) -> u8 {
        self.bpm.exhale_count()
    }

    /// Whether the stuck-phase alarm is raised
    pub fn alarm_active(&self) -> bool {
        self.alarm.is_active()
    }

    /// Whether the last measurement was a sensor fault
    pub fn sensor_fault(&self) -> bool {
        self.sensor_fault
    }

    /// Current presence threshold
    pub fn presence_threshold(&self) -> f32 {
        self.presence.threshold()
    }

    /// Current phase threshold
    pub fn phase_threshold(&self) -> f32 {
        self.phase.threshold()
    }

    /// Run one full cycle against real collaborators
    ///
    /// Samples the sensor, reads the clock once, advances all state,
    /// publishes to `sink` when status output is enabled, then waits out
    /// the fixed post-processing delay.
    pub fn run_cycle<S, D, T, K>(&mut self, sensor: &mut S, delay: &mut D, clock: &T, sink: &mut K) -> CycleReport
    where
        S: TemperatureSensor,
        D: Delay,
        T: TimeSource,
        K: StatusSink,
    {
        let measurement = self.sampler.sample(sensor, delay);
        let report = self.step(measurement, clock.now_secs());

        self.publish(&report, sink);

        delay.delay_ms(self.config.cycle_period_ms);
        report
    }

    /// Hand a cycle's outputs to `sink` if its channel is enabled
    ///
    /// [`run_cycle`](Self::run_cycle) publishes to its own sink; boards with
    /// a display or analog output call this for each extra collaborator.
    /// Returns whether the sink was fed.
    pub fn publish<K: StatusSink>(&self, report: &CycleReport, sink: &mut K) -> bool {
        if !self.config.capabilities.enables(sink.channel()) {
            return false;
        }
        sink.publish(&report.status, &report.indicators, &report.threshold_changes);
        true
    }

    /// Classify an already-averaged value and run one cycle on it
    pub fn observe(&mut self, value: f32, now: Seconds) -> CycleReport {
        let measurement = self.sampler.assess(value);
        self.step(measurement, now)
    }

    /// Advance all state by one cycle
    pub fn step(&mut self, measurement: Measurement, now: Seconds) -> CycleReport {
        self.cycle += 1;

        if let Some(_fault) = measurement.fault.filter(MonitorError::is_sensor_fault) {
            if !self.sensor_fault {
                log_warn!("sensor fault: {} (measurement {})", _fault, measurement.value);
            }
            self.sensor_fault = true;
            return self.fault_report(measurement, now);
        }

        if self.sensor_fault {
            log_info!("sensor fault cleared, measurement {}", measurement.value);
            self.sensor_fault = false;
        }

        let value = measurement.value;
        let indicators = match self.presence.update(value) {
            PresenceUpdate::Arrived => {
                log_info!("new patient at {}s (measurement {})", now, value);
                self.new_patient(value, now)
            }
            PresenceUpdate::Departed => {
                log_info!("patient left at {}s", now);
                self.clear_outputs()
            }
            PresenceUpdate::Unchanged(PresenceState::Present) => self.track_breathing(value, now),
            PresenceUpdate::Unchanged(PresenceState::Absent) => self.clear_outputs(),
        };

        let threshold_changes = self.calibration.apply(self.requests, value, &mut self.presence, &mut self.phase);

        let present = self.presence.state().is_present();
        CycleReport {
            status: StatusRecord {
                cycle: self.cycle,
                time_secs: now,
                measurement: value,
                sensor_fault: false,
                presence: Some(self.presence.state()),
                phase: present.then(|| self.phase.phase()),
                alarm: Some(self.alarm.is_active()),
                bpm: Some(self.bpm.bpm()),
                ambient: measurement.ambient,
                unit: self.config.temperature_unit.label(),
            },
            indicators,
            threshold_changes,
        }
    }

    /// Fresh counters and timers, phase taken from the arrival measurement
    fn new_patient(&mut self, value: f32, now: Seconds) -> Indicators {
        let phase = self.phase.seed(value);
        self.bpm.reset(now);
        self.alarm.reset(now);
        log_debug!("initial phase {}", phase.name());
        Indicators::present(phase, self.alarm.is_active())
    }

    fn track_breathing(&mut self, value: f32, now: Seconds) -> Indicators {
        let transition = self.phase.update(value);

        if let Some(transition) = transition {
            log_debug!("{} -> {} at {}s", transition.from.name(), transition.to.name(), now);
            self.alarm.on_transition(now);
            if let Some(_bpm) = self.bpm.on_transition(transition, now) {
                log_debug!("breathing rate {} bpm", _bpm);
            }
        }

        self.alarm.check(now, transition.is_some());
        Indicators::present(self.phase.phase(), self.alarm.is_active())
    }

    fn clear_outputs(&mut self) -> Indicators {
        self.alarm.clear();
        self.bpm.clear();
        Indicators::cleared()
    }

    fn fault_report(&self, measurement: Measurement, now: Seconds) -> CycleReport {
        CycleReport {
            status: StatusRecord {
                cycle: self.cycle,
                time_secs: now,
                measurement: measurement.value,
                sensor_fault: true,
                presence: None,
                phase: None,
                alarm: None,
                bpm: None,
                ambient: measurement.ambient,
                unit: self.config.temperature_unit.label(),
            },
            indicators: Indicators::cleared(),
            threshold_changes: ThresholdChanges::new(),
        }
    }
}
