//! Simulated Patient Session
//!
//! Runs the full control loop against a synthetic mask sensor:
//! 1. Room air (no patient)
//! 2. Patient arrives and breathes at ~15 bpm
//! 3. Breathing stalls long enough to raise the alarm
//! 4. Breathing resumes
//! 5. A nurse recalibrates the phase threshold
//! 6. A loose sensor lead produces one implausible reading
//! 7. Patient leaves
//!
//! The clock is simulated so the session runs instantly.

use breathguard_core::{
    sensor::{NoDelay, TemperatureSensor},
    status::StatusSink,
    time::MockTimeSource,
    CalibrationRequests, Capabilities, Indicators, Monitor, MonitorConfig, OutputChannel, StatusRecord,
    TemperatureUnit, ThresholdChange,
};

/// Mask sensor reporting Celsius from a scripted profile
struct SyntheticMask {
    celsius: f32,
}

impl TemperatureSensor for SyntheticMask {
    type Error = ();

    fn read_temperature(&mut self) -> nb::Result<f32, Self::Error> {
        Ok(self.celsius)
    }

    fn native_unit(&self) -> TemperatureUnit {
        TemperatureUnit::Celsius
    }

    fn ambient_temperature(&mut self) -> Option<f32> {
        Some(22.0)
    }
}

/// Prints one line per cycle, only when something changed
#[derive(Default)]
struct ConsoleSink {
    last: Option<Indicators>,
}

impl StatusSink for ConsoleSink {
    fn publish(&mut self, status: &StatusRecord, indicators: &Indicators, changes: &[ThresholdChange]) {
        for change in changes {
            println!("  >> {} threshold set to {:.0}{}", change.kind.name(), change.value, status.unit);
        }
        if self.last == Some(*indicators) && !status.sensor_fault {
            return;
        }
        self.last = Some(*indicators);

        if status.sensor_fault {
            println!("t={:>3}s  SENSOR FAULT ({:.1}{})", status.time_secs, status.measurement, status.unit);
            return;
        }
        println!(
            "t={:>3}s  {:>5.1}{}  present={:<5} phase={:<6} alarm={:<5} bpm={:.1}",
            status.time_secs,
            status.measurement,
            status.unit,
            status.patient_present(),
            status.phase.map_or("-", |p| p.name()),
            status.alarm.unwrap_or(false),
            status.bpm.unwrap_or(0.0),
        );
    }
}

/// Front-panel alarm lamp, driven through the display capability
#[derive(Default)]
struct AlarmPanel {
    lit: bool,
}

impl StatusSink for AlarmPanel {
    fn publish(&mut self, status: &StatusRecord, indicators: &Indicators, _changes: &[ThresholdChange]) {
        if indicators.alarm != self.lit {
            self.lit = indicators.alarm;
            println!("  [panel] alarm lamp {} at t={}s", if self.lit { "ON" } else { "off" }, status.time_secs);
        }
    }

    fn channel(&self) -> OutputChannel {
        OutputChannel::Display
    }
}

fn breathing_celsius(t: u64) -> f32 {
    if t % 4 < 2 { 29.5 } else { 33.5 }
}

fn main() -> Result<(), breathguard_core::MonitorError> {
    println!("=== BreathGuard Simulated Patient ===\n");

    let requests = CalibrationRequests::new();
    let capabilities = Capabilities { display: true, ..Capabilities::default() };
    let config = MonitorConfig::fahrenheit().with_timing(0, 0).with_capabilities(capabilities);
    let mut monitor = Monitor::new(config, &requests)?;

    let mut sensor = SyntheticMask { celsius: 22.0 };
    let clock = MockTimeSource::new(0);
    let mut sink = ConsoleSink::default();
    let mut panel = AlarmPanel::default();

    for t in 0..120u64 {
        sensor.celsius = match t {
            0..=4 => 22.0,
            5..=39 => breathing_celsius(t),
            40..=60 => 29.5,
            61..=89 => breathing_celsius(t),
            95 => 900.0,
            90..=109 => breathing_celsius(t),
            _ => 22.0,
        };

        if t == 80 {
            println!("  >> calibration button pressed");
            requests.request_phase_threshold();
        }

        clock.set(t * 1000);
        let report = monitor.run_cycle(&mut sensor, &mut NoDelay, &clock, &mut sink);
        monitor.publish(&report, &mut panel);
    }

    println!("\nSession finished after {} cycles", monitor.cycle());
    Ok(())
}
