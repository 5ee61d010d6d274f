//! Common test utilities for integration tests
//!
//! This module provides:
//! - A scripted temperature sensor fed from a queue of readings
//! - A breathing waveform generator producing one averaged value per cycle
//! - A recording status sink

#![allow(dead_code)]

use std::collections::VecDeque;

use breathguard_core::{
    calibration::ThresholdChange,
    sensor::TemperatureSensor,
    status::{Indicators, StatusRecord, StatusSink},
    TemperatureUnit,
};

/// Sensor that replays queued readings, repeating the last one when empty
pub struct ScriptedSensor {
    readings: VecDeque<f32>,
    last: f32,
    unit: TemperatureUnit,
    ambient: Option<f32>,
    pub fail_next: bool,
}

impl ScriptedSensor {
    pub fn new(unit: TemperatureUnit, initial: f32) -> Self {
        Self {
            readings: VecDeque::new(),
            last: initial,
            unit,
            ambient: None,
            fail_next: false,
        }
    }

    /// Queue `count` identical raw readings
    pub fn push_repeated(&mut self, value: f32, count: usize) {
        self.readings.extend(std::iter::repeat(value).take(count));
    }

    pub fn set_ambient(&mut self, ambient: Option<f32>) {
        self.ambient = ambient;
    }
}

impl TemperatureSensor for ScriptedSensor {
    type Error = &'static str;

    fn read_temperature(&mut self) -> nb::Result<f32, Self::Error> {
        if self.fail_next {
            self.fail_next = false;
            return Err(nb::Error::Other("bus error"));
        }
        if let Some(value) = self.readings.pop_front() {
            self.last = value;
        }
        Ok(self.last)
    }

    fn native_unit(&self) -> TemperatureUnit {
        self.unit
    }

    fn ambient_temperature(&mut self) -> Option<f32> {
        self.ambient
    }
}

/// Square-ish breathing pattern: `inhale_secs` cool, `exhale_secs` warm
pub struct BreathingPattern {
    pub inhale: f32,
    pub exhale: f32,
    pub inhale_secs: u64,
    pub exhale_secs: u64,
}

impl BreathingPattern {
    /// 4 second breath (15 bpm) in Fahrenheit
    pub fn normal_fahrenheit() -> Self {
        Self { inhale: 85.0, exhale: 92.0, inhale_secs: 2, exhale_secs: 2 }
    }

    pub fn period_secs(&self) -> u64 {
        self.inhale_secs + self.exhale_secs
    }

    /// Averaged value at a given second since the patient arrived
    pub fn value_at(&self, t: u64) -> f32 {
        if t % self.period_secs() < self.inhale_secs {
            self.inhale
        } else {
            self.exhale
        }
    }
}

/// Sink that keeps everything it was given
#[derive(Default)]
pub struct RecordingSink {
    pub statuses: Vec<StatusRecord>,
    pub indicators: Vec<Indicators>,
    pub changes: Vec<ThresholdChange>,
}

impl StatusSink for RecordingSink {
    fn publish(&mut self, status: &StatusRecord, indicators: &Indicators, changes: &[ThresholdChange]) {
        self.statuses.push(*status);
        self.indicators.push(*indicators);
        self.changes.extend_from_slice(changes);
    }
}
