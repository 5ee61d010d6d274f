//! Breath phase state machine
//!
//! Exhaled air is warmer than inhaled air, so with a patient present the
//! mask temperature swings around a phase threshold. The bands are
//! asymmetric: exhale must clear the threshold by the hysteresis margin,
//! inhale only has to drop back below it.
//!
//! ```text
//!   Inhale ──(m - hyst > threshold)──▶ Exhale
//!   Exhale ──(m < threshold)─────────▶ Inhale
//! ```
//!
//! Only meaningful while the patient is present. On every new patient the
//! monitor seeds the machine from the arrival measurement, which starts it in
//! `Exhale` without counting an exhale start when the first reading is
//! already warm.

/// Respiratory half-cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BreathPhase {
    /// Cooler air at the sensor
    #[default]
    Inhale,
    /// Warmer air at the sensor
    Exhale,
}

impl BreathPhase {
    /// Lowercase name for status output
    pub const fn name(&self) -> &'static str {
        match self {
            BreathPhase::Inhale => "inhale",
            BreathPhase::Exhale => "exhale",
        }
    }
}

/// A recorded phase change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTransition {
    /// Phase before this cycle
    pub from: BreathPhase,
    /// Phase after this cycle
    pub to: BreathPhase,
}

impl PhaseTransition {
    /// `Inhale -> Exhale`, the edge breathing rate is counted on
    pub const fn is_exhale_start(&self) -> bool {
        matches!(self.to, BreathPhase::Exhale)
    }
}

/// Phase detector with threshold hysteresis
#[derive(Debug, Clone)]
pub struct PhaseStateMachine {
    threshold: f32,
    hysteresis: f32,
    phase: BreathPhase,
}

impl PhaseStateMachine {
    /// Start in `Inhale`
    pub fn new(threshold: f32, hysteresis: f32) -> Self {
        Self {
            threshold,
            hysteresis: hysteresis.abs(),
            phase: BreathPhase::Inhale,
        }
    }

    /// Current phase
    pub fn phase(&self) -> BreathPhase {
        self.phase
    }

    /// Current threshold
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Install a new threshold (calibration). Phase is kept.
    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = threshold;
    }

    /// Back to the initial `Inhale` state (new patient)
    pub fn reset(&mut self) {
        self.phase = BreathPhase::Inhale;
    }

    /// Reset and take the phase the first measurement of a new patient is in
    ///
    /// Never reports a transition: the arrival reading is not an exhale start.
    pub fn seed(&mut self, measurement: f32) -> BreathPhase {
        self.reset();
        if measurement - self.hysteresis > self.threshold {
            self.phase = BreathPhase::Exhale;
        }
        self.phase
    }

    /// Feed one averaged measurement
    ///
    /// Returns the transition if the phase changed this cycle.
    pub fn update(&mut self, measurement: f32) -> Option<PhaseTransition> {
        let next = match self.phase {
            BreathPhase::Inhale if measurement - self.hysteresis > self.threshold => BreathPhase::Exhale,
            BreathPhase::Exhale if measurement < self.threshold => BreathPhase::Inhale,
            _ => return None,
        };

        let transition = PhaseTransition { from: self.phase, to: next };
        self.phase = next;
        Some(transition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhale_needs_margin() {
        let mut phase = PhaseStateMachine::new(88.0, 0.5);
        assert_eq!(phase.update(88.5), None);
        let transition = phase.update(88.6).unwrap();
        assert!(transition.is_exhale_start());
        assert_eq!(transition.from, BreathPhase::Inhale);
        assert_eq!(phase.phase(), BreathPhase::Exhale);
    }

    #[test]
    fn inhale_below_threshold() {
        let mut phase = PhaseStateMachine::new(88.0, 0.5);
        phase.update(90.0);

        // Between threshold and threshold + hysteresis: stay in exhale
        assert_eq!(phase.update(88.2), None);
        assert_eq!(phase.update(88.0), None);

        let transition = phase.update(87.9).unwrap();
        assert_eq!(transition, PhaseTransition { from: BreathPhase::Exhale, to: BreathPhase::Inhale });
        assert!(!transition.is_exhale_start());
    }

    #[test]
    fn steady_phase_reports_nothing() {
        let mut phase = PhaseStateMachine::new(88.0, 0.5);
        for _ in 0..5 {
            assert_eq!(phase.update(85.0), None);
        }
        phase.update(92.0);
        for _ in 0..5 {
            assert_eq!(phase.update(93.0), None);
        }
    }

    #[test]
    fn reset_returns_to_inhale() {
        let mut phase = PhaseStateMachine::new(88.0, 0.5);
        phase.update(92.0);
        phase.reset();
        assert_eq!(phase.phase(), BreathPhase::Inhale);
    }

    #[test]
    fn seed_takes_arrival_phase_silently() {
        let mut phase = PhaseStateMachine::new(88.0, 0.5);
        assert_eq!(phase.seed(92.0), BreathPhase::Exhale);

        // Already exhaling: staying warm is not a transition
        assert_eq!(phase.update(93.0), None);
        assert!(!phase.update(80.0).unwrap().is_exhale_start());

        // Inside the exhale margin the seed stays in inhale
        assert_eq!(phase.seed(88.5), BreathPhase::Inhale);
        assert_eq!(phase.seed(80.0), BreathPhase::Inhale);
    }
}
