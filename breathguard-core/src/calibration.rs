//! Runtime threshold calibration
//!
//! A nurse presses a button with the mask on the patient (phase) or in room
//! air (presence), and the current measurement becomes the new threshold.
//!
//! ## Interrupt Boundary
//!
//! The buttons are serviced outside the control loop, typically in a GPIO
//! edge interrupt. The only thing that crosses that boundary is one atomic
//! flag per request kind:
//!
//! ```text
//! Trigger (ISR)                         Control loop
//!      │                                     │
//!  raise(): false → true ──▶ [flag] ──▶ take(): true → false
//!  (no-op if already set)                    │
//!                                       threshold = trunc(measurement)
//! ```
//!
//! Each flag behaves as a channel of capacity one. A second press while the
//! first is still pending is dropped, so a bouncing button cannot apply the
//! same calibration twice. The ISR never touches the measurement; the
//! capture happens in the loop, where the measurement is valid.
//!
//! ```rust
//! use breathguard_core::calibration::CalibrationRequests;
//!
//! static REQUESTS: CalibrationRequests = CalibrationRequests::new();
//!
//! // In the button interrupt handler
//! fn on_phase_button() {
//!     REQUESTS.request_phase_threshold();
//! }
//! # on_phase_button();
//! # assert!(REQUESTS.is_pending(breathguard_core::ThresholdKind::Phase));
//! ```

use core::sync::atomic::{AtomicBool, Ordering};

use heapless::Vec;

use crate::phase::PhaseStateMachine;
use crate::presence::PresenceDetector;

/// Which threshold a calibration targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ThresholdKind {
    /// Presence threshold
    Presence,
    /// Phase threshold
    Phase,
}

impl ThresholdKind {
    /// Name for status output
    pub const fn name(&self) -> &'static str {
        match self {
            ThresholdKind::Presence => "presence",
            ThresholdKind::Phase => "phase",
        }
    }
}

/// "Threshold changed" event, present in exactly one cycle report
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThresholdChange {
    /// Threshold that was replaced
    pub kind: ThresholdKind,
    /// Newly installed value
    pub value: f32,
}

/// Threshold changes from one cycle (at most one per kind)
pub type ThresholdChanges = Vec<ThresholdChange, 2>;

/// One-shot request flag shared with an interrupt
#[derive(Debug, Default)]
pub struct OneShotFlag {
    pending: AtomicBool,
}

impl OneShotFlag {
    /// Cleared flag, usable in a `static`
    pub const fn new() -> Self {
        Self { pending: AtomicBool::new(false) }
    }

    /// Producer side: set if not already set
    ///
    /// Returns `false` when a previous request is still pending.
    pub fn raise(&self) -> bool {
        self.pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Consumer side: read and clear
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    /// Whether a request is waiting
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }
}

/// The two calibration request flags
#[derive(Debug, Default)]
pub struct CalibrationRequests {
    presence: OneShotFlag,
    phase: OneShotFlag,
}

impl CalibrationRequests {
    /// No requests pending, usable in a `static`
    pub const fn new() -> Self {
        Self {
            presence: OneShotFlag::new(),
            phase: OneShotFlag::new(),
        }
    }

    /// Trigger: capture the next measurement as the presence threshold
    pub fn request_presence_threshold(&self) -> bool {
        self.presence.raise()
    }

    /// Trigger: capture the next measurement as the phase threshold
    pub fn request_phase_threshold(&self) -> bool {
        self.phase.raise()
    }

    /// Whether a request of `kind` is waiting
    pub fn is_pending(&self, kind: ThresholdKind) -> bool {
        self.flag(kind).is_pending()
    }

    fn flag(&self, kind: ThresholdKind) -> &OneShotFlag {
        match kind {
            ThresholdKind::Presence => &self.presence,
            ThresholdKind::Phase => &self.phase,
        }
    }
}

/// New threshold from a measurement: truncated toward zero
///
/// 91.7 becomes 91.0 and -3.2 becomes -3.0. Any finite value is accepted.
pub fn captured_threshold(measurement: f32) -> f32 {
    libm::truncf(measurement)
}

/// Consumes pending requests once per cycle
#[derive(Debug, Clone, Copy, Default)]
pub struct CalibrationController;

impl CalibrationController {
    /// Controller with no state of its own
    pub const fn new() -> Self {
        Self
    }

    /// Apply whatever requests are pending to the two state machines
    ///
    /// Flags are cleared only here, after the new threshold is installed.
    pub fn apply(
        &self,
        requests: &CalibrationRequests,
        measurement: f32,
        presence: &mut PresenceDetector,
        phase: &mut PhaseStateMachine,
    ) -> ThresholdChanges {
        let mut changes = ThresholdChanges::new();

        for kind in [ThresholdKind::Phase, ThresholdKind::Presence] {
            if !requests.flag(kind).take() {
                continue;
            }

            let value = captured_threshold(measurement);
            match kind {
                ThresholdKind::Presence => presence.set_threshold(value),
                ThresholdKind::Phase => phase.set_threshold(value),
            }
            log_info!("{} threshold calibrated to {}", kind.name(), value);

            // Capacity is one per kind, cannot overflow
            let _ = changes.push(ThresholdChange { kind, value });
        }

        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_is_one_shot() {
        let flag = OneShotFlag::new();
        assert!(flag.raise());
        assert!(!flag.raise());
        assert!(flag.take());
        assert!(!flag.take());
        assert!(flag.raise());
    }

    #[test]
    fn truncates_toward_zero() {
        assert_eq!(captured_threshold(91.7), 91.0);
        assert_eq!(captured_threshold(91.0), 91.0);
        assert_eq!(captured_threshold(-3.2), -3.0);
    }

    #[test]
    fn applies_phase_request_once() {
        let requests = CalibrationRequests::new();
        let controller = CalibrationController::new();
        let mut presence = PresenceDetector::new(80.0, 1.0);
        let mut phase = PhaseStateMachine::new(88.0, 0.5);

        assert!(requests.request_phase_threshold());
        assert!(!requests.request_phase_threshold());

        let changes = controller.apply(&requests, 91.7, &mut presence, &mut phase);
        assert_eq!(changes.as_slice(), &[ThresholdChange { kind: ThresholdKind::Phase, value: 91.0 }]);
        assert_eq!(phase.threshold(), 91.0);
        assert_eq!(presence.threshold(), 80.0);

        let changes = controller.apply(&requests, 95.0, &mut presence, &mut phase);
        assert!(changes.is_empty());
        assert_eq!(phase.threshold(), 91.0);
    }

    #[test]
    fn applies_both_kinds_in_one_cycle() {
        let requests = CalibrationRequests::new();
        let controller = CalibrationController::new();
        let mut presence = PresenceDetector::new(80.0, 1.0);
        let mut phase = PhaseStateMachine::new(88.0, 0.5);

        requests.request_presence_threshold();
        requests.request_phase_threshold();

        let changes = controller.apply(&requests, 84.3, &mut presence, &mut phase);
        assert_eq!(changes.len(), 2);
        assert_eq!(presence.threshold(), 84.0);
        assert_eq!(phase.threshold(), 84.0);
        assert!(!requests.is_pending(ThresholdKind::Presence));
        assert!(!requests.is_pending(ThresholdKind::Phase));
    }
}
