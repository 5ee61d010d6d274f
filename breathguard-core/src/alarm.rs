//! Stuck-phase alarm timer
//!
//! Tracks when the last two phase transitions happened. While the patient is
//! present, the alarm is raised once more than `alarm_delay_secs` have passed
//! since the earlier of the two, so the window spans the previous half-breath
//! plus the current one. Any transition clears it at once. There is no
//! timeout: an alarm stays up until breathing resumes or the patient leaves.

use crate::time::{elapsed_secs, Seconds};

/// Phase timing and alarm state
#[derive(Debug, Clone)]
pub struct AlarmTimer {
    delay_secs: Seconds,
    phase_start: Seconds,
    phase_prev_start: Seconds,
    active: bool,
}

impl AlarmTimer {
    /// Timer raising after `delay_secs` without a phase change
    pub fn new(delay_secs: Seconds) -> Self {
        Self {
            delay_secs,
            phase_start: 0,
            phase_prev_start: 0,
            active: false,
        }
    }

    /// Whether the alarm is raised
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Start of the current phase
    pub fn phase_start(&self) -> Seconds {
        self.phase_start
    }

    /// Start of the phase before it
    pub fn phase_prev_start(&self) -> Seconds {
        self.phase_prev_start
    }

    /// New patient: both phase marks at `now`, alarm cleared
    pub fn reset(&mut self, now: Seconds) {
        self.phase_start = now;
        self.phase_prev_start = now;
        self.active = false;
    }

    /// Patient gone or outputs suppressed
    pub fn clear(&mut self) {
        self.active = false;
    }

    /// A phase transition happened at `now`
    pub fn on_transition(&mut self, now: Seconds) {
        self.active = false;
        self.phase_prev_start = self.phase_start;
        self.phase_start = now;
    }

    /// Per-cycle duration check
    ///
    /// `transitioned` is whether the phase changed this cycle; a transition
    /// always wins over the timer. Returns `true` on the cycle the alarm is
    /// first raised.
    pub fn check(&mut self, now: Seconds, transitioned: bool) -> bool {
        if transitioned || self.active {
            return false;
        }

        if elapsed_secs(self.phase_prev_start, now) > self.delay_secs {
            self.active = true;
            log_warn!("no phase change for {}s, alarm raised", now.saturating_sub(self.phase_prev_start));
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raises_after_delay() {
        let mut alarm = AlarmTimer::new(15);
        alarm.reset(100);

        assert!(!alarm.check(115, false));
        assert!(!alarm.is_active());

        assert!(alarm.check(116, false));
        assert!(alarm.is_active());

        // Already raised, not reported again
        assert!(!alarm.check(117, false));
        assert!(alarm.is_active());
    }

    #[test]
    fn transition_clears() {
        let mut alarm = AlarmTimer::new(15);
        alarm.reset(0);
        alarm.check(20, false);
        assert!(alarm.is_active());

        alarm.on_transition(21);
        assert!(!alarm.is_active());
        assert!(!alarm.check(21, true));
        assert!(!alarm.is_active());
    }

    #[test]
    fn window_spans_two_phases() {
        let mut alarm = AlarmTimer::new(15);
        alarm.reset(0);
        alarm.on_transition(10);
        alarm.on_transition(14);
        assert_eq!(alarm.phase_prev_start(), 10);
        assert_eq!(alarm.phase_start(), 14);

        // 16s since the earlier transition even though the current phase is 12s old
        assert!(alarm.check(26, false));
    }

    #[test]
    fn regular_breathing_never_alarms() {
        let mut alarm = AlarmTimer::new(15);
        alarm.reset(0);
        for t in (2..120).step_by(2) {
            alarm.on_transition(t);
            assert!(!alarm.check(t, true));
            assert!(!alarm.check(t + 1, false));
        }
        assert!(!alarm.is_active());
    }
}
