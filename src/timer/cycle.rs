//! Work/break cycle state machine.
//!
//! The cycle decides which mode is active and which mode follows a completed
//! session:
//! - work → short break, or long break after every fourth work session
//! - any break → work
//! - a disabled (0-second) break is skipped straight back to work
//!
//! Every transition returns a [`ModeChange`] carrying the new mode and its
//! configured duration, which the caller uses to retarget the countdown.

use tracing::debug;

use super::error::CycleError;
use crate::types::{CycleState, TimerDurations, TimerMode, LONG_BREAK_INTERVAL};

/// Number of slots in the session indicator.
pub const SESSION_SLOTS: usize = LONG_BREAK_INTERVAL as usize;

/// Emitted on every mode transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeChange {
    /// The mode that is now active
    pub mode: TimerMode,
    /// Configured duration of that mode in seconds
    pub duration: u32,
}

/// Result of completing the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionCompletion {
    /// The mode whose session just finished
    pub finished: TimerMode,
    /// Configured duration of the finished session in seconds
    pub finished_duration: u32,
    /// The transition into the next session
    pub next: ModeChange,
}

/// The Pomodoro interval cycle.
#[derive(Debug, Clone)]
pub struct PomodoroCycle {
    state: CycleState,
    durations: TimerDurations,
}

impl PomodoroCycle {
    /// Creates a cycle in work mode with no completed sessions.
    pub fn new(durations: TimerDurations) -> Self {
        Self {
            state: CycleState::default(),
            durations,
        }
    }

    /// Switches to `target` without touching the session count.
    ///
    /// # Errors
    ///
    /// Returns `CycleError::ModeDisabled` if `target` is a break with a
    /// duration of 0. The current mode is left unchanged.
    pub fn switch_mode(&mut self, target: TimerMode) -> Result<ModeChange, CycleError> {
        if self.durations.is_disabled(target) {
            return Err(CycleError::ModeDisabled(target));
        }
        Ok(self.enter(target))
    }

    /// Completes the active session and moves to the next one.
    pub fn complete_current_session(&mut self) -> SessionCompletion {
        let finished = self.state.current_mode;
        let finished_duration = self.current_duration();

        let next_mode = match finished {
            TimerMode::Work => {
                self.state.work_sessions_completed += 1;
                let candidate = if self.state.work_sessions_completed % LONG_BREAK_INTERVAL == 0 {
                    TimerMode::LongBreak
                } else {
                    TimerMode::ShortBreak
                };
                if self.durations.is_disabled(candidate) {
                    debug!("{} is disabled, skipping to work", candidate);
                    TimerMode::Work
                } else {
                    candidate
                }
            }
            TimerMode::ShortBreak | TimerMode::LongBreak => TimerMode::Work,
        };

        SessionCompletion {
            finished,
            finished_duration,
            next: self.enter(next_mode),
        }
    }

    /// Clears the session count and returns to work.
    pub fn reset_cycle(&mut self) -> ModeChange {
        self.state.work_sessions_completed = 0;
        self.enter(TimerMode::Work)
    }

    /// Replaces the configured durations.
    ///
    /// Returns the active mode with its new duration if that duration
    /// changed. A newly disabled active break stays active; see
    /// [`leave_disabled_mode`](Self::leave_disabled_mode).
    pub fn set_durations(&mut self, durations: TimerDurations) -> Option<ModeChange> {
        let mode = self.state.current_mode;
        let changed = self.durations.get(mode) != durations.get(mode);
        self.durations = durations;
        changed.then(|| ModeChange {
            mode,
            duration: durations.get(mode),
        })
    }

    /// Returns to work if the active break has been disabled.
    pub fn leave_disabled_mode(&mut self) -> Option<ModeChange> {
        let mode = self.state.current_mode;
        if !self.durations.is_disabled(mode) {
            return None;
        }
        debug!("{} is disabled, returning to work", mode);
        Some(self.enter(TimerMode::Work))
    }

    /// Returns the configured duration of the active mode.
    pub fn current_duration(&self) -> u32 {
        self.durations.get(self.state.current_mode)
    }

    /// Returns the elapsed share of the active session as a percentage.
    ///
    /// Returns 0 when the active mode has no duration and clamps to
    /// `0.0..=100.0`.
    pub fn progress(&self, seconds_remaining: u32) -> f64 {
        let total = self.current_duration();
        if total == 0 {
            return 0.0;
        }
        let elapsed = f64::from(total) - f64::from(seconds_remaining);
        (elapsed / f64::from(total) * 100.0).clamp(0.0, 100.0)
    }

    /// Returns whether indicator slot `slot` (1-based) is lit.
    ///
    /// A positive multiple of four lights every slot.
    pub fn is_slot_filled(&self, slot: u32) -> bool {
        let completed = self.state.work_sessions_completed;
        let in_cycle = completed % LONG_BREAK_INTERVAL;
        slot <= in_cycle || (in_cycle == 0 && completed > 0)
    }

    /// Returns the lit state of all indicator slots.
    pub fn filled_slots(&self) -> [bool; SESSION_SLOTS] {
        let mut slots = [false; SESSION_SLOTS];
        for (index, slot) in slots.iter_mut().enumerate() {
            *slot = self.is_slot_filled(index as u32 + 1);
        }
        slots
    }

    pub fn current_mode(&self) -> TimerMode {
        self.state.current_mode
    }

    pub fn work_sessions_completed(&self) -> u32 {
        self.state.work_sessions_completed
    }

    pub fn durations(&self) -> &TimerDurations {
        &self.durations
    }

    /// Returns a snapshot of the cycle.
    pub fn state(&self) -> CycleState {
        self.state
    }

    fn enter(&mut self, mode: TimerMode) -> ModeChange {
        self.state.current_mode = mode;
        let duration = self.durations.get(mode);
        debug!("Mode changed to {} ({}s)", mode, duration);
        ModeChange { mode, duration }
    }
}

impl Default for PomodoroCycle {
    fn default() -> Self {
        Self::new(TimerDurations::default())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_and_get_mode(cycle: &mut PomodoroCycle) -> TimerMode {
        cycle.complete_current_session().next.mode
    }

    // ------------------------------------------------------------------------
    // Transition Tests
    // ------------------------------------------------------------------------

    mod transition_tests {
        use super::*;

        #[test]
        fn test_initial_state() {
            let cycle = PomodoroCycle::default();
            assert_eq!(cycle.current_mode(), TimerMode::Work);
            assert_eq!(cycle.work_sessions_completed(), 0);
            assert_eq!(cycle.current_duration(), 1500);
        }

        #[test]
        fn test_four_sessions_end_in_long_break() {
            let mut cycle = PomodoroCycle::default();
            let mut modes = vec![cycle.current_mode()];
            for _ in 0..7 {
                modes.push(complete_and_get_mode(&mut cycle));
            }

            assert_eq!(
                modes,
                vec![
                    TimerMode::Work,
                    TimerMode::ShortBreak,
                    TimerMode::Work,
                    TimerMode::ShortBreak,
                    TimerMode::Work,
                    TimerMode::ShortBreak,
                    TimerMode::Work,
                    TimerMode::LongBreak,
                ]
            );
            assert_eq!(cycle.work_sessions_completed(), 4);
        }

        #[test]
        fn test_long_break_at_multiples_of_4() {
            let mut cycle = PomodoroCycle::default();
            for count in 1..=12u32 {
                let next = complete_and_get_mode(&mut cycle);
                let expected = if count % 4 == 0 {
                    TimerMode::LongBreak
                } else {
                    TimerMode::ShortBreak
                };
                assert_eq!(next, expected, "after work session {}", count);
                assert_eq!(complete_and_get_mode(&mut cycle), TimerMode::Work);
            }
        }

        #[test]
        fn test_completion_carries_finished_mode_and_duration() {
            let mut cycle = PomodoroCycle::default();
            let completion = cycle.complete_current_session();

            assert_eq!(completion.finished, TimerMode::Work);
            assert_eq!(completion.finished_duration, 1500);
            assert_eq!(
                completion.next,
                ModeChange {
                    mode: TimerMode::ShortBreak,
                    duration: 300
                }
            );
        }

        #[test]
        fn test_break_completion_does_not_count() {
            let mut cycle = PomodoroCycle::default();
            cycle.switch_mode(TimerMode::ShortBreak).unwrap();
            cycle.complete_current_session();

            assert_eq!(cycle.current_mode(), TimerMode::Work);
            assert_eq!(cycle.work_sessions_completed(), 0);
        }

        #[test]
        fn test_disabled_long_break_returns_to_work() {
            let durations = TimerDurations::default().with_long_break_minutes(0);
            let mut cycle = PomodoroCycle::new(durations);

            for _ in 0..3 {
                assert_eq!(complete_and_get_mode(&mut cycle), TimerMode::ShortBreak);
                assert_eq!(complete_and_get_mode(&mut cycle), TimerMode::Work);
            }

            let completion = cycle.complete_current_session();
            assert_eq!(completion.next.mode, TimerMode::Work);
            assert_eq!(completion.next.duration, 1500);
            assert_eq!(cycle.work_sessions_completed(), 4);
        }

        #[test]
        fn test_disabled_short_break_returns_to_work() {
            let durations = TimerDurations::default().with_short_break_minutes(0);
            let mut cycle = PomodoroCycle::new(durations);

            assert_eq!(complete_and_get_mode(&mut cycle), TimerMode::Work);
            assert_eq!(complete_and_get_mode(&mut cycle), TimerMode::Work);
            assert_eq!(complete_and_get_mode(&mut cycle), TimerMode::Work);
            assert_eq!(complete_and_get_mode(&mut cycle), TimerMode::LongBreak);
        }

        #[test]
        fn test_reset_cycle() {
            let mut cycle = PomodoroCycle::default();
            cycle.complete_current_session();
            cycle.complete_current_session();
            cycle.complete_current_session();

            let change = cycle.reset_cycle();

            assert_eq!(change.mode, TimerMode::Work);
            assert_eq!(change.duration, 1500);
            assert_eq!(cycle.work_sessions_completed(), 0);
        }
    }

    // ------------------------------------------------------------------------
    // Switch Mode Tests
    // ------------------------------------------------------------------------

    mod switch_mode_tests {
        use super::*;

        #[test]
        fn test_switch_emits_target_duration() {
            let mut cycle = PomodoroCycle::default();
            let change = cycle.switch_mode(TimerMode::LongBreak).unwrap();

            assert_eq!(
                change,
                ModeChange {
                    mode: TimerMode::LongBreak,
                    duration: 900
                }
            );
            assert_eq!(cycle.current_mode(), TimerMode::LongBreak);
        }

        #[test]
        fn test_switch_keeps_session_count() {
            let mut cycle = PomodoroCycle::default();
            cycle.complete_current_session();
            cycle.switch_mode(TimerMode::Work).unwrap();
            cycle.switch_mode(TimerMode::LongBreak).unwrap();

            assert_eq!(cycle.work_sessions_completed(), 1);
        }

        #[test]
        fn test_switch_into_disabled_break_is_rejected() {
            let durations = TimerDurations::default().with_short_break_minutes(0);
            let mut cycle = PomodoroCycle::new(durations);

            let result = cycle.switch_mode(TimerMode::ShortBreak);

            assert_eq!(result, Err(CycleError::ModeDisabled(TimerMode::ShortBreak)));
            assert_eq!(cycle.current_mode(), TimerMode::Work);
        }
    }

    // ------------------------------------------------------------------------
    // Durations Tests
    // ------------------------------------------------------------------------

    mod durations_tests {
        use super::*;

        #[test]
        fn test_set_durations_reports_active_change() {
            let mut cycle = PomodoroCycle::default();
            let change = cycle.set_durations(TimerDurations::default().with_work_minutes(50));

            assert_eq!(
                change,
                Some(ModeChange {
                    mode: TimerMode::Work,
                    duration: 3000
                })
            );
            assert_eq!(cycle.current_duration(), 3000);
        }

        #[test]
        fn test_set_durations_ignores_inactive_change() {
            let mut cycle = PomodoroCycle::default();
            let change =
                cycle.set_durations(TimerDurations::default().with_long_break_minutes(20));

            assert_eq!(change, None);
            assert_eq!(cycle.durations().long_break, 1200);
        }

        #[test]
        fn test_disabled_active_break_returns_to_work() {
            let mut cycle = PomodoroCycle::default();
            cycle.switch_mode(TimerMode::ShortBreak).unwrap();

            let change =
                cycle.set_durations(TimerDurations::default().with_short_break_minutes(0));
            assert_eq!(
                change,
                Some(ModeChange {
                    mode: TimerMode::ShortBreak,
                    duration: 0
                })
            );

            assert_eq!(
                cycle.leave_disabled_mode(),
                Some(ModeChange {
                    mode: TimerMode::Work,
                    duration: 1500
                })
            );
            assert_eq!(cycle.current_mode(), TimerMode::Work);
            assert_eq!(cycle.leave_disabled_mode(), None);
        }

        #[test]
        fn test_leave_disabled_mode_keeps_enabled_modes() {
            let durations = TimerDurations::default().with_long_break_minutes(0);
            let mut cycle = PomodoroCycle::new(durations);
            assert_eq!(cycle.leave_disabled_mode(), None);

            cycle.switch_mode(TimerMode::ShortBreak).unwrap();
            assert_eq!(cycle.leave_disabled_mode(), None);
            assert_eq!(cycle.current_mode(), TimerMode::ShortBreak);
        }
    }

    // ------------------------------------------------------------------------
    // Progress Tests
    // ------------------------------------------------------------------------

    mod progress_tests {
        use super::*;

        #[test]
        fn test_progress_bounds() {
            let cycle = PomodoroCycle::default();
            assert_eq!(cycle.progress(1500), 0.0);
            assert_eq!(cycle.progress(750), 50.0);
            assert_eq!(cycle.progress(0), 100.0);
        }

        #[test]
        fn test_progress_is_monotonic() {
            let cycle = PomodoroCycle::default();
            let mut last = -1.0;
            for remaining in (0..=1500).rev() {
                let progress = cycle.progress(remaining);
                assert!(progress >= last);
                last = progress;
            }
        }

        #[test]
        fn test_progress_with_zero_duration() {
            let durations = TimerDurations {
                work: 0,
                short_break: 300,
                long_break: 900,
            };
            let cycle = PomodoroCycle::new(durations);
            let progress = cycle.progress(0);
            assert_eq!(progress, 0.0);
            assert!(!progress.is_nan());
        }

        #[test]
        fn test_progress_clamps_overlong_remaining() {
            let cycle = PomodoroCycle::default();
            assert_eq!(cycle.progress(3000), 0.0);
        }
    }

    // ------------------------------------------------------------------------
    // Session Slot Tests
    // ------------------------------------------------------------------------

    mod slot_tests {
        use super::*;

        fn cycle_with_completed(count: u32) -> PomodoroCycle {
            let mut cycle = PomodoroCycle::default();
            while cycle.work_sessions_completed() < count {
                cycle.complete_current_session();
            }
            cycle
        }

        #[test]
        fn test_no_slots_initially() {
            assert_eq!(cycle_with_completed(0).filled_slots(), [false; 4]);
        }

        #[test]
        fn test_partial_slots() {
            assert_eq!(
                cycle_with_completed(3).filled_slots(),
                [true, true, true, false]
            );
            assert_eq!(
                cycle_with_completed(5).filled_slots(),
                [true, false, false, false]
            );
        }

        #[test]
        fn test_multiple_of_four_lights_all() {
            assert_eq!(cycle_with_completed(4).filled_slots(), [true; 4]);
            assert_eq!(cycle_with_completed(8).filled_slots(), [true; 4]);
        }
    }
}
