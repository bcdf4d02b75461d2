//! Auto-rollover delay between sessions.
//!
//! When enabled, a short cancelable countdown (3 seconds by default) runs
//! between one session's completion and the automatic start of the next.
//! Completion is driven by a per-second tick, with a hard deadline of the
//! full delay as a fallback in case ticks are starved. Whichever fires
//! first completes the transition; the other is canceled with it.

use tokio::time::Duration;
use tracing::debug;

use super::schedule::{Deadline, Ticker};
use crate::types::RolloverState;

/// Default delay before the next session starts, in seconds.
pub const DEFAULT_ROLLOVER_DELAY: u32 = 3;

/// What happened when a transition was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionStart {
    /// The delay is disabled; the transition completed immediately.
    Completed,
    /// The countdown is running.
    Pending {
        /// Seconds until the next session starts
        seconds: u32,
    },
}

/// Outcome of a scheduled rollover wake-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RolloverStep {
    /// No transition is active; nothing changed.
    Idle,
    /// One second elapsed.
    Ticked {
        /// Seconds until the next session starts
        seconds_remaining: u32,
    },
    /// The transition completed. Reported once per transition.
    Completed,
}

/// Which schedule woke the rollover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RolloverWake {
    Tick,
    Deadline,
}

/// The cancelable delay between automatic session transitions.
#[derive(Debug)]
pub struct AutoRollover {
    enabled: bool,
    delay: u32,
    is_active: bool,
    seconds_remaining: u32,
    ticker: Ticker,
    deadline: Deadline,
}

impl AutoRollover {
    /// Creates an idle rollover with a delay of `delay` seconds.
    pub fn new(enabled: bool, delay: u32) -> Self {
        Self {
            enabled,
            delay,
            is_active: false,
            seconds_remaining: delay,
            ticker: Ticker::every(Duration::from_secs(1)),
            deadline: Deadline::after(Duration::from_secs(u64::from(delay))),
        }
    }

    /// Begins a transition.
    ///
    /// With the delay disabled the transition completes immediately and no
    /// state is kept. Otherwise the countdown starts from the full delay;
    /// a transition already in progress is restarted.
    pub fn start_transition(&mut self) -> TransitionStart {
        if !self.enabled || self.delay == 0 {
            return TransitionStart::Completed;
        }

        self.ticker.cancel();
        self.is_active = true;
        self.seconds_remaining = self.delay;
        self.ticker.arm();
        self.deadline.arm();
        debug!("Rollover started ({}s)", self.delay);

        TransitionStart::Pending {
            seconds: self.delay,
        }
    }

    /// Cancels a pending transition. Its completion will never be reported.
    ///
    /// Returns true if a transition was active.
    pub fn cancel_transition(&mut self) -> bool {
        let was_active = self.is_active;
        self.cleanup();
        self.seconds_remaining = self.delay;
        if was_active {
            debug!("Rollover canceled");
        }
        was_active
    }

    /// Applies one elapsed second of the countdown.
    pub fn tick(&mut self) -> RolloverStep {
        if !self.is_active {
            return RolloverStep::Idle;
        }
        if self.seconds_remaining <= 1 {
            self.seconds_remaining = 0;
            self.finish();
            return RolloverStep::Completed;
        }
        self.seconds_remaining -= 1;
        RolloverStep::Ticked {
            seconds_remaining: self.seconds_remaining,
        }
    }

    /// Applies the fallback deadline.
    pub fn deadline_elapsed(&mut self) -> RolloverStep {
        if !self.is_active {
            return RolloverStep::Idle;
        }
        debug!("Rollover deadline reached before the countdown");
        self.seconds_remaining = 0;
        self.finish();
        RolloverStep::Completed
    }

    /// Waits for the tick or the deadline, whichever comes first.
    /// Pends forever while no transition is active.
    pub async fn wake(&mut self) -> RolloverWake {
        tokio::select! {
            _ = self.ticker.tick() => RolloverWake::Tick,
            _ = self.deadline.elapsed() => RolloverWake::Deadline,
        }
    }

    /// Waits for and applies the next scheduled step.
    pub async fn next_step(&mut self) -> RolloverStep {
        match self.wake().await {
            RolloverWake::Tick => self.tick(),
            RolloverWake::Deadline => self.deadline_elapsed(),
        }
    }

    /// Enables or disables the delay window. Cancels a pending transition
    /// when disabling.
    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.cancel_transition();
        }
        self.enabled = enabled;
    }

    /// Cancels all pending schedules.
    pub fn dispose(&mut self) {
        self.cleanup();
    }

    /// Returns the elapsed share of the delay as a percentage.
    pub fn progress(&self) -> f64 {
        if self.delay == 0 {
            return 0.0;
        }
        let elapsed = f64::from(self.delay.saturating_sub(self.seconds_remaining));
        elapsed / f64::from(self.delay) * 100.0
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn delay(&self) -> u32 {
        self.delay
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    /// Returns a snapshot of the rollover.
    pub fn state(&self) -> RolloverState {
        RolloverState {
            is_active: self.is_active,
            seconds_remaining: self.seconds_remaining,
        }
    }

    fn finish(&mut self) {
        self.cleanup();
        debug!("Rollover completed");
    }

    fn cleanup(&mut self) {
        self.is_active = false;
        self.ticker.cancel();
        self.deadline.cancel();
    }
}

impl Default for AutoRollover {
    fn default() -> Self {
        Self::new(true, DEFAULT_ROLLOVER_DELAY)
    }
}

// ============================================================================
// Tests
// ============================================================================
