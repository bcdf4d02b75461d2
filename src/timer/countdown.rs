//! Countdown clock for a single session.
//!
//! The countdown owns the remaining seconds, the running flag and the
//! once-per-second tick schedule. Completion is reported exactly once, by the
//! tick that takes the remaining time to zero.

use tokio::time::Duration;
use tracing::debug;

use super::schedule::Ticker;
use crate::types::CountdownState;

/// Period of the countdown tick.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Outcome of a single countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The countdown was not running; nothing changed.
    Idle,
    /// One second elapsed.
    Ticked {
        /// Remaining seconds after the tick
        remaining_seconds: u32,
    },
    /// The countdown reached zero and stopped.
    Completed,
}

/// Countdown timer for the active session.
#[derive(Debug)]
pub struct Countdown {
    /// Duration restored by `reset`
    initial_seconds: u32,
    /// Remaining seconds in the session
    seconds_remaining: u32,
    /// Whether the countdown is running
    is_running: bool,
    /// Per-second schedule, armed only while running
    ticker: Ticker,
}

impl Countdown {
    /// Creates a paused countdown for `seconds`.
    pub fn new(seconds: u32) -> Self {
        Self {
            initial_seconds: seconds,
            seconds_remaining: seconds,
            is_running: false,
            ticker: Ticker::every(TICK_PERIOD),
        }
    }

    /// Starts counting down from the current remaining time.
    ///
    /// Returns true if the countdown transitioned to running. Starting an
    /// already running countdown, or one with no time left, does nothing.
    pub fn start(&mut self) -> bool {
        if self.is_running || self.seconds_remaining == 0 {
            return false;
        }
        self.is_running = true;
        self.ticker.arm();
        debug!("Countdown started at {}s", self.seconds_remaining);
        true
    }

    /// Pauses the countdown, keeping the remaining time.
    ///
    /// Returns true if the countdown transitioned to paused.
    pub fn pause(&mut self) -> bool {
        if !self.is_running {
            return false;
        }
        self.stop_ticking();
        debug!("Countdown paused at {}s", self.seconds_remaining);
        true
    }

    /// Stops and restores the duration given at construction or by the last
    /// `set_time`.
    pub fn reset(&mut self) {
        self.stop_ticking();
        self.seconds_remaining = self.initial_seconds;
    }

    /// Stops and retargets the countdown to `seconds`.
    pub fn set_time(&mut self, seconds: u32) {
        self.stop_ticking();
        self.initial_seconds = seconds;
        self.seconds_remaining = seconds;
    }

    /// Applies one elapsed second.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_running || self.seconds_remaining == 0 {
            return TickOutcome::Idle;
        }

        self.seconds_remaining -= 1;

        if self.seconds_remaining == 0 {
            self.stop_ticking();
            debug!("Countdown completed");
            return TickOutcome::Completed;
        }

        TickOutcome::Ticked {
            remaining_seconds: self.seconds_remaining,
        }
    }

    /// Waits until the next scheduled tick. Pends forever while stopped.
    pub async fn next_tick(&mut self) {
        self.ticker.tick().await;
    }

    /// Cancels the tick schedule. The countdown is stopped afterwards.
    pub fn dispose(&mut self) {
        self.stop_ticking();
    }

    /// Returns the remaining seconds.
    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    /// Returns the duration restored by `reset`.
    pub fn initial_seconds(&self) -> u32 {
        self.initial_seconds
    }

    /// Returns the elapsed share of this countdown as a percentage.
    ///
    /// Measured against `initial_seconds`, not the configured duration.
    pub fn progress(&self) -> f64 {
        if self.initial_seconds == 0 {
            return 0.0;
        }
        let elapsed = f64::from(self.initial_seconds) - f64::from(self.seconds_remaining);
        (elapsed / f64::from(self.initial_seconds) * 100.0).clamp(0.0, 100.0)
    }

    /// Returns true while the countdown is running.
    pub fn is_running(&self) -> bool {
        self.is_running
    }

    /// Returns a snapshot of the countdown.
    pub fn state(&self) -> CountdownState {
        CountdownState {
            seconds_remaining: self.seconds_remaining,
            is_running: self.is_running,
        }
    }

    fn stop_ticking(&mut self) {
        self.is_running = false;
        self.ticker.cancel();
    }
}

// ============================================================================
// Tests
// ============================================================================
