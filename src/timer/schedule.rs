//! Cancelable schedules driven by the tokio timer.
//!
//! Both schedules are armed and canceled synchronously and only touch the
//! runtime when awaited, so the state machines that own them stay usable
//! outside of a runtime. Canceling a schedule that never started or already
//! fired is a no-op.

use std::future;
use std::pin::Pin;

use tokio::time::{interval_at, sleep_until, Duration, Instant, Interval, MissedTickBehavior, Sleep};

// ============================================================================
// Ticker
// ============================================================================

/// A repeating schedule that fires once per `period` while armed.
///
/// The first tick fires one full period after [`Ticker::arm`].
#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    armed_at: Option<Instant>,
    interval: Option<Interval>,
}

impl Ticker {
    /// Creates a disarmed ticker.
    pub fn every(period: Duration) -> Self {
        Self {
            period,
            armed_at: None,
            interval: None,
        }
    }

    /// Arms the ticker. No-op if already armed.
    pub fn arm(&mut self) {
        if self.armed_at.is_none() {
            self.armed_at = Some(Instant::now());
            self.interval = None;
        }
    }

    /// Cancels all pending ticks.
    pub fn cancel(&mut self) {
        self.armed_at = None;
        self.interval = None;
    }

    /// Returns true while ticks are scheduled.
    pub fn is_armed(&self) -> bool {
        self.armed_at.is_some()
    }

    /// Waits for the next tick. Pends forever while disarmed.
    ///
    /// Cancel safe: dropping the future does not lose the schedule.
    pub async fn tick(&mut self) {
        let Some(armed_at) = self.armed_at else {
            return future::pending().await;
        };
        let period = self.period;
        let interval = self.interval.get_or_insert_with(|| {
            let mut interval = interval_at(armed_at + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            interval
        });
        interval.tick().await;
    }
}

// ============================================================================
// Deadline
// ============================================================================

/// A one-shot schedule that fires once, `after` the moment it was armed.
#[derive(Debug)]
pub struct Deadline {
    after: Duration,
    at: Option<Instant>,
    sleep: Option<Pin<Box<Sleep>>>,
}

impl Deadline {
    /// Creates a disarmed deadline.
    pub fn after(after: Duration) -> Self {
        Self {
            after,
            at: None,
            sleep: None,
        }
    }

    /// Arms (or re-arms) the deadline starting now.
    pub fn arm(&mut self) {
        self.at = Some(Instant::now() + self.after);
        self.sleep = None;
    }

    /// Cancels the deadline.
    pub fn cancel(&mut self) {
        self.at = None;
        self.sleep = None;
    }

    /// Returns true while the deadline is pending.
    pub fn is_armed(&self) -> bool {
        self.at.is_some()
    }

    /// Waits for the deadline, then disarms it. Pends forever while disarmed.
    pub async fn elapsed(&mut self) {
        let Some(at) = self.at else {
            return future::pending().await;
        };
        self.sleep
            .get_or_insert_with(|| Box::pin(sleep_until(at)))
            .as_mut()
            .await;
        self.cancel();
    }
}

// ============================================================================
// Tests
// ============================================================================
