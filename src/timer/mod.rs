//! Timer module for the Pomodoro Timer.
//!
//! This module contains the state machines behind a session:
//! - `countdown`: per-session countdown clock
//! - `cycle`: work/short-break/long-break sequencing
//! - `rollover`: cancelable delay between automatic transitions
//! - `schedule`: cancelable tick and deadline schedules

pub mod countdown;
pub mod cycle;
pub mod error;
pub mod rollover;
pub mod schedule;

pub use countdown::{Countdown, TickOutcome, TICK_PERIOD};
pub use cycle::{ModeChange, PomodoroCycle, SessionCompletion, SESSION_SLOTS};
pub use error::CycleError;
pub use rollover::{AutoRollover, RolloverStep, TransitionStart, DEFAULT_ROLLOVER_DELAY};
pub use schedule::{Deadline, Ticker};
