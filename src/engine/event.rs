//! Commands accepted by the session engine and the events it emits.

use crate::store::StatsSummary;
use crate::timer::SESSION_SLOTS;
use crate::types::{
    AppSettings, CountdownState, CycleState, DailyStatRecord, RolloverState, SettingsPatch,
    TimerMode,
};

// ============================================================================
// Command
// ============================================================================

/// User commands, processed one at a time in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start or resume the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Start/pause shortcut; ignored while a rollover is pending
    Toggle,
    /// Restore the active session's full duration
    Reset,
    /// Switch to another mode
    SwitchMode(TimerMode),
    /// Change one mode's duration, keeping the others
    SetDuration {
        mode: TimerMode,
        seconds: u32,
    },
    /// Merge a partial settings update
    UpdateSettings(SettingsPatch),
    /// Restore default settings
    ResetSettings,
    /// Cancel a pending automatic start
    CancelRollover,
    /// Request a [`SessionEvent::Snapshot`]
    Status,
    /// Request a [`SessionEvent::Stats`]
    Stats,
    /// Stop the engine
    Shutdown,
}

// ============================================================================
// SessionEvent
// ============================================================================

/// State changes reported by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Countdown started or resumed
    Started {
        mode: TimerMode,
        remaining: u32,
    },
    /// Countdown paused
    Paused {
        remaining: u32,
    },
    /// One second elapsed
    Tick {
        remaining: u32,
    },
    /// Countdown restored to the full duration
    Reset {
        remaining: u32,
    },
    /// Active mode changed, or its duration was retargeted
    ModeChanged {
        mode: TimerMode,
        duration: u32,
    },
    /// A session ran to completion
    SessionCompleted {
        /// The mode that finished
        mode: TimerMode,
        work_sessions_completed: u32,
    },
    /// The next session starts automatically after the delay
    RolloverStarted {
        next_mode: TimerMode,
        seconds: u32,
    },
    /// One second of the rollover delay elapsed
    RolloverTick {
        seconds_remaining: u32,
    },
    /// A pending rollover was canceled
    RolloverCanceled,
    /// Settings were updated or reset
    SettingsChanged(AppSettings),
    /// Reply to [`Command::Status`]
    Snapshot(EngineSnapshot),
    /// Reply to [`Command::Stats`]
    Stats(StatsReport),
    /// A command could not be applied
    Rejected {
        reason: String,
    },
}

// ============================================================================
// Snapshots
// ============================================================================

/// Full engine state at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSnapshot {
    pub countdown: CountdownState,
    pub cycle: CycleState,
    pub rollover: RolloverState,
    /// Elapsed share of the active session, 0 to 100
    pub progress: f64,
    /// Session indicator slots
    pub filled_slots: [bool; SESSION_SLOTS],
    /// Duration of the active mode in seconds
    pub duration: u32,
    pub settings: AppSettings,
}

/// Retained statistics and their totals.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsReport {
    pub records: Vec<DailyStatRecord>,
    pub summary: StatsSummary,
}
