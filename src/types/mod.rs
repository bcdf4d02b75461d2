//! Core data types for the Pomodoro Timer.
//!
//! This module defines the data structures used for:
//! - Timer modes and their configured durations
//! - User settings and partial settings updates
//! - Daily statistics records
//! - Read-only snapshots of the countdown, cycle and rollover state

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of work sessions between two long breaks.
pub const LONG_BREAK_INTERVAL: u32 = 4;

// ============================================================================
// TimerMode
// ============================================================================

/// Represents the kind of session the timer is counting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerMode {
    /// Focused work session
    #[default]
    Work,
    /// Short break between work sessions
    ShortBreak,
    /// Long break after every fourth work session
    LongBreak,
}

impl TimerMode {
    /// All modes in display order.
    pub const ALL: [TimerMode; 3] = [TimerMode::Work, TimerMode::ShortBreak, TimerMode::LongBreak];

    /// Returns the string representation of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Work => "work",
            TimerMode::ShortBreak => "shortBreak",
            TimerMode::LongBreak => "longBreak",
        }
    }

    /// Returns true for the two break modes.
    pub fn is_break(&self) -> bool {
        matches!(self, TimerMode::ShortBreak | TimerMode::LongBreak)
    }

    /// Returns the human-readable label of the mode.
    pub fn label(&self) -> &'static str {
        match self {
            TimerMode::Work => "作業",
            TimerMode::ShortBreak => "短い休憩",
            TimerMode::LongBreak => "長い休憩",
        }
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "work" | "w" => Ok(TimerMode::Work),
            "shortBreak" | "short" | "sb" => Ok(TimerMode::ShortBreak),
            "longBreak" | "long" | "lb" => Ok(TimerMode::LongBreak),
            other => Err(format!("不明なモードです: {}", other)),
        }
    }
}

// ============================================================================
// TimerDurations
// ============================================================================

/// Configured length of each mode, in seconds.
///
/// A break mode with a duration of 0 is disabled and is never entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerDurations {
    /// Work session length in seconds
    pub work: u32,
    /// Short break length in seconds (0 = disabled)
    pub short_break: u32,
    /// Long break length in seconds (0 = disabled)
    pub long_break: u32,
}

impl Default for TimerDurations {
    fn default() -> Self {
        Self {
            work: 25 * 60,
            short_break: 5 * 60,
            long_break: 15 * 60,
        }
    }
}

impl TimerDurations {
    /// Returns the configured duration for `mode`.
    pub fn get(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Work => self.work,
            TimerMode::ShortBreak => self.short_break,
            TimerMode::LongBreak => self.long_break,
        }
    }

    /// Sets the duration for `mode`.
    pub fn set(&mut self, mode: TimerMode, seconds: u32) {
        match mode {
            TimerMode::Work => self.work = seconds,
            TimerMode::ShortBreak => self.short_break = seconds,
            TimerMode::LongBreak => self.long_break = seconds,
        }
    }

    /// Returns true if `mode` is a break whose duration is 0.
    pub fn is_disabled(&self, mode: TimerMode) -> bool {
        mode.is_break() && self.get(mode) == 0
    }

    /// Creates a copy with the work duration replaced.
    pub fn with_work_minutes(mut self, minutes: u32) -> Self {
        self.work = minutes * 60;
        self
    }

    /// Creates a copy with the short break duration replaced.
    pub fn with_short_break_minutes(mut self, minutes: u32) -> Self {
        self.short_break = minutes * 60;
        self
    }

    /// Creates a copy with the long break duration replaced.
    pub fn with_long_break_minutes(mut self, minutes: u32) -> Self {
        self.long_break = minutes * 60;
        self
    }
}

// ============================================================================
// AppSettings
// ============================================================================

/// User-configurable settings, persisted as a single JSON record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// Duration of each mode
    pub durations: TimerDurations,
    /// Whether the next session starts automatically after a completion
    pub auto_start: bool,
    /// Whether a tone plays on completion
    pub sound_enabled: bool,
    /// Whether a desktop notification is shown on completion
    pub notifications_enabled: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            durations: TimerDurations::default(),
            auto_start: false,
            sound_enabled: true,
            notifications_enabled: true,
        }
    }
}

impl AppSettings {
    /// Shallow-merges `patch` into these settings.
    ///
    /// Fields absent from the patch keep their current value. `durations`
    /// is replaced as a whole.
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(durations) = patch.durations {
            self.durations = durations;
        }
        if let Some(auto_start) = patch.auto_start {
            self.auto_start = auto_start;
        }
        if let Some(sound_enabled) = patch.sound_enabled {
            self.sound_enabled = sound_enabled;
        }
        if let Some(notifications_enabled) = patch.notifications_enabled {
            self.notifications_enabled = notifications_enabled;
        }
    }

    /// Validates the settings against the ranges the settings panel offers.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        let d = &self.durations;
        if d.work % 60 != 0 || d.short_break % 60 != 0 || d.long_break % 60 != 0 {
            return Err("時間は分単位で指定してください".to_string());
        }
        if !(5 * 60..=60 * 60).contains(&d.work) {
            return Err("作業時間は5-60分の範囲で指定してください".to_string());
        }
        if d.short_break > 15 * 60 {
            return Err("短い休憩時間は0-15分の範囲で指定してください".to_string());
        }
        if d.long_break > 30 * 60 {
            return Err("長い休憩時間は0-30分の範囲で指定してください".to_string());
        }
        Ok(())
    }
}

/// A partial settings update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub durations: Option<TimerDurations>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_start: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications_enabled: Option<bool>,
}

impl SettingsPatch {
    pub fn durations(mut self, durations: TimerDurations) -> Self {
        self.durations = Some(durations);
        self
    }

    pub fn auto_start(mut self, enabled: bool) -> Self {
        self.auto_start = Some(enabled);
        self
    }

    pub fn sound_enabled(mut self, enabled: bool) -> Self {
        self.sound_enabled = Some(enabled);
        self
    }

    pub fn notifications_enabled(mut self, enabled: bool) -> Self {
        self.notifications_enabled = Some(enabled);
        self
    }

    /// Returns true if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.durations.is_none()
            && self.auto_start.is_none()
            && self.sound_enabled.is_none()
            && self.notifications_enabled.is_none()
    }
}

// ============================================================================
// DailyStatRecord
// ============================================================================

/// Completed work for one local calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStatRecord {
    /// Local calendar day, serialized as `YYYY-MM-DD`
    pub date: NaiveDate,
    /// Completed work sessions on that day
    pub work_sessions: u32,
    /// Focus time in whole minutes
    #[serde(rename = "totalFocusTime")]
    pub total_focus_minutes: u32,
}

impl DailyStatRecord {
    /// Creates a record for a single completed session.
    pub fn first(date: NaiveDate, focus_minutes: u32) -> Self {
        Self {
            date,
            work_sessions: 1,
            total_focus_minutes: focus_minutes,
        }
    }
}

// ============================================================================
// State Snapshots
// ============================================================================

/// Snapshot of the countdown clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountdownState {
    pub seconds_remaining: u32,
    pub is_running: bool,
}

/// Snapshot of the interval cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleState {
    pub current_mode: TimerMode,
    pub work_sessions_completed: u32,
}

/// Snapshot of the auto-rollover delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RolloverState {
    pub is_active: bool,
    pub seconds_remaining: u32,
}

// ============================================================================
// Tests
// ============================================================================
