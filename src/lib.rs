//! Pomodoro Timer Library
//!
//! This library provides the core functionality for the Pomodoro Timer CLI.
//! It includes:
//! - Countdown, cycle and auto-rollover state machines
//! - Session engine coordinating timers, stores and side effects
//! - Persisted settings and daily statistics
//! - Completion tone and desktop notifications
//! - CLI command parsing and display utilities

pub mod cli;
pub mod engine;
pub mod notification;
pub mod sound;
pub mod storage;
pub mod store;
pub mod timer;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    AppSettings, CountdownState, CycleState, DailyStatRecord, RolloverState, SettingsPatch,
    TimerDurations, TimerMode,
};

pub use engine::{Command, EngineConfig, EngineSnapshot, SessionEngine, SessionEvent, StatsReport};

pub use timer::{AutoRollover, Countdown, CycleError, PomodoroCycle};

pub use store::{SettingsStore, StatsStore, StatsSummary};

pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};

pub use notification::{
    DesktopNotificationSender, MockNotificationSender, NotificationError, NotificationPermission,
    NotificationSender, Notifier,
};

pub use sound::{MockSoundPlayer, RodioSoundPlayer, SoundError, SoundPlayer, Tone};
