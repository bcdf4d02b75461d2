//! Persisted application state: user settings and session statistics.

mod settings;
mod stats;

pub use settings::{merge_over_defaults, SettingsStore, SETTINGS_KEY};
pub use stats::{StatsStore, StatsSummary, RETENTION_DAYS, STATS_KEY};
