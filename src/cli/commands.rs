//! Command definitions for the Pomodoro Timer CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::timer::DEFAULT_ROLLOVER_DELAY;
use crate::types::{SettingsPatch, TimerDurations};

// ============================================================================
// CLI Structure
// ============================================================================

/// Pomodoro Timer CLI - work/break cycles in the terminal
#[derive(Parser, Debug)]
#[command(
    name = "pomodoro",
    version,
    about = "ターミナル向けポモドーロタイマー",
    long_about = "作業と休憩を交互に繰り返すポモドーロタイマー。\n\
                  4回の作業ごとに長い休憩が入り、完了したセッションは日ごとに記録されます。",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding settings and statistics
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run an interactive timer session
    Run(RunArgs),

    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },

    /// Show session statistics for the last 30 days
    Stats,

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Settings subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SettingsAction {
    /// Show the current settings
    Show,

    /// Change one or more settings
    Set(SetArgs),

    /// Restore the default settings
    Reset,
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Seconds before the next session starts automatically (0 = immediately)
    #[arg(
        long,
        default_value_t = DEFAULT_ROLLOVER_DELAY,
        value_parser = clap::value_parser!(u32).range(0..=60)
    )]
    pub rollover_delay: u32,

    /// Start the first session right away
    #[arg(short, long)]
    pub start: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            rollover_delay: DEFAULT_ROLLOVER_DELAY,
            start: false,
        }
    }
}

// ============================================================================
// Settings Set Arguments
// ============================================================================

/// Arguments for `settings set`. Durations are in minutes; 0 disables a
/// break.
#[derive(Args, Debug, Clone, Default)]
pub struct SetArgs {
    /// Work duration in minutes (5-60)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(5..=60))]
    pub work: Option<u32>,

    /// Short break duration in minutes (0-15, 0 = disabled)
    #[arg(short = 's', long, value_parser = clap::value_parser!(u32).range(0..=15))]
    pub short_break: Option<u32>,

    /// Long break duration in minutes (0-30, 0 = disabled)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(0..=30))]
    pub long_break: Option<u32>,

    /// Start the next session automatically (on/off)
    #[arg(long, value_name = "on|off", value_parser = parse_switch)]
    pub auto_start: Option<bool>,

    /// Play a tone when a session completes (on/off)
    #[arg(long, value_name = "on|off", value_parser = parse_switch)]
    pub sound: Option<bool>,

    /// Show a desktop notification when a session completes (on/off)
    #[arg(long, value_name = "on|off", value_parser = parse_switch)]
    pub notifications: Option<bool>,
}

impl SetArgs {
    /// Builds the settings patch, starting durations from `current`.
    pub fn to_patch(&self, current: &TimerDurations) -> SettingsPatch {
        let mut patch = SettingsPatch {
            durations: None,
            auto_start: self.auto_start,
            sound_enabled: self.sound,
            notifications_enabled: self.notifications,
        };

        if self.work.is_some() || self.short_break.is_some() || self.long_break.is_some() {
            let mut durations = *current;
            if let Some(minutes) = self.work {
                durations = durations.with_work_minutes(minutes);
            }
            if let Some(minutes) = self.short_break {
                durations = durations.with_short_break_minutes(minutes);
            }
            if let Some(minutes) = self.long_break {
                durations = durations.with_long_break_minutes(minutes);
            }
            patch.durations = Some(durations);
        }

        patch
    }
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Parses an on/off switch value.
pub fn parse_switch(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(format!("on または off を指定してください: {}", s)),
    }
}

// ============================================================================
// Tests
// ============================================================================
