//! CLI module for the Pomodoro Timer.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `display`: Output formatting and display logic
//! - `input`: Interactive line commands
//! - `session`: Interactive session runner

pub mod commands;
pub mod display;
pub mod input;
pub mod session;

pub use commands::{Cli, Commands, RunArgs, SetArgs, SettingsAction};
pub use display::Display;
pub use session::{run_interactive, SessionView};
