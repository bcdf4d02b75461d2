//! Session engine for the Pomodoro timer.
//!
//! This module contains the coordinator that owns every stateful component:
//! - `event`: commands in, events out
//! - `session`: the engine and its single-task event loop

pub mod event;
pub mod session;

pub use event::{Command, EngineSnapshot, SessionEvent, StatsReport};
pub use session::{EngineConfig, SessionEngine};
