//! Cycle state machine error types.

use thiserror::Error;

use crate::types::TimerMode;

/// Errors returned by the cycle state machine.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CycleError {
    /// The requested break mode has a duration of 0.
    #[error("{}は無効化されています", .0.label())]
    ModeDisabled(TimerMode),
}

impl CycleError {
    /// Returns true if the error is due to a disabled mode.
    #[must_use]
    pub fn is_mode_disabled(&self) -> bool {
        matches!(self, Self::ModeDisabled(_))
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::ModeDisabled(_) => "設定で休憩時間を1分以上にしてください",
        }
    }
}
