//! Notification content construction.

use crate::types::TimerMode;

/// Application name shown by the notification service.
pub const APP_NAME: &str = "pomodoro";

/// Title and body of a desktop notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeContent {
    pub title: String,
    pub body: String,
}

impl NoticeContent {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Content announcing that a session in `finished` mode has ended.
    ///
    /// Work completion suggests a break; any break completion calls the
    /// user back to work.
    pub fn for_completed(finished: TimerMode) -> Self {
        match finished {
            TimerMode::Work => Self::new("🍅 作業セッション完了！", "お疲れさまでした。休憩しましょう。"),
            TimerMode::ShortBreak | TimerMode::LongBreak => {
                Self::new("☕ 休憩終了！", "作業に戻る準備はできましたか？")
            }
        }
    }
}
