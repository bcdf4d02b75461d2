//! Display utilities for the Pomodoro Timer CLI.
//!
//! This module provides formatted output for:
//! - Settings and statistics screens
//! - Session status
//! - Error messages
//!
//! Formatting is done by pure `format_*`/`*_text` functions so the output
//! can be tested; the `show_*` methods print it.

use chrono::{Duration, NaiveDate};

use crate::engine::{EngineSnapshot, StatsReport};
use crate::types::{AppSettings, DailyStatRecord, TimerMode};

/// Number of days listed on the statistics screen.
pub const RECENT_DAYS_SHOWN: usize = 10;

/// Width of the progress bar in cells.
const PROGRESS_WIDTH: usize = 20;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows the current settings.
    pub fn show_settings(settings: &AppSettings) {
        println!("{}", Self::settings_text(settings));
    }

    /// Shows a success message for settings update.
    pub fn show_settings_updated(settings: &AppSettings) {
        println!("* 設定を更新しました");
        println!("{}", Self::settings_text(settings));
    }

    /// Shows a success message for settings reset.
    pub fn show_settings_reset(settings: &AppSettings) {
        println!("* 設定を初期値に戻しました");
        println!("{}", Self::settings_text(settings));
    }

    /// Shows the statistics screen.
    pub fn show_stats(report: &StatsReport, today: NaiveDate) {
        println!("{}", Self::stats_text(report, today));
    }

    /// Shows the session status.
    pub fn show_status(snapshot: &EngineSnapshot) {
        println!("{}", Self::status_text(snapshot));
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("エラー: {}", message);
    }

    // ------------------------------------------------------------------------
    // Text builders
    // ------------------------------------------------------------------------

    pub fn settings_text(settings: &AppSettings) -> String {
        let d = &settings.durations;
        [
            "ポモドーロタイマー 設定".to_string(),
            "─────────────────────────────".to_string(),
            format!("作業時間:     {}", format_duration_setting(d.work)),
            format!("短い休憩:     {}", format_duration_setting(d.short_break)),
            format!("長い休憩:     {}", format_duration_setting(d.long_break)),
            format!("自動開始:     {}", format_switch(settings.auto_start)),
            format!("サウンド:     {}", format_switch(settings.sound_enabled)),
            format!("通知:         {}", format_switch(settings.notifications_enabled)),
        ]
        .join("\n")
    }

    pub fn stats_text(report: &StatsReport, today: NaiveDate) -> String {
        let summary = &report.summary;
        let mut lines = vec![
            "セッション統計 (過去30日)".to_string(),
            "─────────────────────────────".to_string(),
            format!("合計セッション: {}", summary.total_sessions),
            format!("合計集中時間:   {}", format_focus_time(summary.total_minutes)),
            format!("1日平均:        {:.1} セッション", summary.average_sessions_per_day),
        ];

        if report.records.is_empty() {
            lines.push(String::new());
            lines.push("まだ記録がありません。最初のセッションを完了しましょう！".to_string());
            return lines.join("\n");
        }

        lines.push(String::new());
        lines.push("最近の記録".to_string());
        for record in recent_records(&report.records) {
            lines.push(format!(
                "  {:<12} {:>3} セッション  {}",
                format_date_label(record.date, today),
                record.work_sessions,
                format_focus_time(record.total_focus_minutes)
            ));
        }
        lines.join("\n")
    }

    pub fn status_text(snapshot: &EngineSnapshot) -> String {
        let mode = snapshot.cycle.current_mode;
        let state = if snapshot.rollover.is_active {
            format!("自動切り替え待ち ({}秒)", snapshot.rollover.seconds_remaining)
        } else if snapshot.countdown.is_running {
            "実行中".to_string()
        } else {
            "停止中".to_string()
        };

        [
            format!("{} - {}", mode_title(mode), mode_subtitle(mode)),
            format!("状態:       {}", state),
            format!(
                "残り時間:   {} / {}",
                format_clock(snapshot.countdown.seconds_remaining),
                format_clock(snapshot.duration)
            ),
            format!("進捗:       {}", progress_bar(snapshot.progress)),
            format!(
                "セッション: {} (完了 {})",
                format_slots(&snapshot.filled_slots),
                snapshot.cycle.work_sessions_completed
            ),
        ]
        .join("\n")
    }
}

// ============================================================================
// Formatting helpers
// ============================================================================

/// Formats seconds as `MM:SS`.
pub fn format_clock(total_seconds: u32) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Formats a configured duration; 0 means the mode is disabled.
pub fn format_duration_setting(seconds: u32) -> String {
    if seconds == 0 {
        "無効".to_string()
    } else {
        format!("{}分", seconds / 60)
    }
}

/// Formats focus minutes as `X時間Y分` or `Y分`.
pub fn format_focus_time(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{}時間{}分", hours, mins)
    } else {
        format!("{}分", mins)
    }
}

/// Labels `date` relative to `today`.
pub fn format_date_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "今日".to_string()
    } else if today - date == Duration::days(1) {
        "昨日".to_string()
    } else {
        date.format("%Y-%m-%d").to_string()
    }
}

fn format_switch(enabled: bool) -> &'static str {
    if enabled {
        "オン"
    } else {
        "オフ"
    }
}

/// Renders session indicator slots.
pub fn format_slots(slots: &[bool]) -> String {
    slots.iter().map(|&lit| if lit { '●' } else { '○' }).collect()
}

/// Renders a percentage as a fixed-width bar.
pub fn progress_bar(percent: f64) -> String {
    let percent = percent.clamp(0.0, 100.0);
    let filled = ((percent / 100.0) * PROGRESS_WIDTH as f64).round() as usize;
    format!(
        "[{}{}] {:>3.0}%",
        "#".repeat(filled),
        ".".repeat(PROGRESS_WIDTH - filled),
        percent
    )
}

/// Heading of a mode.
pub fn mode_title(mode: TimerMode) -> &'static str {
    match mode {
        TimerMode::Work => "集中タイム",
        TimerMode::ShortBreak => "短い休憩",
        TimerMode::LongBreak => "長い休憩",
    }
}

/// One-line encouragement shown under the heading.
pub fn mode_subtitle(mode: TimerMode) -> &'static str {
    match mode {
        TimerMode::Work => "やるべきことを片付けましょう",
        TimerMode::ShortBreak => "ひと息つきましょう",
        TimerMode::LongBreak => "しっかり休みましょう",
    }
}

/// Newest first, at most [`RECENT_DAYS_SHOWN`] days.
fn recent_records(records: &[DailyStatRecord]) -> Vec<&DailyStatRecord> {
    let mut sorted: Vec<&DailyStatRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted.truncate(RECENT_DAYS_SHOWN);
    sorted
}

// ============================================================================
// Tests
// ============================================================================
