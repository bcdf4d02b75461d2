//! Interactive command input.
//!
//! One command per line. An empty line is the start/pause shortcut.

use std::ops::RangeInclusive;

use crate::engine::Command;
use crate::types::{SettingsPatch, TimerMode};

use super::commands::parse_switch;

/// What a line of input asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    /// Forward to the engine
    Engine(Command),
    /// Print the key help
    Help,
    /// Leave the session
    Quit,
    /// The line could not be parsed
    Invalid(String),
}

/// Parses one line of interactive input.
pub fn parse_line(line: &str) -> InputAction {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return InputAction::Engine(Command::Toggle);
    };
    let rest: Vec<&str> = words.collect();

    match (head, rest.as_slice()) {
        ("s" | "start", []) => InputAction::Engine(Command::Start),
        ("p" | "pause", []) => InputAction::Engine(Command::Pause),
        ("r" | "reset", []) => InputAction::Engine(Command::Reset),
        ("c" | "cancel", []) => InputAction::Engine(Command::CancelRollover),
        ("w" | "work", []) => InputAction::Engine(Command::SwitchMode(TimerMode::Work)),
        ("sb", []) => InputAction::Engine(Command::SwitchMode(TimerMode::ShortBreak)),
        ("lb", []) => InputAction::Engine(Command::SwitchMode(TimerMode::LongBreak)),
        ("mode", [mode]) => match mode.parse::<TimerMode>() {
            Ok(mode) => InputAction::Engine(Command::SwitchMode(mode)),
            Err(e) => InputAction::Invalid(e),
        },
        ("set", [field, value]) => match parse_setting(field, value) {
            Ok(command) => InputAction::Engine(command),
            Err(e) => InputAction::Invalid(e),
        },
        ("defaults", []) => InputAction::Engine(Command::ResetSettings),
        ("status" | "st", []) => InputAction::Engine(Command::Status),
        ("stats", []) => InputAction::Engine(Command::Stats),
        ("h" | "help" | "?", []) => InputAction::Help,
        ("q" | "quit" | "exit", []) => InputAction::Quit,
        _ => InputAction::Invalid(format!("不明なコマンドです: {}", line.trim())),
    }
}

/// Parses `set <field> <value>`.
///
/// Durations are whole minutes within the settings ranges.
fn parse_setting(field: &str, value: &str) -> Result<Command, String> {
    let duration = |mode: TimerMode, range: RangeInclusive<u32>| -> Result<Command, String> {
        let minutes: u32 = value
            .parse()
            .map_err(|_| format!("分を整数で指定してください: {}", value))?;
        if !range.contains(&minutes) {
            return Err(format!(
                "{}は{}-{}分の範囲で指定してください",
                mode.label(),
                range.start(),
                range.end()
            ));
        }
        Ok(Command::SetDuration {
            mode,
            seconds: minutes * 60,
        })
    };

    match field {
        "work" => duration(TimerMode::Work, 5..=60),
        "short-break" | "short" => duration(TimerMode::ShortBreak, 0..=15),
        "long-break" | "long" => duration(TimerMode::LongBreak, 0..=30),
        "auto-start" => Ok(Command::UpdateSettings(
            SettingsPatch::default().auto_start(parse_switch(value)?),
        )),
        "sound" => Ok(Command::UpdateSettings(
            SettingsPatch::default().sound_enabled(parse_switch(value)?),
        )),
        "notifications" => Ok(Command::UpdateSettings(
            SettingsPatch::default().notifications_enabled(parse_switch(value)?),
        )),
        other => Err(format!("不明な設定項目です: {}", other)),
    }
}

/// Key help shown by `help`.
pub const HELP: &str = "\
  Enter        開始 / 一時停止
  s / p / r    開始 / 一時停止 / リセット
  w / sb / lb  作業 / 短い休憩 / 長い休憩 に切り替え
  c            自動切り替えをキャンセル
  set <項目> <値>  設定変更 (work, short-break, long-break: 分 / auto-start, sound, notifications: on|off)
  defaults     設定を初期値に戻す
  status       現在の状態
  stats        統計
  q            終了";
