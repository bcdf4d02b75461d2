//! Interactive timer session.
//!
//! Three tasks cooperate on the current-thread runtime:
//! - the stdin reader turns lines into engine commands
//! - the session engine owns all timer state
//! - the renderer prints engine events
//!
//! The engine is not `Send` (the audio stream is pinned to its thread), so
//! it is joined on the calling task instead of spawned.

use std::io::{self, Write};

use anyhow::{Context, Result};
use chrono::Local;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::display::{format_clock, mode_subtitle, mode_title, progress_bar, Display};
use super::input::{parse_line, InputAction, HELP};
use crate::engine::{Command, SessionEngine, SessionEvent};
use crate::types::TimerMode;

// ============================================================================
// SessionView
// ============================================================================

/// Renders engine events as terminal output.
///
/// Countdown and rollover progress share one status line that is redrawn
/// in place; any other event first terminates that line.
pub struct SessionView<W: Write> {
    out: W,
    mode: TimerMode,
    duration: u32,
    rollover_delay: u32,
    status_line_open: bool,
}

impl<W: Write> SessionView<W> {
    pub fn new(out: W, mode: TimerMode, duration: u32) -> Self {
        Self {
            out,
            mode,
            duration,
            rollover_delay: 0,
            status_line_open: false,
        }
    }

    /// Writes the output for one event.
    pub fn render(&mut self, event: &SessionEvent) -> io::Result<()> {
        match event {
            SessionEvent::Tick { remaining } => self.countdown_line(*remaining),
            SessionEvent::RolloverTick { seconds_remaining } => {
                self.rollover_line(*seconds_remaining)
            }
            SessionEvent::Started { mode, remaining } => {
                self.mode = *mode;
                self.line(&format!("▶ {}を開始しました", mode_title(*mode)))?;
                self.countdown_line(*remaining)
            }
            SessionEvent::Paused { remaining } => {
                self.line(&format!("⏸ 一時停止しました (残り {})", format_clock(*remaining)))
            }
            SessionEvent::Reset { remaining } => {
                self.line(&format!("↺ リセットしました ({})", format_clock(*remaining)))
            }
            SessionEvent::ModeChanged { mode, duration } => {
                self.mode = *mode;
                self.duration = *duration;
                self.line(&format!(
                    "→ {} ({}) - {}",
                    mode_title(*mode),
                    format_clock(*duration),
                    mode_subtitle(*mode)
                ))
            }
            SessionEvent::SessionCompleted {
                mode,
                work_sessions_completed,
            } => self.line(&format!(
                "✔ {}が完了しました (作業セッション {} 回)",
                mode.label(),
                work_sessions_completed
            )),
            SessionEvent::RolloverStarted { next_mode, seconds } => {
                self.rollover_delay = *seconds;
                self.line(&format!(
                    "{}秒後に{}を自動で開始します (c でキャンセル)",
                    seconds,
                    mode_title(*next_mode)
                ))?;
                self.rollover_line(*seconds)
            }
            SessionEvent::RolloverCanceled => self.line("自動開始をキャンセルしました"),
            SessionEvent::SettingsChanged(settings) => {
                self.line("* 設定を更新しました")?;
                self.line(&Display::settings_text(settings))
            }
            SessionEvent::Snapshot(snapshot) => self.line(&Display::status_text(snapshot)),
            SessionEvent::Stats(report) => {
                self.line(&Display::stats_text(report, Local::now().date_naive()))
            }
            SessionEvent::Rejected { reason } => self.line(&format!("! {}", reason)),
        }
    }

    /// Terminates an open status line and flushes.
    pub fn finish(&mut self) -> io::Result<()> {
        self.close_status_line()?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn countdown_line(&mut self, remaining: u32) -> io::Result<()> {
        let progress = if self.duration == 0 {
            0.0
        } else {
            f64::from(self.duration.saturating_sub(remaining)) / f64::from(self.duration) * 100.0
        };
        let text = format!(
            "{} {} {}",
            mode_title(self.mode),
            format_clock(remaining),
            progress_bar(progress)
        );
        self.status(&text)
    }

    fn rollover_line(&mut self, seconds_remaining: u32) -> io::Result<()> {
        let progress = if self.rollover_delay == 0 {
            100.0
        } else {
            f64::from(self.rollover_delay.saturating_sub(seconds_remaining))
                / f64::from(self.rollover_delay)
                * 100.0
        };
        let text = format!("次のセッションまで {}秒 {}", seconds_remaining, progress_bar(progress));
        self.status(&text)
    }

    fn status(&mut self, text: &str) -> io::Result<()> {
        write!(self.out, "\r{}\x1b[K", text)?;
        self.status_line_open = true;
        self.out.flush()
    }

    fn line(&mut self, text: &str) -> io::Result<()> {
        self.close_status_line()?;
        writeln!(self.out, "{}", text)
    }

    fn close_status_line(&mut self) -> io::Result<()> {
        if self.status_line_open {
            self.status_line_open = false;
            writeln!(self.out)?;
        }
        Ok(())
    }
}

// ============================================================================
// Runner
// ============================================================================

/// Runs an interactive session until `q`, end of input or Ctrl+C.
///
/// # Errors
///
/// Returns an error if the engine or the renderer fails.
pub async fn run_interactive(
    mut engine: SessionEngine,
    events: mpsc::UnboundedReceiver<SessionEvent>,
    start: bool,
) -> Result<()> {
    let (command_tx, command_rx) = mpsc::unbounded_channel();

    let snapshot = engine.snapshot();
    let view = SessionView::new(
        io::stdout(),
        snapshot.cycle.current_mode,
        snapshot.duration,
    );
    Display::show_status(&snapshot);
    println!("{}", HELP);

    if start {
        command_tx
            .send(Command::Start)
            .context("Failed to queue start command")?;
    }

    tokio::spawn(read_commands(command_tx.clone()));
    tokio::spawn(forward_ctrl_c(command_tx));

    let engine_task = async move {
        let result = engine.run(command_rx).await;
        // Dropping the engine closes the event channel and ends the renderer.
        drop(engine);
        result
    };
    let (engine_result, render_result) = tokio::join!(engine_task, render_events(events, view));

    render_result?;
    engine_result
}

async fn render_events<W: Write>(
    mut events: mpsc::UnboundedReceiver<SessionEvent>,
    mut view: SessionView<W>,
) -> Result<()> {
    while let Some(event) = events.recv().await {
        view.render(&event).context("Failed to write session output")?;
    }
    view.finish().context("Failed to write session output")
}

/// Reads stdin line by line. Always ends by asking the engine to stop.
async fn read_commands(commands: mpsc::UnboundedSender<Command>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match parse_line(&line) {
                InputAction::Engine(command) => {
                    if commands.send(command).is_err() {
                        debug!("Engine stopped, input reader exiting");
                        return;
                    }
                }
                InputAction::Help => println!("{}", HELP),
                InputAction::Quit => break,
                InputAction::Invalid(message) => Display::show_error(&message),
            },
            Ok(None) => {
                debug!("End of input");
                break;
            }
            Err(e) => {
                warn!("Failed to read input: {}", e);
                break;
            }
        }
    }

    let _ = commands.send(Command::Shutdown);
}

async fn forward_ctrl_c(commands: mpsc::UnboundedSender<Command>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        return;
    }
    debug!("Ctrl+C received");
    let _ = commands.send(Command::Shutdown);
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AppSettings;

    fn view() -> SessionView<Vec<u8>> {
        SessionView::new(Vec::new(), TimerMode::Work, 1500)
    }

    fn output(view: SessionView<Vec<u8>>) -> String {
        String::from_utf8(view.into_inner()).unwrap()
    }

    mod view_tests {
        use super::*;

        #[test]
        fn test_ticks_share_one_line() {
            let mut v = view();
            v.render(&SessionEvent::Tick { remaining: 1499 }).unwrap();
            v.render(&SessionEvent::Tick { remaining: 1498 }).unwrap();
            v.finish().unwrap();

            let out = output(v);
            assert_eq!(out.matches('\n').count(), 1);
            assert_eq!(out.matches('\r').count(), 2);
            assert!(out.contains("24:58"));
        }

        #[test]
        fn test_line_event_closes_status_line() {
            let mut v = view();
            v.render(&SessionEvent::Tick { remaining: 750 }).unwrap();
            v.render(&SessionEvent::Paused { remaining: 750 }).unwrap();

            let out = output(v);
            assert!(out.contains(" 50%\x1b[K\n⏸ 一時停止しました (残り 12:30)\n"));
        }

        #[test]
        fn test_mode_change_updates_progress_base() {
            let mut v = view();
            v.render(&SessionEvent::ModeChanged {
                mode: TimerMode::ShortBreak,
                duration: 300,
            })
            .unwrap();
            v.render(&SessionEvent::Tick { remaining: 150 }).unwrap();

            let out = output(v);
            assert!(out.contains("→ 短い休憩 (05:00)"));
            assert!(out.contains("短い休憩 02:30"));
            assert!(out.contains(" 50%"));
        }

        #[test]
        fn test_rollover_progress() {
            let mut v = view();
            v.render(&SessionEvent::RolloverStarted {
                next_mode: TimerMode::ShortBreak,
                seconds: 4,
            })
            .unwrap();
            v.render(&SessionEvent::RolloverTick {
                seconds_remaining: 1,
            })
            .unwrap();

            let out = output(v);
            assert!(out.contains("4秒後に短い休憩を自動で開始します"));
            assert!(out.contains("次のセッションまで 4秒"));
            assert!(out.contains("次のセッションまで 1秒"));
            assert!(out.contains(" 75%"));
        }

        #[test]
        fn test_completion_and_rejection() {
            let mut v = view();
            v.render(&SessionEvent::SessionCompleted {
                mode: TimerMode::Work,
                work_sessions_completed: 3,
            })
            .unwrap();
            v.render(&SessionEvent::Rejected {
                reason: "だめです".to_string(),
            })
            .unwrap();

            let out = output(v);
            assert!(out.contains("✔ 作業が完了しました (作業セッション 3 回)"));
            assert!(out.contains("! だめです"));
        }

        #[test]
        fn test_settings_changed_prints_settings() {
            let mut v = view();
            v.render(&SessionEvent::SettingsChanged(AppSettings::default()))
                .unwrap();

            let out = output(v);
            assert!(out.contains("設定を更新しました"));
            assert!(out.contains("作業時間:     25分"));
        }
    }
}
