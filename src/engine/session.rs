//! Session engine: the single owner of all timer state.
//!
//! The engine runs on one task and multiplexes three sources with
//! `tokio::select!`: the command channel, the countdown tick and the
//! rollover schedules. Every handler runs to completion before the next
//! source is polled, so a session completion (tone, notice, statistics,
//! cycle transition) is fully applied before the next command is read.

use std::ops::ControlFlow;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::event::{Command, EngineSnapshot, SessionEvent, StatsReport};
use crate::notification::Notifier;
use crate::store::{SettingsStore, StatsStore};
use crate::timer::{
    AutoRollover, Countdown, ModeChange, PomodoroCycle, RolloverStep, TickOutcome,
    TransitionStart, DEFAULT_ROLLOVER_DELAY,
};
use crate::types::{AppSettings, SettingsPatch, TimerMode};

// ============================================================================
// EngineConfig
// ============================================================================

/// Process-level engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Seconds between a completion and the automatic start of the next
    /// session. 0 starts the next session immediately.
    pub rollover_delay: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rollover_delay: DEFAULT_ROLLOVER_DELAY,
        }
    }
}

// ============================================================================
// SessionEngine
// ============================================================================

/// Coordinates the countdown, the cycle, the rollover delay, both stores
/// and the completion side effects.
pub struct SessionEngine {
    countdown: Countdown,
    cycle: PomodoroCycle,
    rollover: AutoRollover,
    settings: SettingsStore,
    stats: StatsStore,
    notifier: Notifier,
    /// Whether the first-start permission request has been made
    permission_requested: bool,
    event_tx: mpsc::UnboundedSender<SessionEvent>,
}

impl SessionEngine {
    /// Creates an engine in work mode, paused at the full work duration.
    pub fn new(
        config: EngineConfig,
        settings: SettingsStore,
        stats: StatsStore,
        notifier: Notifier,
        event_tx: mpsc::UnboundedSender<SessionEvent>,
    ) -> Self {
        let cycle = PomodoroCycle::new(settings.settings().durations);
        let countdown = Countdown::new(cycle.current_duration());
        let rollover = AutoRollover::new(config.rollover_delay > 0, config.rollover_delay);

        Self {
            countdown,
            cycle,
            rollover,
            settings,
            stats,
            notifier,
            permission_requested: false,
            event_tx,
        }
    }

    /// Runs the event loop until `Shutdown` arrives or the command channel
    /// closes. All schedules are canceled on return.
    ///
    /// # Errors
    ///
    /// Returns an error if the event receiver has been dropped.
    pub async fn run(&mut self, mut commands: mpsc::UnboundedReceiver<Command>) -> Result<()> {
        let result = self.event_loop(&mut commands).await;
        self.dispose();
        result
    }

    async fn event_loop(&mut self, commands: &mut mpsc::UnboundedReceiver<Command>) -> Result<()> {
        loop {
            tokio::select! {
                biased;

                command = commands.recv() => {
                    let Some(command) = command else {
                        debug!("Command channel closed");
                        return Ok(());
                    };
                    if self.handle_command(command)?.is_break() {
                        return Ok(());
                    }
                }
                _ = self.countdown.next_tick() => {
                    self.on_countdown_tick()?;
                }
                step = self.rollover.next_step() => {
                    self.on_rollover_step(step)?;
                }
            }
        }
    }

    /// Applies one command.
    ///
    /// Returns `ControlFlow::Break` for `Shutdown`.
    ///
    /// # Errors
    ///
    /// Returns an error if the event receiver has been dropped.
    pub fn handle_command(&mut self, command: Command) -> Result<ControlFlow<()>> {
        debug!("Command: {:?}", command);
        match command {
            Command::Start => self.start()?,
            Command::Pause => self.pause()?,
            Command::Toggle => self.toggle()?,
            Command::Reset => self.reset()?,
            Command::SwitchMode(mode) => self.switch_mode(mode)?,
            Command::SetDuration { mode, seconds } => {
                let mut durations = self.settings.settings().durations;
                durations.set(mode, seconds);
                self.update_settings(SettingsPatch::default().durations(durations))?
            }
            Command::UpdateSettings(patch) => self.update_settings(patch)?,
            Command::ResetSettings => self.reset_settings()?,
            Command::CancelRollover => self.cancel_rollover()?,
            Command::Status => self.emit(SessionEvent::Snapshot(self.snapshot()))?,
            Command::Stats => self.emit(SessionEvent::Stats(self.stats_report()))?,
            Command::Shutdown => {
                info!("Shutting down session engine");
                self.dispose();
                return Ok(ControlFlow::Break(()));
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    fn start(&mut self) -> Result<()> {
        self.cancel_pending_rollover()?;
        self.request_permission_once();

        if self.countdown.is_running() {
            return self.reject("タイマーは既に実行中です");
        }
        if !self.countdown.start() {
            return self.reject("残り時間がありません。リセットしてください");
        }
        self.emit(SessionEvent::Started {
            mode: self.cycle.current_mode(),
            remaining: self.countdown.seconds_remaining(),
        })
    }

    fn pause(&mut self) -> Result<()> {
        self.cancel_pending_rollover()?;

        if !self.countdown.pause() {
            return self.reject("タイマーは実行されていません");
        }
        self.emit(SessionEvent::Paused {
            remaining: self.countdown.seconds_remaining(),
        })
    }

    fn toggle(&mut self) -> Result<()> {
        if self.rollover.is_active() {
            return self.reject("自動切り替え中です (c でキャンセル)");
        }
        if self.countdown.is_running() {
            self.pause()
        } else {
            self.start()
        }
    }

    fn reset(&mut self) -> Result<()> {
        self.cancel_pending_rollover()?;
        self.countdown.reset();
        self.emit(SessionEvent::Reset {
            remaining: self.countdown.seconds_remaining(),
        })
    }

    fn switch_mode(&mut self, mode: TimerMode) -> Result<()> {
        self.cancel_pending_rollover()?;

        match self.cycle.switch_mode(mode) {
            Ok(change) => self.retarget(change),
            Err(e) => self.reject(format!("{} ({})", e, e.suggestion())),
        }
    }

    fn update_settings(&mut self, patch: SettingsPatch) -> Result<()> {
        // Only durations carry ranges; switches are always valid.
        if patch.durations.is_some() {
            let mut candidate = self.settings.settings().clone();
            candidate.apply(patch.clone());
            if let Err(reason) = candidate.validate() {
                return self.reject(reason);
            }
        }

        self.settings.update(patch);
        self.apply_settings()
    }

    fn reset_settings(&mut self) -> Result<()> {
        self.settings.reset_to_defaults();
        self.apply_settings()
    }

    fn cancel_rollover(&mut self) -> Result<()> {
        if !self.cancel_pending_rollover()? {
            return self.reject("自動切り替えは進行していません");
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Scheduled wake-ups
    // ------------------------------------------------------------------------

    fn on_countdown_tick(&mut self) -> Result<()> {
        match self.countdown.tick() {
            TickOutcome::Idle => Ok(()),
            TickOutcome::Ticked { remaining_seconds } => self.emit(SessionEvent::Tick {
                remaining: remaining_seconds,
            }),
            TickOutcome::Completed => {
                self.emit(SessionEvent::Tick { remaining: 0 })?;
                self.complete_session()
            }
        }
    }

    fn on_rollover_step(&mut self, step: RolloverStep) -> Result<()> {
        match step {
            RolloverStep::Idle => Ok(()),
            RolloverStep::Ticked { seconds_remaining } => {
                self.emit(SessionEvent::RolloverTick { seconds_remaining })
            }
            RolloverStep::Completed => {
                self.emit(SessionEvent::RolloverTick {
                    seconds_remaining: 0,
                })?;
                self.begin_next_session()
            }
        }
    }

    /// Applies a countdown completion.
    ///
    /// Order: side effects, statistics, cycle transition, rollover.
    fn complete_session(&mut self) -> Result<()> {
        let settings = self.settings.settings().clone();
        let finished = self.cycle.current_mode();

        if settings.sound_enabled {
            self.notifier.play_tone();
        }
        if settings.notifications_enabled {
            self.notifier.show_completion_notice(finished);
        }

        if finished == TimerMode::Work {
            // Settings may have changed mid-session; record what actually ran.
            let record = self.stats.record_work_session(self.countdown.initial_seconds());
            debug!(
                "Today: {} sessions, {} min",
                record.work_sessions, record.total_focus_minutes
            );
        }

        let completion = self.cycle.complete_current_session();
        info!("{} completed, next: {}", completion.finished, completion.next.mode);
        self.emit(SessionEvent::SessionCompleted {
            mode: completion.finished,
            work_sessions_completed: self.cycle.work_sessions_completed(),
        })?;
        self.retarget(completion.next)?;

        if !settings.auto_start {
            return Ok(());
        }
        match self.rollover.start_transition() {
            TransitionStart::Completed => self.begin_next_session(),
            TransitionStart::Pending { seconds } => self.emit(SessionEvent::RolloverStarted {
                next_mode: completion.next.mode,
                seconds,
            }),
        }
    }

    fn begin_next_session(&mut self) -> Result<()> {
        if !self.countdown.start() {
            debug!("Next session has no duration, not starting");
            return Ok(());
        }
        self.emit(SessionEvent::Started {
            mode: self.cycle.current_mode(),
            remaining: self.countdown.seconds_remaining(),
        })
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    /// Pushes new settings into the cycle and the rollover.
    ///
    /// A changed duration for the active mode retargets the countdown only
    /// while it is not running. An idle break that is now disabled falls
    /// back to work.
    fn apply_settings(&mut self) -> Result<()> {
        let settings = self.settings.settings().clone();

        let change = self.cycle.set_durations(settings.durations);
        if self.countdown.is_running() {
            if change.is_some() {
                debug!("Countdown running, keeping current session length");
            }
        } else if let Some(change) = self.cycle.leave_disabled_mode().or(change) {
            self.retarget(change)?;
        }
        if !settings.auto_start {
            self.cancel_pending_rollover()?;
        }

        self.emit(SessionEvent::SettingsChanged(settings))
    }

    fn retarget(&mut self, change: ModeChange) -> Result<()> {
        self.countdown.set_time(change.duration);
        self.emit(SessionEvent::ModeChanged {
            mode: change.mode,
            duration: change.duration,
        })
    }

    /// Cancels a pending rollover. Returns true if one was canceled.
    fn cancel_pending_rollover(&mut self) -> Result<bool> {
        if !self.rollover.cancel_transition() {
            return Ok(false);
        }
        self.emit(SessionEvent::RolloverCanceled)?;
        Ok(true)
    }

    fn request_permission_once(&mut self) {
        if self.permission_requested || !self.settings.settings().notifications_enabled {
            return;
        }
        self.permission_requested = true;
        let permission = self.notifier.request_permission();
        debug!("Notification permission: {:?}", permission);
    }

    fn emit(&self, event: SessionEvent) -> Result<()> {
        self.event_tx
            .send(event)
            .context("Failed to send session event")
    }

    fn reject(&self, reason: impl Into<String>) -> Result<()> {
        let reason = reason.into();
        debug!("Rejected: {}", reason);
        self.emit(SessionEvent::Rejected { reason })
    }

    /// Cancels every schedule. The engine is stopped afterwards.
    pub fn dispose(&mut self) {
        self.countdown.dispose();
        self.rollover.dispose();
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Returns the full engine state.
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            countdown: self.countdown.state(),
            cycle: self.cycle.state(),
            rollover: self.rollover.state(),
            progress: self.countdown.progress(),
            filled_slots: self.cycle.filled_slots(),
            duration: self.countdown.initial_seconds(),
            settings: self.settings.settings().clone(),
        }
    }

    /// Returns the retained statistics and their totals.
    pub fn stats_report(&self) -> StatsReport {
        StatsReport {
            records: self.stats.records().to_vec(),
            summary: self.stats.summary(),
        }
    }

    pub fn settings(&self) -> &AppSettings {
        self.settings.settings()
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn cycle(&self) -> &PomodoroCycle {
        &self.cycle
    }

    pub fn rollover(&self) -> &AutoRollover {
        &self.rollover
    }
}

impl Drop for SessionEngine {
    fn drop(&mut self) {
        self.dispose();
    }
}

// ============================================================================
// Tests
// ============================================================================
