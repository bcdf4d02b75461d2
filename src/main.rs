//! Pomodoro Timer CLI - work/break cycles in the terminal
//!
//! This tool helps you stay focused using the Pomodoro Technique:
//! - 25 minutes of focused work
//! - 5 minutes of short break
//! - 15 minutes of long break after 4 pomodoros

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{CommandFactory, Parser};
use tokio::sync::mpsc;

use pomodoro_cycle::cli::{run_interactive, Cli, Commands, Display, RunArgs, SettingsAction};
use pomodoro_cycle::notification::{DesktopNotificationSender, Notifier};
use pomodoro_cycle::sound::{try_create_player, SoundPlayer};
use pomodoro_cycle::storage::{FileStore, KeyValueStore};
use pomodoro_cycle::store::{SettingsStore, StatsStore};
use pomodoro_cycle::{EngineConfig, SessionEngine, StatsReport};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    match execute(cli).await {
        // The stdin reader may still be parked in a blocking read, which
        // would hold up runtime shutdown.
        Ok(()) => std::process::exit(0),
        Err(e) => {
            Display::show_error(&format!("{:#}", e));
            std::process::exit(1);
        }
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Run(args)) => {
            let storage = open_storage(cli.data_dir)?;
            run_session(storage, args).await?;
        }
        Some(Commands::Settings { action }) => {
            let storage = open_storage(cli.data_dir)?;
            let mut settings = SettingsStore::load(storage);

            match action.unwrap_or(SettingsAction::Show) {
                SettingsAction::Show => Display::show_settings(settings.settings()),
                SettingsAction::Set(args) => {
                    let patch = args.to_patch(&settings.settings().durations);
                    if patch.is_empty() {
                        bail!("変更する設定を指定してください (--help で一覧を表示)");
                    }

                    if patch.durations.is_some() {
                        let mut candidate = settings.settings().clone();
                        candidate.apply(patch.clone());
                        if let Err(reason) = candidate.validate() {
                            bail!(reason);
                        }
                    }

                    Display::show_settings_updated(settings.update(patch));
                }
                SettingsAction::Reset => {
                    Display::show_settings_reset(settings.reset_to_defaults());
                }
            }
        }
        Some(Commands::Stats) => {
            let storage = open_storage(cli.data_dir)?;
            let stats = StatsStore::load(storage);
            let report = StatsReport {
                records: stats.records().to_vec(),
                summary: stats.summary(),
            };
            Display::show_stats(&report, Local::now().date_naive());
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Opens the file store under `--data-dir` or the platform data directory.
fn open_storage(data_dir: Option<PathBuf>) -> Result<Arc<dyn KeyValueStore>> {
    let dir = match data_dir {
        Some(dir) => dir,
        None => FileStore::default_dir().context("データディレクトリを特定できません")?,
    };
    tracing::debug!("Data directory: {}", dir.display());
    Ok(Arc::new(FileStore::new(dir)))
}

/// Builds the engine with real side effects and runs it interactively.
async fn run_session(storage: Arc<dyn KeyValueStore>, args: RunArgs) -> Result<()> {
    let settings = SettingsStore::load(Arc::clone(&storage));
    let stats = StatsStore::load(storage);

    let sound = try_create_player().map(|player| Box::new(player) as Box<dyn SoundPlayer>);
    let sender = DesktopNotificationSender::detect().await;
    let notifier = Notifier::new(sound, Box::new(sender));

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let config = EngineConfig {
        rollover_delay: args.rollover_delay,
    };
    let engine = SessionEngine::new(config, settings, stats, notifier, event_tx);

    run_interactive(engine, event_rx, args.start).await
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
