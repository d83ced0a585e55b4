//! Refresh Pomodoro - a terminal focus timer
//!
//! This tool helps you stay focused and rested:
//! - 25 minutes of focused work
//! - 5 minutes of rest, optionally locked until it ends
//! - A long rest offered every 4 pomodoros
//! - Meal-time reminders

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};

use refresh_pomodoro::cli::{Cli, Commands, ConfigCommand, Display, RunArgs};
use refresh_pomodoro::daemon::{self, Clock, SystemClock, TimerEngine};
use refresh_pomodoro::settings::{default_settings_path, JsonSettingsStore, SettingsStore};
use refresh_pomodoro::types::TimerConfig;
use refresh_pomodoro::ui::TerminalUi;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
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
            let store = JsonSettingsStore::new(settings_path(cli.settings)?);
            run_session(store, &args).await?;
        }
        Some(Commands::Stats) => {
            let store = JsonSettingsStore::new(settings_path(cli.settings)?);
            let settings = store.load(SystemClock.today());
            Display::show_stats(&settings.stats);
        }
        Some(Commands::Config(command)) => {
            let store = JsonSettingsStore::new(settings_path(cli.settings)?);
            configure(&store, command)?;
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

/// Resolves the settings file location.
fn settings_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    explicit
        .or_else(default_settings_path)
        .context("Could not determine the settings directory; pass --settings <PATH>")
}

/// Runs an interactive session until the user quits.
async fn run_session(store: JsonSettingsStore, args: &RunArgs) -> Result<()> {
    let input = daemon::spawn_input_reader()?;
    let ui = TerminalUi::stdout(input.clone());
    let mut engine = TimerEngine::new(Box::new(store), Box::new(ui), Box::new(SystemClock));

    for (key, value) in args.overrides() {
        engine
            .apply_setting(&key, &value)
            .with_context(|| format!("Failed to apply the {} override", key))?;
    }

    Display::show_session_banner();
    if args.start {
        if let Err(e) = engine.start() {
            engine.surface_error(&e);
        }
    }

    daemon::run(&mut engine, input).await
}

/// Handles the `config` subcommands.
fn configure(store: &JsonSettingsStore, command: ConfigCommand) -> Result<()> {
    let today = SystemClock.today();
    let mut settings = store.load(today);

    match command {
        ConfigCommand::Show => {
            Display::show_config(&settings, store.path());
            if let Err(e) = settings.config.validate_for_start() {
                Display::show_validation_warning(&e);
            }
        }
        ConfigCommand::Set { key, value } => {
            settings.config.apply(&key, &value)?;
            store.save(&settings.config, &settings.stats, today)?;
            Display::show_setting_updated(&key, &value);
            if let Err(e) = settings.config.validate_for_start() {
                Display::show_validation_warning(&e);
            }
        }
        ConfigCommand::Reset => {
            store.save(&TimerConfig::default(), &settings.stats, today)?;
            Display::show_reset_success();
        }
    }

    Ok(())
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
