//! Interactive session loop.
//!
//! One current-thread task owns the engine and multiplexes:
//! - the 1 s countdown tick
//! - the 10 s meal-time poll
//! - typed commands from the stdin reader thread
//! - Ctrl-C, which stops the timer and saves before exiting

use std::io::{self, BufRead};

use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, TryRecvError};
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::types::{SettingKey, TimerError};

use super::timer::TimerEngine;

/// Countdown tick period
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Meal-time poll period
pub const MEAL_CHECK_INTERVAL: Duration = Duration::from_secs(10);

/// How often typed commands are picked up
pub const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Commands understood by an interactive session.
pub const SESSION_HELP: &str = "\
Commands:
  start              Start a focus session
  stop               Stop the timer (partial focus time is kept)
  dismiss            Close the rest overlay and get back to work
  status             Redraw the status line
  set <key> <value>  Change a setting (durations only while stopped)
  help               Show this help
  quit               Save and exit";

// ============================================================================
// SessionCommand
// ============================================================================

/// A command typed during a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Start,
    Stop,
    Dismiss,
    Status,
    Set { key: String, value: String },
    Help,
    Quit,
    /// Blank line
    Empty,
    Unknown(String),
}

impl SessionCommand {
    /// Parses one input line. Anything unrecognised becomes `Unknown`.
    pub fn parse_line(line: &str) -> Self {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return SessionCommand::Empty;
        };

        match verb.to_ascii_lowercase().as_str() {
            "start" | "s" => SessionCommand::Start,
            "stop" | "x" => SessionCommand::Stop,
            "dismiss" | "d" => SessionCommand::Dismiss,
            "status" => SessionCommand::Status,
            "help" | "?" => SessionCommand::Help,
            "quit" | "exit" | "q" => SessionCommand::Quit,
            "set" => match (words.next(), words.next()) {
                (Some(key), Some(value)) => SessionCommand::Set {
                    key: key.to_string(),
                    value: value.to_string(),
                },
                _ => SessionCommand::Unknown(line.trim().to_string()),
            },
            _ => SessionCommand::Unknown(line.trim().to_string()),
        }
    }
}

/// Whether the session keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Applies one typed command to the engine.
pub fn handle_command(engine: &mut TimerEngine, command: SessionCommand) -> Flow {
    tracing::debug!(?command, "Session command");
    match command {
        SessionCommand::Start => {
            if let Err(e) = engine.start() {
                engine.surface_error(&e);
            }
        }
        SessionCommand::Stop => {
            if !engine.stop() {
                engine.surface_error(&TimerError::NotRunning);
            }
        }
        SessionCommand::Dismiss => match engine.dismiss_overlay() {
            Ok(true) | Err(_) => {}
            Ok(false) if engine.overlay().is_presented() => {
                engine.notify("The rest is locked until the countdown ends.");
            }
            Ok(false) => engine.notify("There is no rest to dismiss."),
        },
        SessionCommand::Status => engine.render(),
        SessionCommand::Set { key, value } => {
            let result = key
                .parse::<SettingKey>()
                .map_err(|_| TimerError::InvalidSetting {
                    key: key.clone(),
                    value: value.clone(),
                })
                .and_then(|key| engine.apply_setting(&key, &value).map(|()| key));
            match result {
                Ok(key) => engine.notify(&format!("{key} set to {value}")),
                Err(e) => engine.surface_error(&e),
            }
        }
        SessionCommand::Help => engine.notify(SESSION_HELP),
        SessionCommand::Quit => return Flow::Quit,
        SessionCommand::Empty => {}
        SessionCommand::Unknown(text) => {
            engine.notify(&format!("Unknown command '{text}'. Type 'help' for a list."));
        }
    }
    Flow::Continue
}

/// Handles every line waiting in `input`.
///
/// A closed input counts as quit.
fn drain_input(engine: &mut TimerEngine, input: &Receiver<String>) -> Flow {
    loop {
        match input.try_recv() {
            Ok(line) => {
                if handle_command(engine, SessionCommand::parse_line(&line)) == Flow::Quit {
                    return Flow::Quit;
                }
            }
            Err(TryRecvError::Empty) => return Flow::Continue,
            Err(TryRecvError::Disconnected) => {
                tracing::info!("Input closed, ending session");
                return Flow::Quit;
            }
        }
    }
}

/// Decides what a finished Ctrl-C listener means for the session.
///
/// A listener that could not be registered only loses Ctrl-C handling;
/// the session keeps running.
fn interrupt_flow(result: io::Result<()>) -> Flow {
    match result {
        Ok(()) => {
            tracing::info!("Interrupted, saving and exiting");
            Flow::Quit
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C, use 'quit' to exit");
            Flow::Continue
        }
    }
}

// ============================================================================
// Event loop
// ============================================================================

/// Starts a thread that forwards stdin lines to the returned channel.
pub fn spawn_input_reader() -> Result<Receiver<String>> {
    let (tx, rx) = crossbeam_channel::unbounded();
    std::thread::Builder::new()
        .name("input-reader".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::debug!(error = %e, "Stopped reading input");
                        break;
                    }
                }
            }
        })
        .context("Failed to start the input reader thread")?;
    Ok(rx)
}

/// Runs the interactive session until quit, end of input, or Ctrl-C.
///
/// The timer is stopped and the settings saved before returning.
pub async fn run(engine: &mut TimerEngine, input: Receiver<String>) -> Result<()> {
    let mut ticker = interval(TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut meal_check = interval(MEAL_CHECK_INTERVAL);
    meal_check.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut input_poll = interval(INPUT_POLL_INTERVAL);
    input_poll.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let interrupted = tokio::signal::ctrl_c();
    tokio::pin!(interrupted);
    let mut listening_for_interrupt = true;

    engine.render();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = engine.tick() {
                    tracing::debug!(error = %e, "Session ended by invalid setting");
                }
            }
            _ = meal_check.tick() => {
                engine.poll_meals();
            }
            _ = input_poll.tick() => {
                if drain_input(engine, &input) == Flow::Quit {
                    break;
                }
            }
            result = &mut interrupted, if listening_for_interrupt => {
                listening_for_interrupt = false;
                if interrupt_flow(result) == Flow::Quit {
                    break;
                }
            }
        }
    }

    engine.shutdown();
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
