//! # todo - single-list task manager
//!
//! Add short text items, tick them off, delete them and filter them by
//! substring, from an interactive terminal UI or from plain subcommands.
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the UI (the default)
//! todo
//!
//! # Add and complete a task from the shell
//! todo add "Buy milk"
//! todo toggle 0
//!
//! # See what is left
//! todo list
//! ```
//!
//! ## Storage
//!
//! Tasks live in a small key-value file, `~/.todo/store.json` unless
//! `--store` says otherwise. The task list itself is one JSON array under
//! the `TODO` key; deleted tasks stay in it marked `"trash": true`, so ids
//! are never handed out twice.

use std::path::Path;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub mod cli;
pub mod cmd;
pub mod config;
pub mod controller;
pub mod counter;
pub mod error;
pub mod input;
pub mod kv;
pub mod store;
pub mod task;
pub mod view;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod run;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use config::Config;

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Log to stderr for one-shot commands.
fn init_stderr_logging(level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Log to a file while the UI owns the terminal. The guard flushes
/// buffered lines when dropped.
fn init_file_logging(level: &str, log_path: &Path) -> Option<WorkerGuard> {
    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter(level))
        .with_ansi(false)
        .try_init()
        .ok()?;

    Some(guard)
}

fn main() {
    let cli = Cli::parse();

    let config = match Config::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let command = cli.command.unwrap_or(Commands::Ui);

    // The UI owns the terminal, so it logs to a file; everything else
    // logs to stderr.
    let _guard = if matches!(command, Commands::Ui) {
        match config.ensure_data_dir() {
            Ok(()) => init_file_logging(&config.log_level, &config.log_path()),
            Err(_) => None,
        }
    } else {
        init_stderr_logging(&config.log_level);
        None
    };

    match command {
        Commands::Ui => cmd_ui(&config),
        Commands::Add { text } => cmd_add(&config, text),
        Commands::List { all } => cmd_list(&config, all),
        Commands::Toggle { id } => cmd_toggle(&config, id),
        Commands::Delete { id } => cmd_delete(&config, id),
        Commands::Clear => cmd_clear(&config),
        Commands::Completions { shell } => cmd_completions(shell),
    }
}
