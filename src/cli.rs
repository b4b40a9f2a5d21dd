use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Single-list task manager.
/// Storage defaults to ~/.todo/store.json or a path passed via --store.
#[derive(Parser)]
#[command(name = "todo", version, about = "Single-list task manager with a terminal UI")]
pub struct Cli {
    /// Path to the key-value store file.
    #[arg(long, global = true, env = "TODO_STORE")]
    pub store: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "todo=trace". RUST_LOG takes precedence.
    #[arg(long, global = true, env = "TODO_LOG", default_value = "warn")]
    pub log_level: String,

    /// Subcommand to run; launches the UI when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}
