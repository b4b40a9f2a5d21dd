//! Command implementations for the CLI interface.
//!
//! Every command loads the list through the same `Controller` the terminal
//! UI uses, so the stored blob looks identical whichever way it was edited.

use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::config::Config;
use crate::controller::Controller;
use crate::kv::FileKvStore;
use crate::tui::run::run_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI interface.
    Ui,

    /// Add a new task.
    Add {
        /// Task text.
        text: String,
    },

    /// List tasks.
    List {
        /// Include deleted tasks.
        #[arg(long)]
        all: bool,
    },

    /// Mark a task done, or not done if it already is.
    Toggle {
        /// Task ID.
        id: u64,
    },

    /// Delete a task. The record is kept in storage, marked as trashed.
    Delete {
        /// Task ID.
        id: u64,
    },

    /// Remove all stored tasks.
    Clear,

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Open the list stored at the configured path, exiting on failure.
fn open_controller(config: &Config) -> Controller<FileKvStore> {
    let kv = FileKvStore::open(&config.store_path);
    match Controller::load(kv) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load tasks: {e}");
            std::process::exit(1);
        }
    }
}

/// Launch the terminal user interface.
pub fn cmd_ui(config: &Config) {
    if let Err(e) = config.ensure_data_dir() {
        eprintln!("Failed to create data directory {}: {e}", config.data_dir().display());
        std::process::exit(1);
    }
    let controller = open_controller(config);
    if let Err(e) = run_tui(controller) {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

/// Add a new task.
pub fn cmd_add(config: &Config, text: String) {
    let mut controller = open_controller(config);
    match controller.create_task(&text) {
        Ok(id) => {
            println!("Added task {id}");
            println!("{}", controller.counters().todo_label());
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

/// Print the list with the counter line.
pub fn cmd_list(config: &Config, all: bool) {
    let controller = open_controller(config);
    println!("{}", controller.date_label());

    if all {
        println!("{:<5} {:<4} {:<6} {}", "ID", "Done", "Trash", "Task");
        for t in controller.store().tasks() {
            println!(
                "{:<5} {:<4} {:<6} {}",
                t.id,
                if t.done { "x" } else { "" },
                if t.trash { "x" } else { "" },
                t.name
            );
        }
    } else if controller.counters().show_empty_message() {
        println!("Your list is empty.");
    } else {
        for t in controller.store().active() {
            let icon = if t.done { crate::view::CHECK_ICON } else { crate::view::UNCHECK_ICON };
            println!("{:<5} {} {}", t.id, icon, t.name);
        }
    }
    println!("{}", controller.counters().todo_label());
}

/// Toggle completion of a task.
pub fn cmd_toggle(config: &Config, id: u64) {
    let mut controller = open_controller(config);
    match controller.toggle_done(id) {
        Ok(true) => println!("Completed {id}"),
        Ok(false) => println!("Reopened {id}"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
    println!("{}", controller.counters().todo_label());
}

/// Soft-delete a task.
pub fn cmd_delete(config: &Config, id: u64) {
    let mut controller = open_controller(config);
    match controller.delete_task(id) {
        Ok(true) => println!("Deleted {id}"),
        Ok(false) => println!("Task {id} was already deleted"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
    println!("{}", controller.counters().todo_label());
}

/// Wipe all persisted state.
pub fn cmd_clear(config: &Config) {
    let mut controller = open_controller(config);
    if let Err(e) = controller.clear_all() {
        eprintln!("Failed to clear tasks: {e}");
        std::process::exit(1);
    }
    println!("Cleared.");
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}
