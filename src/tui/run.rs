//! TUI entry point and terminal setup.

use std::io;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::CrosstermBackend, Terminal};
use tracing::info;

use crate::controller::Controller;
use crate::kv::KvStore;
use crate::tui::app::App;

/// Initialise the terminal, run the UI until the user quits, and restore
/// the terminal whether or not the loop failed.
pub fn run_tui<K: KvStore>(controller: Controller<K>) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!("starting UI");
    let mut app = App::new(controller);
    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    info!("UI closed");

    result
}
