//! Main application logic for the terminal user interface.
//!
//! `App` wraps the `Controller`, routes key presses to it according to the
//! focused widget, and draws the list view, counters and popups.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use tracing::warn;

use crate::controller::Controller;
use crate::error::TodoError;
use crate::input::InputField;
use crate::kv::KvStore;
use crate::tui::colors::{ACCENT, DARK_RED, DONE_GRAY, TRASH_RED};
use crate::tui::enums::{AppState, Focus};
use crate::tui::utils::centered_rect;
use crate::view::{Row, RowAction, DELETE_ICON};

const EMPTY_LIST_MESSAGE: &str = "Nothing to do! Add a task above.";

/// Terminal front end over a `Controller`.
pub struct App<K: KvStore> {
    controller: Controller<K>,
    state: AppState,
    focus: Focus,
    list_state: ListState,
    status_message: String,
}

impl<K: KvStore> App<K> {
    pub fn new(controller: Controller<K>) -> Self {
        let mut app = App {
            controller,
            state: AppState::Main,
            focus: Focus::Entry,
            list_state: ListState::default(),
            status_message: String::new(),
        };
        app.clamp_selection();
        app
    }

    pub fn controller(&self) -> &Controller<K> {
        &self.controller
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    fn set_status_message(&mut self, msg: String) {
        self.status_message = msg;
    }

    fn visible_count(&self) -> usize {
        self.controller.view().visible_rows().count()
    }

    /// Keep the list selection on a visible row.
    fn clamp_selection(&mut self) {
        let count = self.visible_count();
        let selected = match self.list_state.selected() {
            _ if count == 0 => None,
            Some(i) if i >= count => Some(count - 1),
            Some(i) => Some(i),
            None => Some(0),
        };
        self.list_state.select(selected);
    }

    fn selected_row(&self) -> Option<&Row> {
        let idx = self.list_state.selected()?;
        self.controller.view().visible_rows().nth(idx)
    }

    /// Run an action bound to the selected row.
    fn dispatch_selected(&mut self, pick: fn(&Row) -> RowAction) {
        let Some(action) = self.selected_row().map(pick) else {
            return;
        };
        if let Err(e) = self.controller.dispatch(action) {
            warn!(error = %e, ?action, "row action failed");
            self.set_status_message(format!("Error: {e}"));
        }
        self.clamp_selection();
    }

    fn submit_entry(&mut self) {
        match self.controller.submit_entry() {
            Ok(id) => self.set_status_message(format!("Added task {id}")),
            Err(TodoError::EmptyTask) => {
                self.state = AppState::Notice;
                self.focus = Focus::Entry;
            }
            Err(e) => {
                warn!(error = %e, "failed to add task");
                self.set_status_message(format!("Error: {e}"));
            }
        }
        self.clamp_selection();
    }

    fn edit_field(field: &mut InputField, key: KeyCode) -> bool {
        match key {
            KeyCode::Char(c) => field.handle_char(c),
            KeyCode::Backspace => field.handle_backspace(),
            KeyCode::Delete => field.handle_delete(),
            KeyCode::Left => field.move_cursor_left(),
            KeyCode::Right => field.move_cursor_right(),
            _ => return false,
        }
        true
    }

    /// Handle keyboard input on the main screen.
    ///
    /// Returns true if the application should quit.
    fn handle_main_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> io::Result<bool> {
        match key {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Ok(true),
            KeyCode::Char('l') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.state = AppState::ConfirmClear;
                return Ok(false);
            }
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return Ok(false);
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                return Ok(false);
            }
            KeyCode::F(1) => {
                self.state = AppState::Help;
                return Ok(false);
            }
            KeyCode::Esc => {
                if self.focus == Focus::Filter && !self.controller.search.value.is_empty() {
                    self.controller.search.clear();
                    self.controller.refilter();
                    self.clamp_selection();
                    return Ok(false);
                }
                return Ok(true);
            }
            _ => {}
        }

        match self.focus {
            Focus::Entry => {
                if key == KeyCode::Enter {
                    self.submit_entry();
                } else {
                    Self::edit_field(&mut self.controller.entry, key);
                }
            }
            Focus::Filter => {
                if key == KeyCode::Enter {
                    self.focus = Focus::List;
                } else if Self::edit_field(&mut self.controller.search, key) {
                    self.controller.refilter();
                    self.clamp_selection();
                }
            }
            Focus::List => match key {
                KeyCode::Up => {
                    if let Some(selected) = self.list_state.selected() {
                        if selected > 0 {
                            self.list_state.select(Some(selected - 1));
                        }
                    }
                }
                KeyCode::Down => {
                    if let Some(selected) = self.list_state.selected() {
                        if selected + 1 < self.visible_count() {
                            self.list_state.select(Some(selected + 1));
                        }
                    }
                }
                KeyCode::Char(' ') | KeyCode::Enter => self.dispatch_selected(Row::toggle),
                KeyCode::Char('d') | KeyCode::Delete => self.dispatch_selected(Row::delete),
                _ => {}
            },
        }
        Ok(false)
    }

    fn handle_notice_input(&mut self) {
        self.controller.dismiss_notice();
        self.state = AppState::Main;
        self.focus = Focus::Entry;
    }

    fn handle_confirm_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                match self.controller.clear_all() {
                    Ok(()) => self.set_status_message("Cleared all tasks".to_string()),
                    Err(e) => {
                        warn!(error = %e, "failed to clear tasks");
                        self.set_status_message(format!("Error clearing tasks: {e}"));
                    }
                }
                self.list_state = ListState::default();
                self.focus = Focus::Entry;
                self.state = AppState::Main;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.state = AppState::Main;
            }
            _ => {}
        }
    }

    /// Route one key press according to the current state.
    ///
    /// Returns true if the application should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> io::Result<bool> {
        if key.kind != KeyEventKind::Press {
            return Ok(false);
        }
        self.status_message.clear();
        match self.state {
            AppState::Main => return self.handle_main_input(key.code, key.modifiers),
            AppState::Notice => self.handle_notice_input(),
            AppState::ConfirmClear => self.handle_confirm_input(key.code),
            AppState::Help => self.state = AppState::Main,
        }
        Ok(false)
    }

    /// Poll for and handle a keyboard event.
    ///
    /// Returns true if the application should quit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                return self.handle_key(key);
            }
        }
        Ok(false)
    }

    fn border_style(&self, focus: Focus) -> Style {
        if self.state == AppState::Main && self.focus == focus {
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        }
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let counters = self.controller.counters();
        let header = Line::from(vec![
            Span::styled(
                self.controller.date_label().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("   "),
            Span::styled(
                counters.todo_label(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
        ]);
        let paragraph = Paragraph::new(header)
            .block(Block::default().borders(Borders::ALL).title("TODO"))
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
    }

    fn render_input(&self, f: &mut Frame, area: Rect, title: &str, field: &InputField, focus: Focus) {
        let style = if field.selected {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        let input = Paragraph::new(field.value.as_str()).style(style).block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(self.border_style(focus)),
        );
        f.render_widget(input, area);

        if self.state == AppState::Main && self.focus == focus {
            let offset = u16::try_from(field.cursor).unwrap_or(u16::MAX);
            let x = area.x.saturating_add(1).saturating_add(offset);
            f.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
        }
    }

    fn row_item(row: &Row) -> ListItem<'static> {
        let (text_style, icon_style) = if row.strikethrough() {
            (
                Style::default().fg(DONE_GRAY).add_modifier(Modifier::CROSSED_OUT),
                Style::default().fg(Color::Green),
            )
        } else {
            (Style::default(), Style::default())
        };
        ListItem::new(Line::from(vec![
            Span::styled(row.check_icon(), icon_style),
            Span::raw(" "),
            Span::styled(row.text().to_string(), text_style),
            Span::raw("  "),
            Span::styled(DELETE_ICON, Style::default().fg(TRASH_RED)),
        ]))
    }

    fn render_list(&mut self, f: &mut Frame, area: Rect) {
        let view = self.controller.view();
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Tasks ({}/{})", view.visible_rows().count(), view.rows().len()))
            .border_style(self.border_style(Focus::List));

        if self.controller.counters().show_empty_message() {
            let message = Paragraph::new(EMPTY_LIST_MESSAGE)
                .style(Style::default().fg(DONE_GRAY))
                .alignment(Alignment::Center)
                .block(block);
            f.render_widget(message, area);
            return;
        }

        let items: Vec<ListItem> = view.visible_rows().map(Self::row_item).collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");
        f.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.focus {
                Focus::Entry => "Enter: add | Tab: next | Ctrl+L: clear all | F1: help | Esc: quit",
                Focus::List => "Space: toggle | d: delete | Tab: next | F1: help | Esc: quit",
                Focus::Filter => "Type to filter | Enter: to list | Esc: clear filter",
            }
            .to_string()
        };
        let status = Paragraph::new(status_text)
            .style(Style::default().bg(ACCENT).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    fn render_popup(&self, f: &mut Frame, area: Rect, title: &str, lines: Vec<Line>) {
        let area = centered_rect(50, 30, area);
        f.render_widget(Clear, area);
        let block = Block::default()
            .title(title.to_string())
            .borders(Borders::ALL)
            .style(Style::default().bg(DARK_RED));
        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from(Span::styled("Keys", Style::default().add_modifier(Modifier::BOLD))),
            Line::from(""),
            Line::from("Tab / Shift+Tab   move between entry, list and filter"),
            Line::from("Enter             add the typed task (entry)"),
            Line::from("Space / Enter     toggle done (list)"),
            Line::from("d / Delete        delete task (list)"),
            Line::from("Ctrl+L            clear everything"),
            Line::from("Esc / Ctrl+C      quit"),
            Line::from(""),
            Line::from("Press any key to return"),
        ];
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Help"))
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }

    /// Main render function.
    pub fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // date and counter
                Constraint::Length(3), // entry
                Constraint::Length(3), // filter
                Constraint::Min(3),    // list
                Constraint::Length(1), // status bar
            ])
            .split(f.area());

        if self.state == AppState::Help {
            self.render_help(f, chunks[0].union(chunks[3]));
            self.render_status_bar(f, chunks[4]);
            return;
        }

        self.render_header(f, chunks[0]);
        self.render_input(f, chunks[1], "New task", &self.controller.entry, Focus::Entry);
        self.render_input(f, chunks[2], "Filter", &self.controller.search, Focus::Filter);
        self.render_list(f, chunks[3]);
        self.render_status_bar(f, chunks[4]);

        let full = f.area();
        match self.state {
            AppState::Notice => {
                let message = self.controller.notice().unwrap_or_default().to_string();
                self.render_popup(
                    f,
                    full,
                    "Notice",
                    vec![
                        Line::from(""),
                        Line::from(Span::styled(message, Style::default().add_modifier(Modifier::BOLD))),
                        Line::from(""),
                        Line::from("Press any key to continue"),
                    ],
                );
            }
            AppState::ConfirmClear => self.render_popup(
                f,
                full,
                "Confirm Action",
                vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        "Delete every stored task?",
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from("This action cannot be undone."),
                    Line::from(""),
                    Line::from("Press 'y' to confirm, 'n' to cancel"),
                ],
            ),
            _ => {}
        }
    }

    /// Main event loop for the TUI application.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryKvStore;
    use ratatui::backend::TestBackend;

    fn app() -> App<MemoryKvStore> {
        App::new(Controller::load(MemoryKvStore::new()).unwrap())
    }

    fn press(app: &mut App<MemoryKvStore>, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE)).unwrap()
    }

    fn type_text(app: &mut App<MemoryKvStore>, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn add(app: &mut App<MemoryKvStore>, text: &str) {
        type_text(app, text);
        press(app, KeyCode::Enter);
    }

    fn screen(app: &mut App<MemoryKvStore>) -> String {
        let backend = TestBackend::new(70, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();

        let buf = terminal.backend().buffer();
        let area = buf.area;
        let mut lines = Vec::new();
        for y in area.y..area.y + area.height {
            let mut line = String::new();
            for x in area.x..area.x + area.width {
                line.push_str(buf[(x, y)].symbol());
            }
            lines.push(line.trim_end().to_string());
        }
        lines.join("\n")
    }

    #[test]
    fn test_cursor_stays_inside_entry_for_long_text() {
        let mut controller = Controller::load(MemoryKvStore::new()).unwrap();
        controller.entry = InputField::with_value(&"x".repeat(70_000));
        let mut app = App::new(controller);

        let mut terminal = Terminal::new(TestBackend::new(70, 20)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        let cursor = terminal.get_cursor_position().unwrap();
        assert_eq!((cursor.x, cursor.y), (68, 4));
    }

    #[test]
    fn test_empty_screen_shows_message() {
        let mut app = app();
        let out = screen(&mut app);
        assert!(out.contains(EMPTY_LIST_MESSAGE));
        assert!(out.contains("0 to do"));
        assert!(out.contains(app.controller().date_label()));
    }

    #[test]
    fn test_add_from_entry() {
        let mut app = app();
        add(&mut app, "Buy milk");

        let out = screen(&mut app);
        assert!(out.contains("Buy milk"));
        assert!(out.contains("1 to do"));
        assert!(!out.contains(EMPTY_LIST_MESSAGE));
        assert!(app.controller().entry.value.is_empty());
    }

    #[test]
    fn test_blank_entry_raises_notice() {
        let mut app = app();
        type_text(&mut app, "   ");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state(), AppState::Notice);
        assert!(screen(&mut app).contains("Please fill out todo input"));
        assert!(app.controller().store().is_empty());

        // Any key dismisses it and the entry keeps focus.
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.state(), AppState::Main);
        assert_eq!(app.focus(), Focus::Entry);
        assert!(app.controller().notice().is_none());
        assert_eq!(app.controller().entry.value, "   ");

        // The selected contents are replaced by the next character.
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.controller().entry.value, "a");
    }

    #[test]
    fn test_toggle_and_delete_from_list() {
        let mut app = app();
        add(&mut app, "Buy milk");
        add(&mut app, "Walk dog");

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus(), Focus::List);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.controller().store().get(0).unwrap().done);
        assert!(screen(&mut app).contains("1 to do"));

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('d'));
        assert!(app.controller().store().get(1).unwrap().trash);
        assert_eq!(app.controller().view().rows().len(), 1);
        assert!(screen(&mut app).contains("0 to do"));
    }

    #[test]
    fn test_filter_is_live() {
        let mut app = app();
        add(&mut app, "Buy milk");
        add(&mut app, "Walk dog");

        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focus(), Focus::Filter);
        type_text(&mut app, "MILK");

        let out = screen(&mut app);
        assert!(out.contains("Buy milk"));
        assert!(!out.contains("Walk dog"));
        assert!(out.contains("2 to do"));

        // Esc clears the filter before it quits.
        assert!(!press(&mut app, KeyCode::Esc));
        assert!(screen(&mut app).contains("Walk dog"));
        assert!(press(&mut app, KeyCode::Esc));
    }

    #[test]
    fn test_clear_all_needs_confirmation() {
        let mut app = app();
        add(&mut app, "Buy milk");

        app.handle_key(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL)).unwrap();
        assert_eq!(app.state(), AppState::ConfirmClear);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.controller().store().len(), 1);

        app.handle_key(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL)).unwrap();
        press(&mut app, KeyCode::Char('y'));
        assert!(app.controller().store().is_empty());
        assert!(screen(&mut app).contains(EMPTY_LIST_MESSAGE));
    }
}
