//! Enumerations for TUI state management.

/// Which screen layer is receiving keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Main,
    /// Blocking notice; any key dismisses it.
    Notice,
    ConfirmClear,
    Help,
}

/// Widget with keyboard focus on the main screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Entry,
    List,
    Filter,
}

impl Focus {
    /// Next widget in Tab order.
    pub fn next(self) -> Self {
        match self {
            Focus::Entry => Focus::List,
            Focus::List => Focus::Filter,
            Focus::Filter => Focus::Entry,
        }
    }

    /// Previous widget in Tab order.
    pub fn prev(self) -> Self {
        match self {
            Focus::Entry => Focus::Filter,
            Focus::List => Focus::Entry,
            Focus::Filter => Focus::List,
        }
    }
}
