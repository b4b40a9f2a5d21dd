//! Color constants for the terminal user interface.

use ratatui::style::Color;

/// Header band and focused borders
pub const ACCENT: Color = Color::Rgb(0, 120, 140);
/// Completed task text
pub const DONE_GRAY: Color = Color::Rgb(110, 110, 110);
/// Delete icon
pub const TRASH_RED: Color = Color::Rgb(200, 60, 60);
/// Notice and confirmation popups
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);
