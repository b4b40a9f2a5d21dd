//! Single-line text input handling.

/// A text input field with cursor position and selection state.
///
/// The cursor counts characters, not bytes.
#[derive(Debug, Clone, Default)]
pub struct InputField {
    pub value: String,
    pub cursor: usize,
    /// Whole contents selected; the next edit replaces them.
    pub selected: bool,
}

impl InputField {
    /// Create a new empty input field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an input field with initial text value.
    pub fn with_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.chars().count(),
            selected: false,
        }
    }

    fn byte_index(&self, cursor: usize) -> usize {
        self.value
            .char_indices()
            .nth(cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    fn len_chars(&self) -> usize {
        self.value.chars().count()
    }

    fn take_selection(&mut self) -> bool {
        if self.selected {
            self.clear();
            true
        } else {
            false
        }
    }

    /// Insert a character at the current cursor position.
    pub fn handle_char(&mut self, c: char) {
        self.take_selection();
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub fn handle_backspace(&mut self) {
        if self.take_selection() {
            return;
        }
        if self.cursor > 0 {
            let at = self.byte_index(self.cursor - 1);
            self.value.remove(at);
            self.cursor -= 1;
        }
    }

    /// Delete the character at the cursor position.
    pub fn handle_delete(&mut self) {
        if self.take_selection() {
            return;
        }
        if self.cursor < self.len_chars() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    /// Move cursor one position to the left.
    pub fn move_cursor_left(&mut self) {
        self.selected = false;
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    /// Move cursor one position to the right.
    pub fn move_cursor_right(&mut self) {
        self.selected = false;
        if self.cursor < self.len_chars() {
            self.cursor += 1;
        }
    }

    /// Select the whole contents.
    pub fn select_all(&mut self) {
        self.selected = true;
        self.cursor = self.len_chars();
    }

    /// Empty the field.
    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
        self.selected = false;
    }
}
