//! Single-line text input with a cursor, shared by forms and the search box.

/// Editable text buffer. The cursor is a char index, so multi-byte input
/// never splits a code point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    chars: Vec<char>,
    cursor: usize,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: &str) -> Self {
        let mut input = Self::new();
        input.set(text);
        input
    }

    pub fn insert_char(&mut self, c: char) {
        self.chars.insert(self.cursor, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.chars.remove(self.cursor);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.chars.len() {
            self.chars.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.chars.len());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.chars.len();
    }

    pub fn clear(&mut self) {
        self.chars.clear();
        self.cursor = 0;
    }

    /// Replace the buffer and park the cursor at the end.
    pub fn set(&mut self, text: &str) {
        self.chars = text.chars().collect();
        self.cursor = self.chars.len();
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// True when the buffer holds nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.chars.iter().all(|c| c.is_whitespace())
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn trimmed(&self) -> String {
        self.text().trim().to_string()
    }

    pub fn cursor_pos(&self) -> usize {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_appends_and_advances_cursor() {
        let mut input = InputState::new();
        for c in "abc".chars() {
            input.insert_char(c);
        }
        assert_eq!(input.text(), "abc");
        assert_eq!(input.cursor_pos(), 3);
    }

    #[test]
    fn test_insert_in_middle() {
        let mut input = InputState::with_text("ac");
        input.move_left();
        input.insert_char('b');
        assert_eq!(input.text(), "abc");
        assert_eq!(input.cursor_pos(), 2);
    }

    #[test]
    fn test_backspace_and_delete_at_edges() {
        let mut input = InputState::with_text("ab");
        input.delete();
        assert_eq!(input.text(), "ab");

        input.move_home();
        input.backspace();
        assert_eq!(input.text(), "ab");

        input.delete();
        assert_eq!(input.text(), "b");
        input.move_end();
        input.backspace();
        assert!(input.is_empty());
    }

    #[test]
    fn test_multibyte_chars() {
        let mut input = InputState::with_text("héllo");
        input.move_left();
        input.move_left();
        input.move_left();
        input.backspace();
        assert_eq!(input.text(), "hllo");
        assert_eq!(input.cursor_pos(), 1);
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut input = InputState::with_text("x");
        input.move_right();
        input.move_right();
        assert_eq!(input.cursor_pos(), 1);
        input.move_left();
        input.move_left();
        assert_eq!(input.cursor_pos(), 0);
    }

    #[test]
    fn test_blank_and_trimmed() {
        let input = InputState::with_text("   ");
        assert!(input.is_blank());
        assert!(!input.is_empty());

        let input = InputState::with_text("  Write spec ");
        assert!(!input.is_blank());
        assert_eq!(input.trimmed(), "Write spec");
    }
}
