use ratatui::text::Span;

/// Cursor over a single-line text field. The text itself lives in the form
/// or draft that owns it; the cursor only tracks a character column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineCursor {
    pub col: usize,
}

impl LineCursor {
    pub fn at_end(text: &str) -> Self {
        Self { col: text.chars().count() }
    }

    /// Byte offset of the cursor (UTF-8 safe)
    fn byte_index(&self, text: &str) -> usize {
        text.char_indices()
            .nth(self.col)
            .map(|(i, _)| i)
            .unwrap_or(text.len())
    }

    /// Keep the cursor inside the text after it changed underneath us
    pub fn clamp(&mut self, text: &str) {
        self.col = self.col.min(text.chars().count());
    }

    pub fn insert_char(&mut self, text: &mut String, ch: char) {
        self.clamp(text);
        let index = self.byte_index(text);
        text.insert(index, ch);
        self.col += 1;
    }

    /// Backspace
    pub fn delete_char(&mut self, text: &mut String) {
        self.clamp(text);
        if self.col == 0 {
            return;
        }
        self.col -= 1;
        let index = self.byte_index(text);
        text.remove(index);
    }

    /// Delete key
    pub fn delete_forward(&mut self, text: &mut String) {
        self.clamp(text);
        if self.col < text.chars().count() {
            let index = self.byte_index(text);
            text.remove(index);
        }
    }

    pub fn move_left(&mut self) {
        self.col = self.col.saturating_sub(1);
    }

    pub fn move_right(&mut self, text: &str) {
        if self.col < text.chars().count() {
            self.col += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.col = 0;
    }

    pub fn move_end(&mut self, text: &str) {
        self.col = text.chars().count();
    }

    /// Display width of the text before the cursor; wide characters take two cells
    pub fn display_offset(&self, text: &str) -> u16 {
        let prefix: String = text.chars().take(self.col).collect();
        u16::try_from(Span::raw(prefix).width()).unwrap_or(u16::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inserts_at_cursor() {
        let mut text = "helo".to_string();
        let mut cursor = LineCursor { col: 3 };
        cursor.insert_char(&mut text, 'l');
        assert_eq!(text, "hello");
        assert_eq!(cursor.col, 4);
    }

    #[test]
    fn backspace_handles_multibyte_text() {
        let mut text = "買い物".to_string();
        let mut cursor = LineCursor::at_end(&text);
        cursor.delete_char(&mut text);
        assert_eq!(text, "買い");
        assert_eq!(cursor.col, 2);
        cursor.move_home();
        cursor.delete_char(&mut text);
        assert_eq!(text, "買い");
    }

    #[test]
    fn delete_forward_stops_at_end() {
        let mut text = "ab".to_string();
        let mut cursor = LineCursor { col: 1 };
        cursor.delete_forward(&mut text);
        assert_eq!(text, "a");
        cursor.delete_forward(&mut text);
        assert_eq!(text, "a");
    }

    #[test]
    fn cursor_is_clamped_after_external_change() {
        let mut text = "abc".to_string();
        let mut cursor = LineCursor::at_end(&text);
        text.clear();
        cursor.insert_char(&mut text, 'x');
        assert_eq!(text, "x");
        assert_eq!(cursor.col, 1);
    }

    #[test]
    fn display_offset_counts_wide_chars_twice() {
        let cursor = LineCursor { col: 2 };
        assert_eq!(cursor.display_offset("運動する"), 4);
        assert_eq!(cursor.display_offset("abc"), 2);
    }
}
