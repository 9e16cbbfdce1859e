//! Single-line text buffer for the symptom editor.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Cursor movement commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    Forward,
    Back,
    Head,
    End,
}

/// Text with a char-indexed cursor. Never contains newlines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    text: String,
    cursor: usize,
}

impl LineBuffer {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cursor position in chars.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Replaces the content and moves the cursor to the end.
    pub fn set_text(&mut self, text: &str) {
        self.text = single_line(text);
        self.cursor = self.text.chars().count();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Inserts text at the cursor. Line breaks become spaces.
    pub fn insert_str(&mut self, text: &str) {
        let text = single_line(text);
        if text.is_empty() {
            return;
        }
        let byte_idx = char_to_byte_index(&self.text, self.cursor);
        self.text.insert_str(byte_idx, &text);
        self.cursor += text.chars().count();
    }

    pub fn insert_char(&mut self, ch: char) {
        let mut buf = [0u8; 4];
        self.insert_str(ch.encode_utf8(&mut buf));
    }

    /// Deletes the character before the cursor (Backspace semantics).
    pub fn delete_prev_char(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        self.remove_char_at(self.cursor);
    }

    /// Deletes the character at the cursor (Delete key semantics).
    pub fn delete_next_char(&mut self) {
        if self.cursor < self.char_len() {
            self.remove_char_at(self.cursor);
        }
    }

    /// Deletes from the cursor back to the start of the previous word.
    pub fn delete_word_back(&mut self) {
        let chars: Vec<char> = self.text.chars().collect();
        let mut start = self.cursor;
        while start > 0 && chars[start - 1].is_whitespace() {
            start -= 1;
        }
        while start > 0 && !chars[start - 1].is_whitespace() {
            start -= 1;
        }
        let from = char_to_byte_index(&self.text, start);
        let to = char_to_byte_index(&self.text, self.cursor);
        self.text.replace_range(from..to, "");
        self.cursor = start;
    }

    /// Deletes from the cursor to the start of the line.
    pub fn delete_to_head(&mut self) {
        let to = char_to_byte_index(&self.text, self.cursor);
        self.text.replace_range(..to, "");
        self.cursor = 0;
    }

    /// Deletes from the cursor to the end of the line.
    pub fn delete_to_end(&mut self) {
        let from = char_to_byte_index(&self.text, self.cursor);
        self.text.truncate(from);
    }

    pub fn move_cursor(&mut self, movement: CursorMove) {
        self.cursor = match movement {
            CursorMove::Forward => (self.cursor + 1).min(self.char_len()),
            CursorMove::Back => self.cursor.saturating_sub(1),
            CursorMove::Head => 0,
            CursorMove::End => self.char_len(),
        };
    }

    /// Applies an editing key. Returns true if the key was consumed.
    pub fn input(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        match key.code {
            KeyCode::Char('a') if ctrl => self.move_cursor(CursorMove::Head),
            KeyCode::Char('e') if ctrl => self.move_cursor(CursorMove::End),
            KeyCode::Char('u') if ctrl => self.delete_to_head(),
            KeyCode::Char('k') if ctrl => self.delete_to_end(),
            KeyCode::Char('w') if ctrl => self.delete_word_back(),
            KeyCode::Backspace if alt => self.delete_word_back(),
            KeyCode::Char(ch) if !ctrl && !alt => self.insert_char(ch),
            KeyCode::Backspace => self.delete_prev_char(),
            KeyCode::Delete => self.delete_next_char(),
            KeyCode::Left => self.move_cursor(CursorMove::Back),
            KeyCode::Right => self.move_cursor(CursorMove::Forward),
            KeyCode::Home => self.move_cursor(CursorMove::Head),
            KeyCode::End => self.move_cursor(CursorMove::End),
            _ => return false,
        }
        true
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn remove_char_at(&mut self, idx: usize) {
        let start = char_to_byte_index(&self.text, idx);
        let end = char_to_byte_index(&self.text, idx + 1);
        self.text.replace_range(start..end, "");
    }
}

fn single_line(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r', '\t'], " ")
}

fn char_to_byte_index(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map_or(text.len(), |(idx, _)| idx)
}
