// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// The editable line. `cursor` is a byte offset into `text` and always sits on a `char`
/// boundary, so single step movement and deletion never split a character.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineState {
    pub text: String,
    pub cursor: usize,
}

impl LineState {
    #[must_use]
    pub fn new(text: impl Into<String>, cursor: usize) -> Self {
        let mut it = Self {
            text: text.into(),
            cursor: 0,
        };
        it.set_cursor(cursor);
        it
    }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.text.is_empty() }

    #[must_use]
    pub fn len(&self) -> usize { self.text.len() }

    #[must_use]
    pub fn is_cursor_at_end(&self) -> bool { self.cursor >= self.text.len() }

    #[must_use]
    pub fn before_cursor(&self) -> &str { &self.text[..self.cursor] }

    #[must_use]
    pub fn after_cursor(&self) -> &str { &self.text[self.cursor..] }

    /// Clamps to the text and snaps back to the nearest `char` boundary.
    pub fn set_cursor(&mut self, cursor: usize) {
        let mut cursor = cursor.min(self.text.len());
        while !self.text.is_char_boundary(cursor) {
            cursor -= 1;
        }
        self.cursor = cursor;
    }

    /// Byte length of the character left of the cursor, 0 at the start.
    #[must_use]
    pub fn char_len_left(&self) -> usize {
        self.before_cursor()
            .chars()
            .next_back()
            .map_or(0, char::len_utf8)
    }

    /// Byte length of the character right of the cursor, 0 at the end.
    #[must_use]
    pub fn char_len_right(&self) -> usize {
        self.after_cursor().chars().next().map_or(0, char::len_utf8)
    }

    pub fn insert_at_cursor(&mut self, text: &str) {
        self.text.insert_str(self.cursor, text);
        self.cursor += text.len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }
}
