// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io::Write;

use super::{History, KillRing, LineState, UndoRedoStacks, delete_word_right_len,
            word_left_len, word_right_len};
use crate::{DEFAULT_TAB_SIZE, ReadlineResult};

pub const DEFAULT_PROMPT: &str = "> ";

/// The line being edited and everything that outlives a single line: history, kill ring
/// and undo/redo. Every edit takes the output sink and redraws what changed.
#[derive(Debug, Clone)]
pub struct LineEditor {
    pub line_state: LineState,
    pub prompt: String,
    pub history: History,
    pub kill_ring: KillRing,
    pub undo_redo: UndoRedoStacks,
    /// Text left of the cursor when history navigation started.
    pub substring_search: Option<String>,
    /// Set by yank, cleared by any key other than yank-pop.
    pub yanking: bool,
    /// Row of the cursor at the last redraw.
    pub prev_rows: usize,
    /// Terminal width, `None` when unknown.
    pub columns: Option<usize>,
    pub tab_size: usize,
}

impl Default for LineEditor {
    fn default() -> Self { Self::new(DEFAULT_PROMPT, History::default(), None, DEFAULT_TAB_SIZE) }
}

/// The result of committing the current line to history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedLine {
    /// What the line listeners receive.
    pub line: String,
    /// `true` if history took the line, so history listeners should be notified.
    pub history_updated: bool,
}

impl LineEditor {
    #[must_use]
    pub fn new(
        prompt: impl Into<String>,
        history: History,
        columns: Option<usize>,
        tab_size: usize,
    ) -> Self {
        Self {
            line_state: LineState::default(),
            prompt: prompt.into(),
            history,
            kill_ring: KillRing::default(),
            undo_redo: UndoRedoStacks::default(),
            substring_search: None,
            yanking: false,
            prev_rows: 0,
            columns,
            tab_size: tab_size.max(1),
        }
    }

    #[must_use]
    pub fn text(&self) -> &str { &self.line_state.text }

    #[must_use]
    pub fn cursor(&self) -> usize { self.line_state.cursor }

    /// Snapshots the line for undo. Runs before every text mutation.
    pub fn before_edit(&mut self) { self.undo_redo.push_undo(self.line_state.clone()); }

    /// Deletes the character left of the cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if the output can't be written to.
    pub fn delete_left(&mut self, out: &mut dyn Write) -> ReadlineResult<()> {
        let char_len = self.line_state.char_len_left();
        if char_len == 0 {
            return Ok(());
        }
        self.before_edit();
        let start = self.line_state.cursor - char_len;
        self.line_state.text.drain(start..self.line_state.cursor);
        self.line_state.cursor = start;
        self.refresh_line(out)
    }

    /// Deletes the character under the cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if the output can't be written to.
    pub fn delete_right(&mut self, out: &mut dyn Write) -> ReadlineResult<()> {
        let char_len = self.line_state.char_len_right();
        if char_len == 0 {
            return Ok(());
        }
        self.before_edit();
        let start = self.line_state.cursor;
        self.line_state.text.drain(start..start + char_len);
        self.refresh_line(out)
    }

    /// # Errors
    ///
    /// Returns an error if the output can't be written to.
    pub fn delete_word_left(&mut self, out: &mut dyn Write) -> ReadlineResult<()> {
        if self.line_state.cursor == 0 {
            return Ok(());
        }
        self.before_edit();
        let end = self.line_state.cursor;
        let start = end - word_left_len(self.line_state.before_cursor());
        self.line_state.text.drain(start..end);
        self.line_state.cursor = start;
        self.refresh_line(out)
    }

    /// # Errors
    ///
    /// Returns an error if the output can't be written to.
    pub fn delete_word_right(&mut self, out: &mut dyn Write) -> ReadlineResult<()> {
        if self.line_state.is_cursor_at_end() {
            return Ok(());
        }
        self.before_edit();
        let start = self.line_state.cursor;
        let end = start + delete_word_right_len(self.line_state.after_cursor());
        self.line_state.text.drain(start..end);
        self.refresh_line(out)
    }

    /// Kills from the start of the line to the cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if the output can't be written to.
    pub fn delete_line_left(&mut self, out: &mut dyn Write) -> ReadlineResult<()> {
        self.before_edit();
        let killed: String = self.line_state.text.drain(..self.line_state.cursor).collect();
        self.line_state.cursor = 0;
        self.kill_ring.push(&killed);
        self.refresh_line(out)
    }

    /// Kills from the cursor to the end of the line.
    ///
    /// # Errors
    ///
    /// Returns an error if the output can't be written to.
    pub fn delete_line_right(&mut self, out: &mut dyn Write) -> ReadlineResult<()> {
        self.before_edit();
        let killed = self.line_state.text.split_off(self.line_state.cursor);
        self.kill_ring.push(&killed);
        self.refresh_line(out)
    }

    /// # Errors
    ///
    /// Returns an error if the output can't be written to.
    pub fn word_left(&mut self, out: &mut dyn Write) -> ReadlineResult<()> {
        if self.line_state.cursor == 0 {
            return Ok(());
        }
        let len = word_left_len(self.line_state.before_cursor());
        self.move_cursor_to(out, self.line_state.cursor - len)
    }

    /// # Errors
    ///
    /// Returns an error if the output can't be written to.
    pub fn word_right(&mut self, out: &mut dyn Write) -> ReadlineResult<()> {
        if self.line_state.is_cursor_at_end() {
            return Ok(());
        }
        let len = word_right_len(self.line_state.after_cursor());
        self.move_cursor_to(out, self.line_state.cursor + len)
    }

    /// Moves one character left.
    ///
    /// # Errors
    ///
    /// Returns an error if the output can't be written to.
    pub fn char_left(&mut self, out: &mut dyn Write) -> ReadlineResult<()> {
        let char_len = self.line_state.char_len_left();
        self.move_cursor_to(out, self.line_state.cursor - char_len)
    }

    /// Moves one character right.
    ///
    /// # Errors
    ///
    /// Returns an error if the output can't be written to.
    pub fn char_right(&mut self, out: &mut dyn Write) -> ReadlineResult<()> {
        let char_len = self.line_state.char_len_right();
        self.move_cursor_to(out, self.line_state.cursor + char_len)
    }

    /// # Errors
    ///
    /// Returns an error if the output can't be written to.
    pub fn home(&mut self, out: &mut dyn Write) -> ReadlineResult<()> {
        self.move_cursor_to(out, 0)
    }

    /// # Errors
    ///
    /// Returns an error if the output can't be written to.
    pub fn end(&mut self, out: &mut dyn Write) -> ReadlineResult<()> {
        self.move_cursor_to(out, self.line_state.len())
    }

    /// Inserts the head of the kill ring.
    ///
    /// # Errors
    ///
    /// Returns an error if the output can't be written to.
    pub fn yank(&mut self, out: &mut dyn Write) -> ReadlineResult<()> {
        let Some(text) = self.kill_ring.current().map(ToString::to_string) else {
            return Ok(());
        };
        self.yanking = true;
        self.insert_string(out, &text)
    }

    /// Replaces the text just yanked with the next older kill. Only valid straight after
    /// a yank, and a no-op with fewer than two kills.
    ///
    /// # Errors
    ///
    /// Returns an error if the output can't be written to.
    pub fn yank_pop(&mut self, out: &mut dyn Write) -> ReadlineResult<()> {
        if !self.yanking {
            return Ok(());
        }
        let Some((last, next)) = self.kill_ring.rotate() else {
            return Ok(());
        };

        let cursor = self.line_state.cursor;
        let Some(start) = cursor.checked_sub(last.len()) else {
            return Ok(());
        };
        if self.line_state.text.get(start..cursor) != Some(last.as_str()) {
            return Ok(());
        }

        self.before_edit();
        self.line_state.text.replace_range(start..cursor, &next);
        self.line_state.cursor = start + next.len();
        self.refresh_line(out)
    }

    /// # Errors
    ///
    /// Returns an error if the output can't be written to.
    pub fn undo(&mut self, out: &mut dyn Write) -> ReadlineResult<()> {
        let Some(entry) = self.undo_redo.undo(&self.line_state) else {
            return Ok(());
        };
        self.line_state = entry;
        self.refresh_line(out)
    }

    /// # Errors
    ///
    /// Returns an error if the output can't be written to.
    pub fn redo(&mut self, out: &mut dyn Write) -> ReadlineResult<()> {
        let Some(entry) = self.undo_redo.redo(&self.line_state) else {
            return Ok(());
        };
        self.line_state = entry;
        self.refresh_line(out)
    }

    /// Steps to an older history entry matching the substring search.
    ///
    /// # Errors
    ///
    /// Returns an error if the output can't be written to.
    pub fn history_prev(&mut self, out: &mut dyn Write) -> ReadlineResult<()> {
        let len = self.history.len();
        if len == 0 || self.history.current_position().is_some_and(|it| it >= len) {
            return Ok(());
        }
        self.before_edit();
        let search = self.substring_search.clone().unwrap_or_default();
        if let Some(line) = self.history.search_older(&self.line_state.text, &search) {
            self.show_history_line(out, line)?;
        }
        Ok(())
    }

    /// Steps to a newer history entry matching the substring search.
    ///
    /// # Errors
    ///
    /// Returns an error if the output can't be written to.
    pub fn history_next(&mut self, out: &mut dyn Write) -> ReadlineResult<()> {
        if self.history.current_position().is_none() {
            return Ok(());
        }
        self.before_edit();
        let search = self.substring_search.clone().unwrap_or_default();
        if let Some(line) = self.history.search_newer(&self.line_state.text, &search) {
            self.show_history_line(out, line)?;
        }
        Ok(())
    }

    fn show_history_line(&mut self, out: &mut dyn Write, line: String) -> ReadlineResult<()> {
        let cursor = line.len();
        self.line_state = LineState { text: line, cursor };
        self.refresh_line(out)
    }

    /// Plain up or down starts a substring search with the text left of the cursor. Any
    /// other key ends it.
    pub fn update_substring_search(&mut self, is_history_key: bool) {
        if is_history_key {
            if self.substring_search.is_none() {
                self.substring_search = Some(self.line_state.before_cursor().to_string());
            }
        } else if self.substring_search.take().is_some() {
            self.history.reset_position_if_exhausted();
        }
    }

    /// Offers the current line to history.
    pub fn add_history(&mut self) -> CommittedLine {
        let line = &self.line_state.text;
        match self.history.update(line) {
            Some(head) => {
                tracing::debug!(message = "history updated", entries = self.history.len());
                CommittedLine {
                    line: head,
                    history_updated: true,
                }
            }
            None => CommittedLine {
                line: line.clone(),
                history_updated: false,
            },
        }
    }
}
