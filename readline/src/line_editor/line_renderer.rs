// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Redraw logic. The editor remembers which row the cursor was left on
//! ([`LineEditor::prev_rows`]) so a redraw can climb back to the first row of the prompt,
//! clear everything below, and paint `prompt + line` again.

use std::io::Write;

use super::LineEditor;
use crate::{CRLF, DisplayPosition, ReadlineResult, clear_screen_down,
            compute_display_position, cursor_to, move_cursor};

pub const DEFAULT_TAB_SIZE: usize = 8;

impl LineEditor {
    #[must_use]
    pub fn display_position(&self, text: &str) -> DisplayPosition {
        compute_display_position(text, self.columns, self.tab_size)
    }

    /// Where the cursor is on screen, relative to the start of the prompt.
    #[must_use]
    pub fn cursor_position(&self) -> DisplayPosition {
        let before_cursor = format!("{}{}", self.prompt, self.line_state.before_cursor());
        self.display_position(&before_cursor)
    }

    /// Repaints the prompt and line, then puts the cursor back where it belongs.
    ///
    /// # Errors
    ///
    /// Returns an error if the output can't be written to.
    pub fn refresh_line(&mut self, out: &mut dyn Write) -> ReadlineResult<()> {
        let line = format!("{}{}", self.prompt, self.line_state.text);
        let line_position = self.display_position(&line);
        let cursor_position = self.cursor_position();

        // Back to the first row of the prompt.
        if self.prev_rows > 0 {
            move_cursor(out, 0, -rows_to_isize(self.prev_rows))?;
        }

        cursor_to(out, Some(0), None)?;
        clear_screen_down(out)?;

        out.write_all(line.as_bytes())?;

        // Force the terminal to allocate the new row.
        if line_position.cols == 0 {
            out.write_all(b" ")?;
        }

        cursor_to(out, Some(cursor_position.cols), None)?;

        let diff = line_position.rows.saturating_sub(cursor_position.rows);
        if diff > 0 {
            move_cursor(out, 0, -rows_to_isize(diff))?;
        }

        self.prev_rows = cursor_position.rows;
        Ok(())
    }

    /// Moves the cursor to byte offset `target` (clamped, snapped to a `char` boundary).
    /// Staying on the same row emits a relative column move, anything else redraws.
    ///
    /// # Errors
    ///
    /// Returns an error if the output can't be written to.
    pub fn move_cursor_to(&mut self, out: &mut dyn Write, target: usize) -> ReadlineResult<()> {
        if target == self.line_state.cursor {
            return Ok(());
        }

        let old_position = self.cursor_position();
        self.line_state.set_cursor(target);
        let new_position = self.cursor_position();

        if old_position.rows == new_position.rows {
            let dx = cols_to_isize(new_position.cols) - cols_to_isize(old_position.cols);
            move_cursor(out, dx, 0)
        } else {
            self.refresh_line(out)
        }
    }

    /// Inserts `text` at the cursor. Typing at the end of the line only echoes the text
    /// unless that wraps onto a new row.
    ///
    /// # Errors
    ///
    /// Returns an error if the output can't be written to.
    pub fn insert_string(&mut self, out: &mut dyn Write, text: &str) -> ReadlineResult<()> {
        self.before_edit();

        if !self.line_state.is_cursor_at_end() {
            self.line_state.insert_at_cursor(text);
            return self.refresh_line(out);
        }

        let old_position = self.cursor_position();
        self.line_state.insert_at_cursor(text);
        let new_position = self.cursor_position();

        if old_position.rows < new_position.rows {
            self.refresh_line(out)
        } else {
            out.write_all(text.as_bytes())?;
            Ok(())
        }
    }

    /// Moves below the line, starts a new row, and empties the line.
    ///
    /// # Errors
    ///
    /// Returns an error if the output can't be written to.
    pub fn clear_line(&mut self, out: &mut dyn Write) -> ReadlineResult<()> {
        self.move_cursor_to(out, usize::MAX)?;
        out.write_all(CRLF.as_bytes())?;
        self.line_state.clear();
        self.prev_rows = 0;
        Ok(())
    }

    /// `Ctrl+L`: home the terminal cursor, wipe the screen and repaint.
    ///
    /// # Errors
    ///
    /// Returns an error if the output can't be written to.
    pub fn clear_screen(&mut self, out: &mut dyn Write) -> ReadlineResult<()> {
        cursor_to(out, Some(0), Some(0))?;
        clear_screen_down(out)?;
        self.refresh_line(out)
    }
}

fn rows_to_isize(rows: usize) -> isize { isize::try_from(rows).unwrap_or(isize::MAX) }

fn cols_to_isize(cols: usize) -> isize { isize::try_from(cols).unwrap_or(isize::MAX) }
