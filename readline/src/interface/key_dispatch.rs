// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Maps decoded keys to [`LineEditor`] operations.
//!
//! | Modifier     | Key                      | Operation                          |
//! | ------------ | ------------------------ | ---------------------------------- |
//! | `Ctrl+Shift` | `Backspace` / `Delete`   | delete to line start / end         |
//! | `Ctrl`       | `C`                      | `SIGINT` listeners, or close       |
//! | `Ctrl`       | `D`                      | close on an empty line, else delete|
//! | `Ctrl`       | `H` / `U` / `K`          | delete left / to start / to end    |
//! | `Ctrl`       | `A` / `E` / `B` / `F`    | home / end / char left / right     |
//! | `Ctrl`       | `L`                      | clear screen                       |
//! | `Ctrl`       | `N` / `P`                | history next / previous            |
//! | `Ctrl`       | `Y`                      | yank                               |
//! | `Ctrl`       | `Z`                      | `SIGTSTP` listeners                |
//! | `Ctrl`       | `W` / `Backspace`        | delete word left                   |
//! | `Ctrl`       | `Delete`                 | delete word right                  |
//! | `Ctrl`       | `Left` / `Right`         | word left / right                  |
//! | `Meta`       | `B` / `F`                | word left / right                  |
//! | `Meta`       | `D` / `Delete`           | delete word right                  |
//! | `Meta`       | `Backspace`              | delete word left                   |
//! | `Meta`       | `Y`                      | yank pop                           |
//!
//! `0x1F` undoes and `0x1E` redoes regardless of modifiers.

use std::time::Instant;

use super::Interface;
use crate::{CompletionRequest, CompletionResult, InterfaceEvent, InterfaceEventKind,
            KeyEvent, KeyName, LineEditor, PendingCompletion, ReadlineResult};

const UNDO_CHAR: char = '\x1f';
const REDO_CHAR: char = '\x1e';

impl Interface {
    pub(super) fn tty_write(&mut self, text: Option<&str>, key: &KeyEvent) -> ReadlineResult<()> {
        let previous_key = self.previous_key.replace(key.clone());

        if !(key.meta && key.is_char('y')) {
            self.editor.yanking = false;
        }

        let is_history_key = (key.is(KeyName::Up) || key.is(KeyName::Down))
            && !key.ctrl
            && !key.meta
            && !key.shift;
        self.editor.update_substring_search(is_history_key);

        match key.sequence.chars().next() {
            Some(UNDO_CHAR) => return self.edit(LineEditor::undo),
            Some(REDO_CHAR) => return self.edit(LineEditor::redo),
            _ => {}
        }

        if key.is(KeyName::Escape) {
            return Ok(());
        }

        if key.ctrl && key.shift {
            match key.name {
                Some(KeyName::Backspace) => self.edit(LineEditor::delete_line_left),
                Some(KeyName::Delete) => self.edit(LineEditor::delete_line_right),
                _ => Ok(()),
            }
        } else if key.ctrl {
            self.tty_write_ctrl(key)
        } else if key.meta {
            match key.name {
                Some(KeyName::Char('b')) => self.edit(LineEditor::word_left),
                Some(KeyName::Char('f')) => self.edit(LineEditor::word_right),
                Some(KeyName::Char('d') | KeyName::Delete) => {
                    self.edit(LineEditor::delete_word_right)
                }
                Some(KeyName::Backspace) => self.edit(LineEditor::delete_word_left),
                Some(KeyName::Char('y')) => self.edit(LineEditor::yank_pop),
                _ => Ok(()),
            }
        } else {
            let last_keypress_was_tab = previous_key.is_some_and(|it| it.is(KeyName::Tab));
            self.tty_write_plain(text, key, last_keypress_was_tab)
        }
    }

    fn tty_write_ctrl(&mut self, key: &KeyEvent) -> ReadlineResult<()> {
        match key.name {
            Some(KeyName::Char('c')) => self.interrupt(),
            Some(KeyName::Char('h')) => self.edit(LineEditor::delete_left),
            Some(KeyName::Char('d')) => {
                if self.editor.text().is_empty() {
                    self.close()
                } else {
                    self.edit(LineEditor::delete_right)
                }
            }
            Some(KeyName::Char('u')) => self.edit(LineEditor::delete_line_left),
            Some(KeyName::Char('k')) => self.edit(LineEditor::delete_line_right),
            Some(KeyName::Char('a')) => self.edit(LineEditor::home),
            Some(KeyName::Char('e')) => self.edit(LineEditor::end),
            Some(KeyName::Char('b')) => self.edit(LineEditor::char_left),
            Some(KeyName::Char('f')) => self.edit(LineEditor::char_right),
            Some(KeyName::Char('l')) => self.edit(LineEditor::clear_screen),
            Some(KeyName::Char('n')) => self.edit(LineEditor::history_next),
            Some(KeyName::Char('p')) => self.edit(LineEditor::history_prev),
            Some(KeyName::Char('y')) => self.edit(LineEditor::yank),
            Some(KeyName::Char('z')) => {
                if self.listeners.count(InterfaceEventKind::Sigtstp) > 0 {
                    self.listeners.emit(&InterfaceEvent::Sigtstp);
                } else {
                    tracing::debug!(message = "ctrl+z ignored, no SIGTSTP listener");
                }
                Ok(())
            }
            Some(KeyName::Char('w') | KeyName::Backspace) => {
                self.edit(LineEditor::delete_word_left)
            }
            Some(KeyName::Delete) => self.edit(LineEditor::delete_word_right),
            Some(KeyName::Left) => self.edit(LineEditor::word_left),
            Some(KeyName::Right) => self.edit(LineEditor::word_right),
            _ => Ok(()),
        }
    }

    fn tty_write_plain(
        &mut self,
        text: Option<&str>,
        key: &KeyEvent,
        last_keypress_was_tab: bool,
    ) -> ReadlineResult<()> {
        // `\r` bookkeeping only matters if `\n` comes right after.
        if self.saw_return_at.is_some() && !key.is(KeyName::Enter) {
            self.saw_return_at = None;
        }

        match key.name {
            Some(KeyName::Return) => {
                self.saw_return_at = Some(Instant::now());
                self.commit_line()
            }
            Some(KeyName::Enter) => self.on_enter(),
            Some(KeyName::Backspace) => self.edit(LineEditor::delete_left),
            Some(KeyName::Delete) => self.edit(LineEditor::delete_right),
            Some(KeyName::Left) => self.edit(LineEditor::char_left),
            Some(KeyName::Right) => self.edit(LineEditor::char_right),
            Some(KeyName::Home) => self.edit(LineEditor::home),
            Some(KeyName::End) => self.edit(LineEditor::end),
            Some(KeyName::Up) => self.edit(LineEditor::history_prev),
            Some(KeyName::Down) => self.edit(LineEditor::history_next),
            Some(KeyName::Tab) if self.completer.is_some() && self.completion_enabled => {
                self.start_completion(last_keypress_was_tab)
            }
            _ => self.insert_with_line_endings(text),
        }
    }

    /// `\n` right after `\r` (within the CRLF delay) is part of the same line ending.
    fn on_enter(&mut self) -> ReadlineResult<()> {
        let is_crlf = self
            .saw_return_at
            .take()
            .is_some_and(|at| at.elapsed() <= self.crlf_delay);
        if is_crlf { Ok(()) } else { self.commit_line() }
    }

    /// Pasted text can contain line endings, each one commits a line.
    fn insert_with_line_endings(&mut self, text: Option<&str>) -> ReadlineResult<()> {
        let Some(mut rest) = text else {
            return Ok(());
        };

        while let Some((start, end)) = find_line_ending(rest) {
            self.insert_text(&rest[..start])?;
            self.commit_line()?;
            rest = &rest[end..];
        }

        self.insert_text(rest)
    }

    fn insert_text(&mut self, text: &str) -> ReadlineResult<()> {
        if text.is_empty() {
            return Ok(());
        }
        self.edit(|editor, out| editor.insert_string(out, text))
    }

    /// `TERM=dumb`: no cursor movement at all. Text is echoed as it arrives and only
    /// `Ctrl+C`, `Ctrl+D`, return and enter mean anything.
    pub(super) fn tty_write_dumb(
        &mut self,
        text: Option<&str>,
        key: &KeyEvent,
    ) -> ReadlineResult<()> {
        if key.is(KeyName::Escape) {
            return Ok(());
        }

        if self.saw_return_at.is_some() && !key.is(KeyName::Enter) {
            self.saw_return_at = None;
        }

        if key.ctrl {
            if key.is_char('c') {
                return self.interrupt();
            }
            if key.is_char('d') {
                return self.close();
            }
        }

        match key.name {
            Some(KeyName::Return) => {
                self.saw_return_at = Some(Instant::now());
                self.commit_line()
            }
            Some(KeyName::Enter) => self.on_enter(),
            _ => match text {
                Some(text) if !text.is_empty() => {
                    self.editor.line_state.insert_at_cursor(text);
                    self.write_output(text)
                }
                _ => Ok(()),
            },
        }
    }

    /// Asks the completer about the text left of the cursor. Input is paused until the
    /// completion is applied.
    fn start_completion(&mut self, last_keypress_was_tab: bool) -> ReadlineResult<()> {
        self.pause_inner();

        let before_cursor = self.editor.line_state.before_cursor().to_string();
        let pending = match self.completer.as_mut() {
            Some(completer) => completer.complete(&before_cursor),
            None => return self.resume_inner(),
        };

        match pending {
            PendingCompletion::Ready(result) => {
                self.finish_completion(result, last_keypress_was_tab)
            }
            PendingCompletion::Waiting(future) => {
                tracing::debug!(message = "waiting for async completer", line = %before_cursor);
                self.pending_completion = Some(CompletionRequest {
                    future,
                    last_keypress_was_tab,
                });
                Ok(())
            }
        }
    }

    /// Applies a completion result and resumes input. A completer error is shown to the
    /// user and editing carries on.
    ///
    /// # Errors
    ///
    /// Returns an error if the output can't be written to.
    pub fn finish_completion(
        &mut self,
        result: CompletionResult,
        last_keypress_was_tab: bool,
    ) -> ReadlineResult<()> {
        if self.closed {
            return Ok(());
        }

        if self.paused {
            self.paused = false;
            self.listeners.emit(&InterfaceEvent::Resume);
        }

        match result {
            Ok(completion) => self.edit(|editor, out| {
                editor.apply_completion(out, completion, last_keypress_was_tab)
            })?,
            Err(error) => {
                tracing::warn!(message = "tab completion failed", error = %error);
                self.write_output(&format!("Tab completion error: {error}"))?;
            }
        }

        self.replay_paused_input()
    }
}

/// Byte range of the first `\r\n`, `\n` or `\r` in `text`.
#[must_use]
pub fn find_line_ending(text: &str) -> Option<(usize, usize)> {
    let start = text.find(['\r', '\n'])?;
    let len = if text[start..].starts_with("\r\n") { 2 } else { 1 };
    Some((start, start + len))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;

    #[test_case("no ending", None)]
    #[test_case("a\nb", Some((1, 2)))]
    #[test_case("a\r\nb", Some((1, 3)))]
    #[test_case("a\rb", Some((1, 2)))]
    #[test_case("a\r", Some((1, 2)))]
    #[test_case("\n\r", Some((0, 1)))]
    fn test_find_line_ending(text: &str, expected: Option<(usize, usize)>) {
        assert_eq!(find_line_ending(text), expected);
    }
}
