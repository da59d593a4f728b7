// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io::Write;

use crate::{CLEAR_SCREEN_DOWN, ClearLineDirection, ReadlineResult, cursor_to_sequence,
            move_cursor_sequence};

/// Batches cursor and clear sequences and writes them in one go on
/// [`commit()`](Self::commit). With `auto_commit`, every operation is written as soon as
/// it is issued instead.
///
/// ```
/// use r3bl_readline::{ClearLineDirection, StdoutMock, TransactionalWriter};
///
/// # fn main() -> r3bl_readline::ReadlineResult<()> {
/// let stdout_mock = StdoutMock::default();
/// let mut writer = TransactionalWriter::new(stdout_mock.clone());
/// writer
///     .cursor_to(Some(0), None)?
///     .clear_line(ClearLineDirection::ToEnd)?;
/// assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "");
///
/// writer.commit()?;
/// assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "\x1b[1G\x1b[0K");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TransactionalWriter<W: Write> {
    sink: W,
    pending: Vec<String>,
    auto_commit: bool,
}

impl<W: Write> TransactionalWriter<W> {
    pub fn new(sink: W) -> Self { Self::with_auto_commit(sink, false) }

    pub fn with_auto_commit(sink: W, auto_commit: bool) -> Self {
        Self {
            sink,
            pending: vec![],
            auto_commit,
        }
    }

    /// # Errors
    ///
    /// [`crate::ReadlineError::InvalidCursorPosition`] if `y` is given without `x`;
    /// nothing is queued in that case. In auto commit mode, an I/O error.
    pub fn cursor_to(&mut self, x: Option<usize>, y: Option<usize>) -> ReadlineResult<&mut Self> {
        match cursor_to_sequence(x, y)? {
            Some(sequence) => self.push(sequence),
            None => Ok(self),
        }
    }

    /// # Errors
    ///
    /// In auto commit mode, an I/O error.
    pub fn move_cursor(&mut self, dx: isize, dy: isize) -> ReadlineResult<&mut Self> {
        match move_cursor_sequence(dx, dy) {
            Some(sequence) => self.push(sequence),
            None => Ok(self),
        }
    }

    /// # Errors
    ///
    /// In auto commit mode, an I/O error.
    pub fn clear_line(&mut self, direction: ClearLineDirection) -> ReadlineResult<&mut Self> {
        self.push(direction.as_sequence().to_string())
    }

    /// # Errors
    ///
    /// In auto commit mode, an I/O error.
    pub fn clear_screen_down(&mut self) -> ReadlineResult<&mut Self> {
        self.push(CLEAR_SCREEN_DOWN.to_string())
    }

    /// Writes everything queued as a single write and empties the queue.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink can't be written to. The queue is emptied either
    /// way.
    pub fn commit(&mut self) -> ReadlineResult<()> {
        let acc = self.pending.concat();
        self.pending.clear();
        if !acc.is_empty() {
            self.sink.write_all(acc.as_bytes())?;
        }
        self.sink.flush()?;
        Ok(())
    }

    /// Drops everything queued without writing it.
    pub fn rollback(&mut self) -> &mut Self {
        self.pending.clear();
        self
    }

    #[must_use]
    pub fn pending_len(&self) -> usize { self.pending.len() }

    pub fn into_inner(self) -> W { self.sink }

    fn push(&mut self, sequence: String) -> ReadlineResult<&mut Self> {
        if self.auto_commit {
            self.sink.write_all(sequence.as_bytes())?;
        } else {
            self.pending.push(sequence);
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{ReadlineError, StdoutMock};

    #[test]
    fn test_rollback_writes_nothing() {
        let stdout_mock = StdoutMock::default();
        let mut writer = TransactionalWriter::new(stdout_mock.clone());
        writer
            .move_cursor(1, 1)
            .unwrap()
            .clear_line(ClearLineDirection::Entire)
            .unwrap()
            .clear_screen_down()
            .unwrap();
        assert_eq!(writer.pending_len(), 3);

        writer.rollback().commit().unwrap();
        assert_eq!(stdout_mock.get_copy_of_buffer(), Vec::<u8>::new());
    }

    #[test]
    fn test_commit_is_one_write_in_order() {
        let stdout_mock = StdoutMock::default();
        let mut writer = TransactionalWriter::new(stdout_mock.clone());
        writer.cursor_to(Some(2), Some(1)).unwrap();
        writer.move_cursor(-2, 0).unwrap();
        writer.commit().unwrap();
        assert_eq!(
            stdout_mock.get_copy_of_buffer_as_string(),
            "\x1b[2;3H\x1b[2D"
        );
        assert_eq!(writer.pending_len(), 0);

        // A second commit has nothing left to write.
        writer.commit().unwrap();
        assert_eq!(
            stdout_mock.get_copy_of_buffer_as_string(),
            "\x1b[2;3H\x1b[2D"
        );
    }

    #[test]
    fn test_auto_commit_writes_immediately() {
        let stdout_mock = StdoutMock::default();
        let mut writer = TransactionalWriter::with_auto_commit(stdout_mock.clone(), true);
        writer.clear_line(ClearLineDirection::ToBeginning).unwrap();
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "\x1b[1K");
        assert_eq!(writer.pending_len(), 0);
    }

    #[test]
    fn test_invalid_cursor_position_queues_nothing() {
        let mut writer = TransactionalWriter::new(StdoutMock::default());
        assert!(matches!(
            writer.cursor_to(None, Some(3)),
            Err(ReadlineError::InvalidCursorPosition)
        ));
        assert_eq!(writer.pending_len(), 0);
    }
}
