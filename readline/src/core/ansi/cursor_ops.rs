// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Standalone cursor and clear helpers. Each helper has a pure `*_sequence` form that
//! returns the control sequence, used by [`crate::TransactionalWriter`] to queue output,
//! and a form that writes straight to any [`Write`] sink.

use std::io::Write;

use super::{CLEAR_ENTIRE_LINE, CLEAR_SCREEN_DOWN, CLEAR_TO_LINE_BEGINNING,
            CLEAR_TO_LINE_END, CSI};
use crate::{ReadlineError, ReadlineResult};

/// Which part of the current line [`clear_line()`] erases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearLineDirection {
    ToBeginning,
    ToEnd,
    Entire,
}

impl ClearLineDirection {
    /// Negative clears left of the cursor, positive clears right of the cursor, zero
    /// clears the entire line.
    #[must_use]
    pub fn from_sign(dir: i32) -> Self {
        match dir.signum() {
            -1 => ClearLineDirection::ToBeginning,
            1 => ClearLineDirection::ToEnd,
            _ => ClearLineDirection::Entire,
        }
    }

    #[must_use]
    pub fn as_sequence(self) -> &'static str {
        match self {
            ClearLineDirection::ToBeginning => CLEAR_TO_LINE_BEGINNING,
            ClearLineDirection::ToEnd => CLEAR_TO_LINE_END,
            ClearLineDirection::Entire => CLEAR_ENTIRE_LINE,
        }
    }
}

/// Absolute cursor positioning. Both coordinates are 0 based.
///
/// - Neither coordinate: nothing to do, returns `Ok(None)`.
/// - Column only: `CSI {x+1} G`.
/// - Column and row: `CSI {y+1} ; {x+1} H`.
///
/// # Errors
///
/// [`ReadlineError::InvalidCursorPosition`] if a row is given without a column.
pub fn cursor_to_sequence(
    x: Option<usize>,
    y: Option<usize>,
) -> ReadlineResult<Option<String>> {
    match (x, y) {
        (None, None) => Ok(None),
        (None, Some(_)) => Err(ReadlineError::InvalidCursorPosition),
        (Some(x), None) => Ok(Some(format!("{CSI}{}G", x + 1))),
        (Some(x), Some(y)) => Ok(Some(format!("{CSI}{};{}H", y + 1, x + 1))),
    }
}

/// Relative cursor movement. Returns `None` when both deltas are zero.
#[must_use]
pub fn move_cursor_sequence(dx: isize, dy: isize) -> Option<String> {
    if dx == 0 && dy == 0 {
        return None;
    }

    let mut acc = String::new();

    match dx.signum() {
        -1 => acc.push_str(&format!("{CSI}{}D", dx.unsigned_abs())),
        1 => acc.push_str(&format!("{CSI}{dx}C")),
        _ => {}
    }

    match dy.signum() {
        -1 => acc.push_str(&format!("{CSI}{}A", dy.unsigned_abs())),
        1 => acc.push_str(&format!("{CSI}{dy}B")),
        _ => {}
    }

    Some(acc)
}

/// Moves the cursor to the given 0 based position. Validation happens before anything
/// is written.
///
/// # Errors
///
/// [`ReadlineError::InvalidCursorPosition`] if a row is given without a column, or an
/// I/O error from the sink.
pub fn cursor_to<W: Write + ?Sized>(
    out: &mut W,
    x: Option<usize>,
    y: Option<usize>,
) -> ReadlineResult<()> {
    if let Some(sequence) = cursor_to_sequence(x, y)? {
        out.write_all(sequence.as_bytes())?;
    }
    Ok(())
}

/// Moves the cursor relative to where it is now.
///
/// # Errors
///
/// Returns an error if the sink can't be written to.
pub fn move_cursor<W: Write + ?Sized>(
    out: &mut W,
    dx: isize,
    dy: isize,
) -> ReadlineResult<()> {
    if let Some(sequence) = move_cursor_sequence(dx, dy) {
        out.write_all(sequence.as_bytes())?;
    }
    Ok(())
}

/// Clears part or all of the line the cursor is on.
///
/// # Errors
///
/// Returns an error if the sink can't be written to.
pub fn clear_line<W: Write + ?Sized>(
    out: &mut W,
    direction: ClearLineDirection,
) -> ReadlineResult<()> {
    out.write_all(direction.as_sequence().as_bytes())?;
    Ok(())
}

/// Clears the screen from the cursor down.
///
/// # Errors
///
/// Returns an error if the sink can't be written to.
pub fn clear_screen_down<W: Write + ?Sized>(out: &mut W) -> ReadlineResult<()> {
    out.write_all(CLEAR_SCREEN_DOWN.as_bytes())?;
    Ok(())
}
