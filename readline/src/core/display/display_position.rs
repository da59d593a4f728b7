// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{char_display_width, strip_control_sequences};

/// Where the end of a string lands on screen, relative to where it started. `rows` counts
/// wrapped and explicit line breaks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayPosition {
    pub cols: usize,
    pub rows: usize,
}

/// Walks `text` (control sequences stripped) and returns the display position of its
/// end.
///
/// - `columns` is the terminal width. `None` (or zero) means unbounded, so nothing ever
///   wraps.
/// - A newline adds `ceil(offset / columns)` rows, or 1 row if that is zero.
/// - A tab advances to the next multiple of `tab_size`.
/// - A wide character that would straddle the right edge consumes one padding column
///   first.
#[must_use]
pub fn compute_display_position(
    text: &str,
    columns: Option<usize>,
    tab_size: usize,
) -> DisplayPosition {
    let width = columns.filter(|&it| it > 0);
    let tab_size = tab_size.max(1);

    let mut offset: usize = 0;
    let mut rows = 0;

    for ch in strip_control_sequences(text).chars() {
        if ch == '\n' {
            rows += match width {
                Some(width) => offset.div_ceil(width).max(1),
                None => 1,
            };
            offset = 0;
            continue;
        }

        if ch == '\t' {
            offset += tab_size - offset % tab_size;
            continue;
        }

        match char_display_width(ch) {
            it @ (0 | 1) => offset += it,
            _ => {
                if let Some(width) = width
                    && (offset + 1).is_multiple_of(width)
                {
                    offset += 1;
                }
                offset += 2;
            }
        }
    }

    match width {
        Some(width) => {
            let cols = offset % width;
            DisplayPosition {
                cols,
                rows: rows + (offset - cols) / width,
            }
        }
        None => DisplayPosition { cols: offset, rows },
    }
}
