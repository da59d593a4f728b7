// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::borrow::Cow;

use unicode_width::UnicodeWidthChar;

use crate::strip_control_sequences;

/// Terminal cell count of a single character: 0 for control, combining and other zero
/// width characters, 2 for wide (CJK, emoji) characters, 1 otherwise.
#[must_use]
pub fn char_display_width(ch: char) -> usize {
    if ch.is_control() {
        return 0;
    }
    UnicodeWidthChar::width(ch).unwrap_or(0)
}

/// Sum of [`char_display_width()`] over `text`, optionally ignoring terminal control
/// sequences.
///
/// Combining marks are zero width, so composed and decomposed forms of the same text
/// measure the same and no normalization pass is needed.
#[must_use]
pub fn measure_display_width(text: &str, strip_control: bool) -> usize {
    let text = if strip_control {
        strip_control_sequences(text)
    } else {
        Cow::Borrowed(text)
    };
    text.chars().map(char_display_width).sum()
}
