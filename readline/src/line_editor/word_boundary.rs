// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Word spans for `Ctrl+Left`, `Meta+B`, `Ctrl+W` and friends. Word characters are
//! `[A-Za-z0-9_]`, whitespace is Unicode whitespace, and everything else is
//! punctuation. All lengths are in bytes.

use std::sync::LazyLock;

use regex::Regex;

/// Leading whitespace then one run of punctuation or word chars, matched against the
/// reversed text left of the cursor.
static WORD_LEFT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[^A-Za-z0-9_\s]+|[A-Za-z0-9_]+)?")
        .expect("word left pattern is a valid regex")
});

/// One run of whitespace, punctuation or word chars, then trailing whitespace.
static WORD_RIGHT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\s+|[^A-Za-z0-9_\s]+|[A-Za-z0-9_]+)\s*")
        .expect("word right pattern is a valid regex")
});

/// Like [`WORD_RIGHT_REGEX`] but the non-word run may include whitespace.
static DELETE_WORD_RIGHT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\s+|[^A-Za-z0-9_]+|[A-Za-z0-9_]+)\s*")
        .expect("delete word right pattern is a valid regex")
});

/// How far `wordLeft` (and `deleteWordLeft`) reaches back from the end of `before`.
#[must_use]
pub fn word_left_len(before: &str) -> usize {
    // Match on the reversed text so the scan is anchored at the cursor.
    let reversed: String = before.chars().rev().collect();
    WORD_LEFT_REGEX.find(&reversed).map_or(0, |it| it.len())
}

/// How far `wordRight` reaches forward from the start of `after`.
#[must_use]
pub fn word_right_len(after: &str) -> usize {
    WORD_RIGHT_REGEX.find(after).map_or(0, |it| it.len())
}

/// How much `deleteWordRight` removes from the start of `after`.
#[must_use]
pub fn delete_word_right_len(after: &str) -> usize {
    DELETE_WORD_RIGHT_REGEX.find(after).map_or(0, |it| it.len())
}
