// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{borrow::Cow, sync::LazyLock};

use regex::Regex;

/// Matches CSI sequences (`ESC [` or the 8 bit `0x9B` introducer), OSC style strings
/// terminated by `BEL`, `ESC \` or `0x9C`, and the short `ESC <final>` forms. Tabs,
/// newlines and printable text never match, so geometry calculations can run on the
/// stripped text.
const ANSI_PATTERN: &str = concat!(
    r"[\x1B\x{9B}][\[\]()#;?]*",
    r"(?:(?:(?:(?:;[-a-zA-Z0-9/#&.:=?%@~_]+)*",
    r"|[a-zA-Z0-9]+(?:;[-a-zA-Z0-9/#&.:=?%@~_]*)*)?",
    r"(?:\x07|\x1B\\|\x{9C}))",
    r"|(?:(?:[0-9]{1,4}(?:;[0-9]{0,4})*)?[0-9A-PR-TZcf-nq-uy=><~]))",
);

static ANSI_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(ANSI_PATTERN).expect("ANSI_PATTERN is a valid regex"));

/// Removes terminal control sequences from `text`. Borrows when there is nothing to
/// remove.
#[must_use]
pub fn strip_control_sequences(text: &str) -> Cow<'_, str> {
    if !text.contains(['\x1b', '\u{9b}']) {
        return Cow::Borrowed(text);
    }
    ANSI_REGEX.replace_all(text, "")
}
