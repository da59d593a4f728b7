// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

pub const ESC: char = '\x1b';
pub const ESC_STR: &str = "\x1b";
pub const CSI: &str = "\x1b[";

pub const CLEAR_SCREEN_DOWN: &str = "\x1b[0J";
pub const CLEAR_TO_LINE_BEGINNING: &str = "\x1b[1K";
pub const CLEAR_TO_LINE_END: &str = "\x1b[0K";
pub const CLEAR_ENTIRE_LINE: &str = "\x1b[2K";

/// Written after a committed line, and by the completion listing.
pub const CRLF: &str = "\r\n";
