// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod ansi;
pub mod common;
pub mod display;
pub mod log;
pub mod terminal_io;
pub mod test_fixtures;

// Re-export.
pub use ansi::*;
pub use common::*;
pub use display::*;
pub use log::*;
pub use terminal_io::*;
pub use test_fixtures::*;
