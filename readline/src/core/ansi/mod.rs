// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod ansi_constants;
pub mod cursor_ops;
pub mod strip_control_sequences;

// Re-export.
pub use ansi_constants::*;
pub use cursor_ops::*;
pub use strip_control_sequences::*;
