// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod apply_completion;
pub mod completer;

// Re-export.
pub use apply_completion::*;
pub use completer::*;
