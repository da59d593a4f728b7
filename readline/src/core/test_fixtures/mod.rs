// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod raw_mode_mock;
pub mod stdout_mock;

// Re-export.
pub use raw_mode_mock::*;
pub use stdout_mock::*;
