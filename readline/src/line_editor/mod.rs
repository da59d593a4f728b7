// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod history;
pub mod kill_ring;
pub mod line_editor_impl;
pub mod line_renderer;
pub mod line_state;
pub mod undo_redo;
pub mod word_boundary;

// Re-export.
pub use history::*;
pub use kill_ring::*;
pub use line_editor_impl::*;
pub use line_renderer::*;
pub use line_state::*;
pub use undo_redo::*;
pub use word_boundary::*;
