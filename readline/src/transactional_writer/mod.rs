// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod transactional_writer_impl;

// Re-export.
pub use transactional_writer_impl::*;
