// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod abort_signal;
pub mod driver;
pub mod interface_event;
pub mod interface_impl;
pub mod interface_options;
pub mod key_dispatch;
pub mod normal_write;
pub mod question;

// Re-export.
pub use abort_signal::*;
pub use driver::*;
pub use interface_event::*;
pub use interface_impl::*;
pub use interface_options::*;
pub use key_dispatch::*;
pub use question::*;
