// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Skip rustfmt for rest of file.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]

//! # r3bl_readline
//!
//! An interactive terminal line editing engine. It turns a raw, possibly fragmented
//! stream of terminal input bytes into structured key events, maintains an editable line
//! with history, undo/redo and a kill ring, and redraws the line using cursor and clear
//! control sequences while accounting for wide Unicode.
//!
//! The moving parts, leaf first:
//!
//! | Module                  | What it does                                               |
//! | ----------------------- | ---------------------------------------------------------- |
//! | [`key_decoder`]         | CSI / SS3 / single-unit key decoding, escape timeout       |
//! | [`core::display`]       | display width and row/column geometry                      |
//! | [`line_editor`]         | line buffer, history, kill ring, undo/redo, redraw         |
//! | [`completion`]          | tab completion via a user supplied completer               |
//! | [`interface`]           | public API, events, question, async driver                 |
//! | [`transactional_writer`]| batched control sequence output with commit / rollback     |
//!
//! # Example
//!
//! ```no_run
//! use r3bl_readline::{run, Interface, InterfaceEventKind, InterfaceOptions};
//!
//! # async fn example() -> miette::Result<()> {
//! let options = InterfaceOptions { terminal: true, ..Default::default() };
//! let safe_interface = Interface::for_stdio(None, options)?.into_safe();
//! safe_interface
//!     .lock()
//!     .map_err(|_| miette::miette!("poisoned"))?
//!     .on(InterfaceEventKind::Line, |event| println!("{event:?}"))?;
//! run(safe_interface).await?;
//! # Ok(())
//! # }
//! ```

// Enforce strict error handling in production library code only. Tests are allowed to
// use .unwrap() (workspace `Cargo.toml` config allows it).
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach sources.
pub mod completion;
pub mod core;
pub mod interface;
pub mod key_decoder;
pub mod line_editor;
pub mod transactional_writer;

// Re-export.
pub use completion::*;
pub use core::*;
pub use interface::*;
pub use key_decoder::*;
pub use line_editor::*;
pub use transactional_writer::*;
