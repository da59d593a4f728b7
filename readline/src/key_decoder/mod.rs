// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Turns terminal input into [`Keypress`]es.
//!
//! ```text
//! bytes ──▶ Utf8ChunkDecoder ──▶ chars ──▶ KeyDecoder::feed() ──▶ Option<Keypress>
//!                                              │
//!                              ESC last in chunk? arm EscapeTimer
//!                              timer fires ──▶ KeyDecoder::on_escape_timeout()
//! ```
//!
//! The decoder never fails on malformed input. A sequence it can't name is still
//! emitted, with [`KeyEvent::name`] set to `None` and the raw bytes preserved in
//! [`KeyEvent::sequence`].

// Attach sources.
pub mod escape_timer;
pub mod key_decoder_impl;
pub mod key_event;
pub mod key_table;
pub mod utf8_chunk_decoder;

// Re-export.
pub use escape_timer::*;
pub use key_decoder_impl::*;
pub use key_event::*;
pub use key_table::*;
pub use utf8_chunk_decoder::*;
