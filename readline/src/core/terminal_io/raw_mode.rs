// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::fmt::Debug;

use crate::ReadlineResult;

/// Turns raw mode on or off for the terminal the input comes from. In raw mode the OS
/// delivers every keypress as it happens instead of buffering whole lines.
pub trait RawModeSwitch: Send + Debug {
    /// # Errors
    ///
    /// Returns an error if the terminal mode can't be changed.
    fn set_raw_mode(&mut self, enabled: bool) -> ReadlineResult<()>;
}

/// [`RawModeSwitch`] for the process' controlling terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrosstermRawMode;

impl RawModeSwitch for CrosstermRawMode {
    fn set_raw_mode(&mut self, enabled: bool) -> ReadlineResult<()> {
        if enabled {
            crossterm::terminal::enable_raw_mode()?;
        } else {
            crossterm::terminal::disable_raw_mode()?;
        }
        Ok(())
    }
}
