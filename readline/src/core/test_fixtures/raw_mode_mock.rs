// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::Arc;

use crate::{RawModeSwitch, ReadlineError, ReadlineResult, StdMutex};

/// Records every raw mode change instead of touching a terminal. You can safely clone
/// this, clones share the same history.
#[derive(Debug, Default, Clone)]
pub struct RawModeMock {
    pub history: Arc<StdMutex<Vec<bool>>>,
}

impl RawModeMock {
    /// # Panics
    ///
    /// If the history lock is poisoned.
    #[must_use]
    pub fn get_history(&self) -> Vec<bool> { self.history.lock().unwrap().clone() }
}

impl RawModeSwitch for RawModeMock {
    fn set_raw_mode(&mut self, enabled: bool) -> ReadlineResult<()> {
        self.history
            .lock()
            .map_err(|_| ReadlineError::LockPoisoned)?
            .push(enabled);
        Ok(())
    }
}
