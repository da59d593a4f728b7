// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::time::{Duration, Instant};

/// How long to wait after a lone `ESC` before deciding it was the escape key and not the
/// start of a sequence.
pub const DEFAULT_ESCAPE_CODE_TIMEOUT: Duration = Duration::from_millis(500);

/// Owned, cancellable deadline for escape finalization. Nothing here sleeps; the async
/// driver sleeps until [`EscapeTimer::deadline()`] and then calls
/// [`crate::Interface::fire_escape_timeout()`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EscapeTimer {
    deadline: Option<Instant>,
}

impl EscapeTimer {
    pub fn arm(&mut self, deadline: Instant) { self.deadline = Some(deadline); }

    pub fn cancel(&mut self) { self.deadline = None; }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> { self.deadline }

    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| deadline <= now)
    }
}
