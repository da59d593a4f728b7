// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::collections::VecDeque;

pub const KILL_RING_CAPACITY: usize = 32;

/// Killed text, most recent first, plus the yank cursor used by yank-pop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KillRing {
    entries: VecDeque<String>,
    cursor: usize,
}

impl KillRing {
    /// Records a kill. Empty text and text equal to the current head are ignored. Every
    /// recorded kill resets the yank cursor.
    pub fn push(&mut self, text: &str) {
        if text.is_empty() || self.entries.front().map(String::as_str) == Some(text) {
            return;
        }
        self.entries.push_front(text.to_string());
        self.cursor = 0;
        self.entries.truncate(KILL_RING_CAPACITY);
    }

    /// The entry a yank inserts.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.entries.get(self.cursor).map(String::as_str)
    }

    /// Moves the yank cursor to the next older entry, wrapping around. Returns the
    /// previously yanked entry and the new one. Needs at least two entries.
    pub fn rotate(&mut self) -> Option<(String, String)> {
        if self.entries.len() < 2 {
            return None;
        }
        let last = self.entries.get(self.cursor)?.clone();
        self.cursor = (self.cursor + 1) % self.entries.len();
        let next = self.entries.get(self.cursor)?.clone();
        Some((last, next))
    }

    #[must_use]
    pub fn len(&self) -> usize { self.entries.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_capacity_keeps_most_recent() {
        let mut kill_ring = KillRing::default();
        for i in 0..40 {
            kill_ring.push(&format!("kill {i}"));
        }
        assert_eq!(kill_ring.len(), KILL_RING_CAPACITY);
        let expected: Vec<String> = (8..40).rev().map(|i| format!("kill {i}")).collect();
        assert_eq!(kill_ring.iter().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn test_push_ignores_empty_and_repeat_of_head() {
        let mut kill_ring = KillRing::default();
        kill_ring.push("");
        kill_ring.push("a");
        kill_ring.push("a");
        assert_eq!(kill_ring.len(), 1);
        kill_ring.push("b");
        kill_ring.push("a");
        assert_eq!(kill_ring.iter().collect::<Vec<_>>(), ["a", "b", "a"]);
    }

    #[test]
    fn test_rotate_wraps_and_push_resets() {
        let mut kill_ring = KillRing::default();
        assert_eq!(kill_ring.rotate(), None);
        kill_ring.push("one");
        assert_eq!(kill_ring.rotate(), None);
        kill_ring.push("two");

        assert_eq!(kill_ring.current(), Some("two"));
        assert_eq!(kill_ring.rotate(), Some(("two".into(), "one".into())));
        assert_eq!(kill_ring.rotate(), Some(("one".into(), "two".into())));
        kill_ring.rotate();
        assert_eq!(kill_ring.current(), Some("one"));

        kill_ring.push("three");
        assert_eq!(kill_ring.current(), Some("three"));
    }
}
