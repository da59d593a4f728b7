// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::collections::VecDeque;

pub const DEFAULT_HISTORY_SIZE: usize = 30;

/// Committed lines, most recent first.
///
/// `current_position` tracks history navigation:
/// - `None`: editing a fresh line.
/// - `Some(i)` with `i < len`: showing `entries[i]`.
/// - `Some(len)`: walked past the oldest match and fell back to the search prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    pub entries: VecDeque<String>,
    pub max_size: usize,
    pub remove_duplicates: bool,
    current_position: Option<usize>,
}

impl Default for History {
    fn default() -> Self { Self::new(vec![], DEFAULT_HISTORY_SIZE, false) }
}

impl History {
    /// `entries` are most recent first and are truncated to `max_size`.
    #[must_use]
    pub fn new(entries: Vec<String>, max_size: usize, remove_duplicates: bool) -> Self {
        let mut entries = VecDeque::from(entries);
        entries.truncate(max_size);
        Self {
            entries,
            max_size,
            remove_duplicates,
            current_position: None,
        }
    }

    #[must_use]
    pub fn current_position(&self) -> Option<usize> { self.current_position }

    #[must_use]
    pub fn len(&self) -> usize { self.entries.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Commits `line`. Returns the new head of history, or `None` when the line is not
    /// recorded (empty, whitespace only, or history disabled with a size of 0).
    ///
    /// A line equal to the current head is not added again, but it still counts as
    /// recorded. With `remove_duplicates`, an older copy of the line is removed first.
    pub fn update(&mut self, line: &str) -> Option<String> {
        if line.is_empty() || self.max_size == 0 || line.trim().is_empty() {
            return None;
        }

        if self.entries.front().map(String::as_str) != Some(line) {
            if self.remove_duplicates
                && let Some(index) = self.entries.iter().position(|it| it == line)
            {
                self.entries.remove(index);
            }

            self.entries.push_front(line.to_string());

            if self.entries.len() > self.max_size {
                self.entries.pop_back();
            }
        }

        self.current_position = None;
        self.entries.front().cloned()
    }

    /// Steps to the next older entry that starts with `search` and differs from
    /// `current_line`. Past the oldest match, returns `search` itself. Returns `None`
    /// when there is nowhere older to go.
    pub fn search_older(&mut self, current_line: &str, search: &str) -> Option<String> {
        let len = self.entries.len();
        let position = self.current_position;
        if len == 0 || position.is_some_and(|it| it >= len) {
            return None;
        }

        let mut index = position.map_or(0, |it| it + 1);
        while index < len && !self.is_match(index, current_line, search) {
            index += 1;
        }

        self.current_position = Some(index);
        Some(match self.entries.get(index) {
            Some(entry) => entry.clone(),
            None => search.to_string(),
        })
    }

    /// Mirror of [`Self::search_older()`]. Past the newest match, returns `search` and
    /// goes back to editing a fresh line. Returns `None` when not navigating.
    pub fn search_newer(&mut self, current_line: &str, search: &str) -> Option<String> {
        let position = self.current_position?;

        let mut index = position.checked_sub(1);
        while let Some(it) = index
            && !self.is_match(it, current_line, search)
        {
            index = it.checked_sub(1);
        }

        self.current_position = index;
        Some(match index {
            Some(it) => self.entries[it].clone(),
            None => search.to_string(),
        })
    }

    /// Ends a substring search that ran past the oldest entry.
    pub fn reset_position_if_exhausted(&mut self) {
        if self.current_position == Some(self.entries.len()) {
            self.current_position = None;
        }
    }

    fn is_match(&self, index: usize, current_line: &str, search: &str) -> bool {
        let entry = &self.entries[index];
        entry.starts_with(search) && entry != current_line
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn history_of(entries: &[&str], max_size: usize) -> History {
        History::new(
            entries.iter().map(ToString::to_string).collect(),
            max_size,
            false,
        )
    }

    #[test]
    fn test_update() {
        let mut history = history_of(&[], 2);
        assert_eq!(history.update("test1"), Some("test1".into()));
        assert_eq!(history.update(""), None);
        assert_eq!(history.update("   "), None);

        assert_eq!(history.update("test1"), Some("test1".into()));
        assert_eq!(history.len(), 1);

        history.update("test2");
        history.update("test3");
        assert_eq!(history.entries, ["test3", "test2"]);
    }

    #[test]
    fn test_update_with_size_zero_records_nothing() {
        let mut history = history_of(&["old"], 0);
        assert!(history.is_empty());
        assert_eq!(history.update("new"), None);
        assert!(history.is_empty());
    }

    #[test]
    fn test_remove_duplicates() {
        let mut history = History::new(vec!["b".into(), "a".into()], 30, true);
        history.update("a");
        assert_eq!(history.entries, ["a", "b"]);

        let mut history = History::new(vec!["b".into(), "a".into()], 30, false);
        history.update("a");
        assert_eq!(history.entries, ["a", "b", "a"]);
    }

    #[test]
    fn test_overflow_keeps_most_recent() {
        let mut history = history_of(&[], 3);
        for line in ["1", "2", "3", "4"] {
            history.update(line);
        }
        assert_eq!(history.entries, ["4", "3", "2"]);
    }

    #[test]
    fn test_search_older_then_newer() {
        let mut history = history_of(&["b", "a"], 30);
        assert_eq!(history.search_older("", ""), Some("b".into()));
        assert_eq!(history.search_older("b", ""), Some("a".into()));
        assert_eq!(history.search_older("a", ""), Some("".into()));
        assert_eq!(history.current_position(), Some(2));
        assert_eq!(history.search_older("", ""), None);

        assert_eq!(history.search_newer("", ""), Some("a".into()));
        assert_eq!(history.search_newer("a", ""), Some("b".into()));
        assert_eq!(history.search_newer("b", ""), Some("".into()));
        assert_eq!(history.current_position(), None);
        assert_eq!(history.search_newer("", ""), None);
    }

    #[test]
    fn test_search_skips_non_matching_and_current_line() {
        let mut history = history_of(&["git push", "ls", "git pull", "git push"], 30);
        assert_eq!(history.search_older("git", "git"), Some("git push".into()));
        assert_eq!(history.search_older("git push", "git"), Some("git pull".into()));
        assert_eq!(history.search_older("git pull", "git"), Some("git push".into()));
        assert_eq!(history.search_older("git push", "git"), Some("git".into()));
    }

    #[test]
    fn test_reset_position_if_exhausted() {
        let mut history = history_of(&["x"], 30);
        history.search_older("", "");
        history.reset_position_if_exhausted();
        assert_eq!(history.current_position(), Some(0));

        history.search_older("x", "");
        history.reset_position_if_exhausted();
        assert_eq!(history.current_position(), None);
    }
}
