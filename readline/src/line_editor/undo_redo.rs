// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::collections::VecDeque;

use super::LineState;

pub const MAX_UNDO_REDO_STACK_SIZE: usize = 2048;

/// Snapshots of the line taken before each edit. Each stack drops its oldest entry when
/// full. A new edit does not clear the redo stack; both are cleared when a line is
/// submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UndoRedoStacks {
    undo: VecDeque<LineState>,
    redo: VecDeque<LineState>,
}

impl UndoRedoStacks {
    pub fn push_undo(&mut self, snapshot: LineState) { push_bounded(&mut self.undo, snapshot); }

    /// Pops the latest undo snapshot and saves `current` for redo.
    pub fn undo(&mut self, current: &LineState) -> Option<LineState> {
        let entry = self.undo.pop_back()?;
        push_bounded(&mut self.redo, current.clone());
        Some(entry)
    }

    /// Pops the latest redo snapshot and saves `current` for undo.
    pub fn redo(&mut self, current: &LineState) -> Option<LineState> {
        let entry = self.redo.pop_back()?;
        push_bounded(&mut self.undo, current.clone());
        Some(entry)
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    #[must_use]
    pub fn undo_len(&self) -> usize { self.undo.len() }

    #[must_use]
    pub fn redo_len(&self) -> usize { self.redo.len() }
}

fn push_bounded(stack: &mut VecDeque<LineState>, snapshot: LineState) {
    stack.push_back(snapshot);
    if stack.len() > MAX_UNDO_REDO_STACK_SIZE {
        stack.pop_front();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_undo_then_redo() {
        let mut stacks = UndoRedoStacks::default();
        let before = LineState::new("ab", 2);
        let after = LineState::new("abc", 3);
        stacks.push_undo(before.clone());

        assert_eq!(stacks.undo(&after), Some(before.clone()));
        assert_eq!(stacks.redo_len(), 1);
        assert_eq!(stacks.redo(&before), Some(after));
        assert_eq!(stacks.undo_len(), 1);
        assert_eq!(stacks.redo(&before), None);
    }

    #[test]
    fn test_oldest_snapshot_is_dropped() {
        let mut stacks = UndoRedoStacks::default();
        for i in 0..=MAX_UNDO_REDO_STACK_SIZE {
            stacks.push_undo(LineState::new(i.to_string(), 0));
        }
        assert_eq!(stacks.undo_len(), MAX_UNDO_REDO_STACK_SIZE);

        let current = LineState::default();
        let mut oldest = None;
        while let Some(entry) = stacks.undo(&current) {
            oldest = Some(entry);
        }
        assert_eq!(oldest.unwrap().text, "1");
    }
}
