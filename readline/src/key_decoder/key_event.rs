// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::fmt::{Display, Formatter, Result};

/// Symbolic name of a decoded key. [`KeyName::Char`] covers `a`..`z`, `0`..`9` and the
/// letters derived from control codes (`Ctrl+A` is `Char('a')` with
/// [`KeyEvent::ctrl`] set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyName {
    Up,
    Down,
    Left,
    Right,
    Clear,
    Home,
    End,
    Insert,
    Delete,
    PageUp,
    PageDown,
    Tab,
    Return,
    Enter,
    Backspace,
    Escape,
    Space,
    PasteStart,
    PasteEnd,
    /// `F1` ..= `F12`.
    Function(u8),
    Char(char),
}

impl Display for KeyName {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            KeyName::Up => f.write_str("up"),
            KeyName::Down => f.write_str("down"),
            KeyName::Left => f.write_str("left"),
            KeyName::Right => f.write_str("right"),
            KeyName::Clear => f.write_str("clear"),
            KeyName::Home => f.write_str("home"),
            KeyName::End => f.write_str("end"),
            KeyName::Insert => f.write_str("insert"),
            KeyName::Delete => f.write_str("delete"),
            KeyName::PageUp => f.write_str("pageup"),
            KeyName::PageDown => f.write_str("pagedown"),
            KeyName::Tab => f.write_str("tab"),
            KeyName::Return => f.write_str("return"),
            KeyName::Enter => f.write_str("enter"),
            KeyName::Backspace => f.write_str("backspace"),
            KeyName::Escape => f.write_str("escape"),
            KeyName::Space => f.write_str("space"),
            KeyName::PasteStart => f.write_str("paste-start"),
            KeyName::PasteEnd => f.write_str("paste-end"),
            KeyName::Function(n) => write!(f, "f{n}"),
            KeyName::Char(ch) => write!(f, "{ch}"),
        }
    }
}

/// One decoded key. `sequence` holds exactly the input that produced it, so nothing is
/// lost even when `name` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyEvent {
    pub sequence: String,
    pub name: Option<KeyName>,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

impl KeyEvent {
    pub fn new(sequence: impl Into<String>, name: Option<KeyName>) -> Self {
        Self {
            sequence: sequence.into(),
            name,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    #[must_use]
    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    #[must_use]
    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    #[must_use]
    pub fn is(&self, name: KeyName) -> bool { self.name == Some(name) }

    #[must_use]
    pub fn is_char(&self, ch: char) -> bool { self.name == Some(KeyName::Char(ch)) }
}

/// A [`KeyEvent`] plus the text it would insert. `text` is `None` for escaped
/// sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keypress {
    pub text: Option<String>,
    pub key: KeyEvent,
}
