// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The key decoding state machine.
//!
//! Input arrives one `char` at a time. Most chars are complete keys on their own, but
//! `ESC` starts a sequence that may span any number of chunks:
//!
//! ```text
//! Ground ──ESC──▶ Escape ──ESC──▶ Escape(double)
//!                   │ 'O'            │ 'O' / '['
//!                   ▼                ▼
//!                  Ss3 ──digit──▶ Ss3Modifier ──char──▶ emit
//!                   │ '['
//!                   ▼
//!                CsiStart ──'['──▶ CsiDigits ──digit (max 3)──▶ CsiDigits
//!                                     │ ';'
//!                                     ▼
//!                               CsiSemicolon ──digit──▶ CsiModifierDigit ──char──▶ emit
//! ```
//!
//! Any char that doesn't advance a sequence terminates it. A chunk that ends right
//! after an `ESC` leaves the decoder in [`DecoderState::Escape`]; if nothing else
//! arrives before the escape timer fires, [`KeyDecoder::on_escape_timeout()`] turns it
//! into a plain escape key.
//!
//! CSI commands carry an optional modifier parameter, `1 + bits` where the bits are
//! shift (1), meta (2 | 8) and ctrl (4).

use std::{sync::LazyLock,
          time::{Duration, Instant}};

use regex::Regex;

use super::{DEFAULT_ESCAPE_CODE_TIMEOUT, EscapeTimer, KeyCodeModifier, KeyEvent,
            KeyName, Keypress, lookup_key_code};
use crate::ESC;

/// `ESC [ 1 ; 5 ~`, `ESC [ 15 ~`: a one or two digit number, an optional modifier, and
/// one of the rxvt terminators.
static NUMBER_WITH_TERMINATOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9][0-9]?)(;([0-9]))?([~^$])$")
        .expect("number with terminator pattern is a valid regex")
});

/// `ESC [ 200 ~`: bracketed paste markers.
static THREE_DIGIT_TILDE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{3}~$").expect("three digit tilde pattern is a valid regex")
});

/// `ESC [ A`, `ESC [ 1 ; 5 C`, `ESC [ 5 A`: a letter preceded by an optional modifier.
static LETTER_WITH_MODIFIER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(([0-9];)?([0-9]))?([A-Za-z])$")
        .expect("letter with modifier pattern is a valid regex")
});

/// Most digits collected for the number part of a CSI command.
const MAX_CSI_DIGITS: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecoderState {
    #[default]
    Ground,
    /// Saw `ESC` (or `ESC ESC` when `double`).
    Escape { double: bool },
    /// Saw `ESC O`.
    Ss3,
    /// Saw `ESC O <digit>`.
    Ss3Modifier,
    /// Saw `ESC [`.
    CsiStart,
    /// Collecting the number part of a CSI command.
    CsiDigits { count: u8 },
    /// Saw the `;` that precedes a modifier digit.
    CsiSemicolon,
    /// Saw the modifier digit. The next char finishes the command.
    CsiModifierDigit,
}

/// Converts chars into [`Keypress`]es. See the [module docs](self) for the grammar.
#[derive(Debug, Clone)]
pub struct KeyDecoder {
    state: DecoderState,
    /// Every char consumed for the key being decoded.
    sequence: String,
    /// The escape code looked up in [`lookup_key_code()`], eg `[A` or `O5`.
    code: String,
    /// Byte offset in `sequence` where the CSI command starts.
    cmd_start: usize,
    modifier: i32,
    escape_timer: EscapeTimer,
    escape_code_timeout: Duration,
}

impl Default for KeyDecoder {
    fn default() -> Self { Self::new(DEFAULT_ESCAPE_CODE_TIMEOUT) }
}

impl KeyDecoder {
    #[must_use]
    pub fn new(escape_code_timeout: Duration) -> Self {
        Self {
            state: DecoderState::Ground,
            sequence: String::new(),
            code: String::new(),
            cmd_start: 0,
            modifier: 0,
            escape_timer: EscapeTimer::default(),
            escape_code_timeout,
        }
    }

    #[must_use]
    pub fn state(&self) -> DecoderState { self.state }

    /// Drops any partially decoded sequence and the escape timer.
    pub fn reset(&mut self) {
        self.state = DecoderState::Ground;
        self.sequence.clear();
        self.code.clear();
        self.cmd_start = 0;
        self.modifier = 0;
        self.escape_timer.cancel();
    }

    pub fn arm_escape_timer(&mut self, now: Instant) {
        self.escape_timer.arm(now + self.escape_code_timeout);
    }

    pub fn cancel_escape_timer(&mut self) { self.escape_timer.cancel(); }

    #[must_use]
    pub fn escape_deadline(&self) -> Option<Instant> { self.escape_timer.deadline() }

    /// Called when the escape timer fires. Only a decoder still waiting right after
    /// `ESC` (or `ESC ESC`) produces a key; in any other state this does nothing.
    pub fn on_escape_timeout(&mut self) -> Option<Keypress> {
        self.escape_timer.cancel();
        match self.state {
            DecoderState::Escape { .. } => {
                let sequence = std::mem::take(&mut self.sequence);
                self.reset();
                Some(Keypress {
                    text: None,
                    key: KeyEvent::new(sequence, Some(KeyName::Escape)).with_meta(),
                })
            }
            _ => None,
        }
    }

    /// Advances the state machine by one char. Returns a key when one is complete.
    pub fn feed(&mut self, ch: char) -> Option<Keypress> {
        if self.state == DecoderState::Ground {
            self.sequence.clear();
            self.code.clear();
            self.modifier = 0;
        }
        self.sequence.push(ch);

        match self.state {
            DecoderState::Ground => {
                if ch == ESC {
                    self.state = DecoderState::Escape { double: false };
                    None
                } else {
                    Some(self.emit_single(ch, false))
                }
            }

            DecoderState::Escape { double: false } if ch == ESC => {
                self.state = DecoderState::Escape { double: true };
                None
            }

            DecoderState::Escape { .. } => match ch {
                'O' => {
                    self.code.push(ch);
                    self.state = DecoderState::Ss3;
                    None
                }
                '[' => {
                    self.code.push(ch);
                    self.state = DecoderState::CsiStart;
                    None
                }
                _ => Some(self.emit_single(ch, true)),
            },

            DecoderState::Ss3 => {
                if let Some(digit) = ch.to_digit(10) {
                    self.modifier = digit_to_modifier(digit);
                    self.state = DecoderState::Ss3Modifier;
                    None
                } else {
                    self.code.push(ch);
                    Some(self.emit_escape_code())
                }
            }

            DecoderState::Ss3Modifier => {
                self.code.push(ch);
                Some(self.emit_escape_code())
            }

            DecoderState::CsiStart => {
                if ch == '[' {
                    self.code.push(ch);
                    self.cmd_start = self.sequence.len();
                    self.state = DecoderState::CsiDigits { count: 0 };
                    None
                } else {
                    self.cmd_start = self.sequence.len() - ch.len_utf8();
                    self.advance_csi_digits(ch, 0)
                }
            }

            DecoderState::CsiDigits { count } => self.advance_csi_digits(ch, count),

            DecoderState::CsiSemicolon => {
                if ch.is_ascii_digit() {
                    self.state = DecoderState::CsiModifierDigit;
                    None
                } else {
                    Some(self.finish_csi_command())
                }
            }

            DecoderState::CsiModifierDigit => Some(self.finish_csi_command()),
        }
    }

    fn advance_csi_digits(&mut self, ch: char, count: u8) -> Option<Keypress> {
        if ch.is_ascii_digit() && count < MAX_CSI_DIGITS {
            self.state = DecoderState::CsiDigits { count: count + 1 };
            None
        } else if ch == ';' {
            self.state = DecoderState::CsiSemicolon;
            None
        } else {
            Some(self.finish_csi_command())
        }
    }

    /// Splits the CSI command into the code to look up and the modifier.
    fn finish_csi_command(&mut self) -> Keypress {
        let cmd = &self.sequence[self.cmd_start..];

        if let Some(captures) = NUMBER_WITH_TERMINATOR_REGEX.captures(cmd) {
            self.code.push_str(&captures[1]);
            self.code.push_str(&captures[4]);
            self.modifier = parse_modifier(captures.get(3).map(|it| it.as_str()));
        } else if THREE_DIGIT_TILDE_REGEX.is_match(cmd) {
            self.code.push_str(cmd);
        } else if let Some(captures) = LETTER_WITH_MODIFIER_REGEX.captures(cmd) {
            self.code.push_str(&captures[4]);
            self.modifier = parse_modifier(captures.get(3).map(|it| it.as_str()));
        } else {
            self.code.push_str(cmd);
        }

        self.emit_escape_code()
    }

    /// Emits the key for a complete SS3 or CSI code. These are always escaped, so they
    /// carry no text.
    fn emit_escape_code(&mut self) -> Keypress {
        let mut key = KeyEvent {
            sequence: std::mem::take(&mut self.sequence),
            name: None,
            ctrl: self.modifier & 4 != 0,
            meta: self.modifier & 10 != 0,
            shift: self.modifier & 1 != 0,
        };

        if let Some((name, implied)) = lookup_key_code(&self.code) {
            key.name = Some(name);
            match implied {
                KeyCodeModifier::Shift => key.shift = true,
                KeyCodeModifier::Ctrl => key.ctrl = true,
                KeyCodeModifier::None => {}
            }
        }

        self.reset();
        Keypress { text: None, key }
    }

    /// Classifies a single char, optionally preceded by `ESC` (or `ESC ESC`).
    fn emit_single(&mut self, ch: char, escaped: bool) -> Keypress {
        let sequence = std::mem::take(&mut self.sequence);
        let mut key = KeyEvent::new(sequence, None);

        let named = match ch {
            '\r' => Some(KeyName::Return),
            '\n' => Some(KeyName::Enter),
            '\t' => Some(KeyName::Tab),
            '\x08' | '\x7f' => Some(KeyName::Backspace),
            ESC => Some(KeyName::Escape),
            ' ' => Some(KeyName::Space),
            _ => None,
        };

        if let Some(name) = named {
            key.name = Some(name);
            key.meta = escaped;
        } else if !escaped && ch <= '\x1a' {
            // Ctrl+letter. NUL maps to the char before 'a'.
            key.name = char::from_u32(u32::from(b'a') + u32::from(ch) - 1).map(KeyName::Char);
            key.ctrl = true;
        } else if ch.is_ascii_alphanumeric() {
            key.name = Some(KeyName::Char(ch.to_ascii_lowercase()));
            key.shift = ch.is_ascii_uppercase();
            key.meta = escaped;
        } else if escaped {
            key.meta = true;
        }

        self.reset();
        let text = (!escaped).then(|| key.sequence.clone());
        Keypress { text, key }
    }
}

/// A modifier parameter is `1 + bits`. A `0` digit yields `-1`, which sets every bit.
fn digit_to_modifier(digit: u32) -> i32 {
    i32::try_from(digit).map_or(0, |digit| digit - 1)
}

fn parse_modifier(digit: Option<&str>) -> i32 {
    digit
        .and_then(|it| it.parse::<u32>().ok())
        .map_or(0, digit_to_modifier)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;

    fn decode_all(decoder: &mut KeyDecoder, input: &str) -> Vec<Keypress> {
        input.chars().filter_map(|ch| decoder.feed(ch)).collect()
    }

    fn decode_one(input: &str) -> Keypress {
        let mut decoder = KeyDecoder::default();
        let mut keys = decode_all(&mut decoder, input);
        assert_eq!(keys.len(), 1, "{input:?} should decode to exactly one key");
        assert_eq!(decoder.state(), DecoderState::Ground);
        keys.remove(0)
    }

    #[test_case("\x1b[A", KeyName::Up)]
    #[test_case("\x1bOA", KeyName::Up)]
    #[test_case("\x1b[B", KeyName::Down)]
    #[test_case("\x1bOB", KeyName::Down)]
    #[test_case("\x1b[C", KeyName::Right)]
    #[test_case("\x1bOC", KeyName::Right)]
    #[test_case("\x1b[D", KeyName::Left)]
    #[test_case("\x1bOD", KeyName::Left)]
    #[test_case("\x1b[E", KeyName::Clear)]
    #[test_case("\x1bOE", KeyName::Clear)]
    #[test_case("\x1b[F", KeyName::End)]
    #[test_case("\x1bOF", KeyName::End)]
    #[test_case("\x1b[H", KeyName::Home)]
    #[test_case("\x1bOH", KeyName::Home)]
    #[test_case("\x1b[P", KeyName::Function(1))]
    #[test_case("\x1bOP", KeyName::Function(1))]
    #[test_case("\x1b[Q", KeyName::Function(2))]
    #[test_case("\x1bOQ", KeyName::Function(2))]
    #[test_case("\x1b[R", KeyName::Function(3))]
    #[test_case("\x1bOR", KeyName::Function(3))]
    #[test_case("\x1b[S", KeyName::Function(4))]
    #[test_case("\x1bOS", KeyName::Function(4))]
    #[test_case("\x1b[11~", KeyName::Function(1))]
    #[test_case("\x1b[[A", KeyName::Function(1))]
    #[test_case("\x1b[[E", KeyName::Function(5))]
    #[test_case("\x1b[15~", KeyName::Function(5))]
    #[test_case("\x1b[17~", KeyName::Function(6))]
    #[test_case("\x1b[21~", KeyName::Function(10))]
    #[test_case("\x1b[24~", KeyName::Function(12))]
    #[test_case("\x1b[1~", KeyName::Home)]
    #[test_case("\x1b[2~", KeyName::Insert)]
    #[test_case("\x1b[3~", KeyName::Delete)]
    #[test_case("\x1b[4~", KeyName::End)]
    #[test_case("\x1b[5~", KeyName::PageUp)]
    #[test_case("\x1b[6~", KeyName::PageDown)]
    #[test_case("\x1b[[5~", KeyName::PageUp)]
    #[test_case("\x1b[[6~", KeyName::PageDown)]
    #[test_case("\x1b[7~", KeyName::Home)]
    #[test_case("\x1b[8~", KeyName::End)]
    #[test_case("\x1b[200~", KeyName::PasteStart)]
    #[test_case("\x1b[201~", KeyName::PasteEnd)]
    fn test_named_escape_codes(input: &str, expected: KeyName) {
        let keypress = decode_one(input);
        assert_eq!(keypress.key.name, Some(expected));
        assert_eq!(keypress.key.sequence, input);
        assert_eq!(keypress.text, None);
        assert!(!keypress.key.ctrl && !keypress.key.meta && !keypress.key.shift);
    }

    #[test_case("\x1b[a", KeyName::Up)]
    #[test_case("\x1b[e", KeyName::Clear)]
    #[test_case("\x1b[2$", KeyName::Insert)]
    #[test_case("\x1b[8$", KeyName::End)]
    #[test_case("\x1b[Z", KeyName::Tab)]
    fn test_shifted_codes(input: &str, expected: KeyName) {
        let keypress = decode_one(input);
        assert_eq!(keypress.key.name, Some(expected));
        assert!(keypress.key.shift);
        assert!(!keypress.key.ctrl);
    }

    #[test_case("\x1bOa", KeyName::Up)]
    #[test_case("\x1bOd", KeyName::Left)]
    #[test_case("\x1b[3^", KeyName::Delete)]
    #[test_case("\x1b[7^", KeyName::Home)]
    fn test_ctrl_codes(input: &str, expected: KeyName) {
        let keypress = decode_one(input);
        assert_eq!(keypress.key.name, Some(expected));
        assert!(keypress.key.ctrl);
        assert!(!keypress.key.shift);
    }

    #[test_case("\x1b[1;5C", KeyName::Right, true, false, false)]
    #[test_case("\x1b[1;3D", KeyName::Left, false, true, false)]
    #[test_case("\x1b[1;2A", KeyName::Up, false, false, true)]
    #[test_case("\x1b[1;6B", KeyName::Down, true, false, true)]
    #[test_case("\x1b[3;5~", KeyName::Delete, true, false, false)]
    #[test_case("\x1b[5A", KeyName::Up, true, false, false)]
    #[test_case("\x1bO5A", KeyName::Up, true, false, false)]
    #[test_case("\x1bO2P", KeyName::Function(1), false, false, true)]
    fn test_modifier_parameter(
        input: &str,
        name: KeyName,
        ctrl: bool,
        meta: bool,
        shift: bool,
    ) {
        let key = decode_one(input).key;
        assert_eq!(key.name, Some(name));
        assert_eq!((key.ctrl, key.meta, key.shift), (ctrl, meta, shift));
    }

    #[test]
    fn test_modifier_digit_zero_sets_every_bit() {
        let key = decode_one("\x1b[1;0C").key;
        assert_eq!(key.name, Some(KeyName::Right));
        assert!(key.ctrl && key.meta && key.shift);
    }

    #[test_case("\x1b[9~")]
    #[test_case("\x1b[1;5X")]
    #[test_case("\x1bOz")]
    #[test_case("\x1b[1234")]
    fn test_unknown_sequences_keep_raw_bytes(input: &str) {
        let keypress = decode_one(input);
        assert_eq!(keypress.key.name, None);
        assert_eq!(keypress.key.sequence, input);
        assert_eq!(keypress.text, None);
    }

    #[test_case('\r', KeyName::Return)]
    #[test_case('\n', KeyName::Enter)]
    #[test_case('\t', KeyName::Tab)]
    #[test_case('\x08', KeyName::Backspace)]
    #[test_case('\x7f', KeyName::Backspace)]
    #[test_case(' ', KeyName::Space)]
    fn test_single_named_chars(ch: char, expected: KeyName) {
        let keypress = decode_one(&ch.to_string());
        assert_eq!(keypress.key.name, Some(expected));
        assert_eq!(keypress.text, Some(ch.to_string()));
        assert!(!keypress.key.ctrl && !keypress.key.meta);
    }

    #[test_case('\x01', 'a')]
    #[test_case('\x03', 'c')]
    #[test_case('\x0b', 'k')]
    #[test_case('\x1a', 'z')]
    fn test_ctrl_letters(ch: char, letter: char) {
        let key = decode_one(&ch.to_string()).key;
        assert_eq!(key.name, Some(KeyName::Char(letter)));
        assert!(key.ctrl);
    }

    #[test]
    fn test_alphanumerics() {
        let key = decode_one("Q").key;
        assert_eq!(key.name, Some(KeyName::Char('q')));
        assert!(key.shift);

        let key = decode_one("7").key;
        assert_eq!(key.name, Some(KeyName::Char('7')));
        assert!(!key.shift);
    }

    #[test]
    fn test_other_chars_have_no_name_but_keep_text() {
        let keypress = decode_one("中");
        assert_eq!(keypress.key.name, None);
        assert_eq!(keypress.text.as_deref(), Some("中"));
    }

    #[test]
    fn test_meta_letter() {
        let keypress = decode_one("\x1bb");
        assert_eq!(keypress.key.name, Some(KeyName::Char('b')));
        assert!(keypress.key.meta);
        assert_eq!(keypress.text, None);
    }

    #[test]
    fn test_meta_backspace() {
        let key = decode_one("\x1b\x7f").key;
        assert_eq!(key.name, Some(KeyName::Backspace));
        assert!(key.meta);
    }

    #[test]
    fn test_escaped_unknown_char_is_meta_without_name() {
        let key = decode_one("\x1b!").key;
        assert_eq!(key.name, None);
        assert!(key.meta);
        assert_eq!(key.sequence, "\x1b!");
    }

    #[test]
    fn test_double_escape_prefix() {
        let keypress = decode_one("\x1b\x1b[A");
        assert_eq!(keypress.key.name, Some(KeyName::Up));
        assert_eq!(keypress.key.sequence, "\x1b\x1b[A");
    }

    #[test]
    fn test_split_chunks_decode_identically() {
        let input = "a\x1b[1;5C中\x1bOB\x1b[200~z";
        let mut whole_decoder = KeyDecoder::default();
        let whole = decode_all(&mut whole_decoder, input);

        let chars: Vec<char> = input.chars().collect();
        for split_at in 0..=chars.len() {
            let mut decoder = KeyDecoder::default();
            let first: String = chars[..split_at].iter().collect();
            let second: String = chars[split_at..].iter().collect();
            let mut keys = decode_all(&mut decoder, &first);
            keys.extend(decode_all(&mut decoder, &second));
            assert_eq!(keys, whole, "split at {split_at}");
        }
        assert_eq!(whole.len(), 6);
    }

    #[test]
    fn test_escape_timeout_after_lone_escape() {
        let mut decoder = KeyDecoder::default();
        assert_eq!(decoder.feed(ESC), None);
        assert_eq!(decoder.state(), DecoderState::Escape { double: false });

        let keypress = decoder.on_escape_timeout().unwrap();
        assert_eq!(keypress.key.name, Some(KeyName::Escape));
        assert!(keypress.key.meta);
        assert_eq!(keypress.key.sequence, "\x1b");
        assert_eq!(decoder.state(), DecoderState::Ground);

        // Fires at most once.
        assert_eq!(decoder.on_escape_timeout(), None);
    }

    #[test]
    fn test_escape_timeout_after_double_escape() {
        let mut decoder = KeyDecoder::default();
        decode_all(&mut decoder, "\x1b\x1b");
        let keypress = decoder.on_escape_timeout().unwrap();
        assert_eq!(keypress.key.sequence, "\x1b\x1b");
        assert!(keypress.key.is(KeyName::Escape));
    }

    #[test]
    fn test_escape_timeout_mid_sequence_does_nothing() {
        let mut decoder = KeyDecoder::default();
        decode_all(&mut decoder, "\x1b[1");
        assert_eq!(decoder.on_escape_timeout(), None);
        assert_eq!(decode_all(&mut decoder, "~")[0].key.name, Some(KeyName::Home));
    }

    #[test]
    fn test_escape_timer_deadline() {
        let mut decoder = KeyDecoder::new(Duration::from_millis(50));
        let now = Instant::now();
        decoder.arm_escape_timer(now);
        assert_eq!(
            decoder.escape_deadline(),
            Some(now + Duration::from_millis(50))
        );
        decoder.cancel_escape_timer();
        assert_eq!(decoder.escape_deadline(), None);
    }

    #[test]
    fn test_reset_drops_partial_sequence() {
        let mut decoder = KeyDecoder::default();
        decode_all(&mut decoder, "\x1b[1;");
        decoder.reset();
        let keypress = decode_one_with(&mut decoder, "x");
        assert_eq!(keypress.key.sequence, "x");
        assert_eq!(keypress.text.as_deref(), Some("x"));
    }

    fn decode_one_with(decoder: &mut KeyDecoder, input: &str) -> Keypress {
        let mut keys = decode_all(decoder, input);
        assert_eq!(keys.len(), 1);
        keys.remove(0)
    }
}
