// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::KeyName;

/// A modifier implied by the code itself, independent of any numeric modifier
/// parameter. `ESC [ a` is shift+up no matter what.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCodeModifier {
    None,
    Shift,
    Ctrl,
}

/// Resolves an accumulated escape code (with its `[` or `O` prefix) to a key name.
///
/// Covers xterm, gnome-terminal, rxvt and putty/cygwin flavors. Returns `None` for
/// anything not in the table.
#[must_use]
pub fn lookup_key_code(code: &str) -> Option<(KeyName, KeyCodeModifier)> {
    use KeyCodeModifier::{Ctrl, None as Plain, Shift};
    use KeyName::{Clear, Delete, Down, End, Function, Home, Insert, Left, PageDown,
                  PageUp, PasteEnd, PasteStart, Right, Tab, Up};

    let it = match code {
        // xterm/gnome ESC [ letter (with modifier), ESC O letter.
        "[P" | "OP" | "[11~" | "[[A" => (Function(1), Plain),
        "[Q" | "OQ" | "[12~" | "[[B" => (Function(2), Plain),
        "[R" | "OR" | "[13~" | "[[C" => (Function(3), Plain),
        "[S" | "OS" | "[14~" | "[[D" => (Function(4), Plain),

        // Common.
        "[15~" | "[[E" => (Function(5), Plain),
        "[17~" => (Function(6), Plain),
        "[18~" => (Function(7), Plain),
        "[19~" => (Function(8), Plain),
        "[20~" => (Function(9), Plain),
        "[21~" => (Function(10), Plain),
        "[23~" => (Function(11), Plain),
        "[24~" => (Function(12), Plain),

        // Bracketed paste.
        "[200~" => (PasteStart, Plain),
        "[201~" => (PasteEnd, Plain),

        // xterm ESC [ letter, ESC O letter.
        "[A" | "OA" => (Up, Plain),
        "[B" | "OB" => (Down, Plain),
        "[C" | "OC" => (Right, Plain),
        "[D" | "OD" => (Left, Plain),
        "[E" | "OE" => (Clear, Plain),
        "[F" | "OF" => (End, Plain),
        "[H" | "OH" => (Home, Plain),

        // xterm/rxvt ESC [ number ~, putty ESC [ [ number ~.
        "[1~" | "[7~" => (Home, Plain),
        "[2~" => (Insert, Plain),
        "[3~" => (Delete, Plain),
        "[4~" | "[8~" => (End, Plain),
        "[5~" | "[[5~" => (PageUp, Plain),
        "[6~" | "[[6~" => (PageDown, Plain),

        // rxvt keys with modifiers.
        "[a" => (Up, Shift),
        "[b" => (Down, Shift),
        "[c" => (Right, Shift),
        "[d" => (Left, Shift),
        "[e" => (Clear, Shift),

        "[2$" => (Insert, Shift),
        "[3$" => (Delete, Shift),
        "[5$" => (PageUp, Shift),
        "[6$" => (PageDown, Shift),
        "[7$" => (Home, Shift),
        "[8$" => (End, Shift),

        "Oa" => (Up, Ctrl),
        "Ob" => (Down, Ctrl),
        "Oc" => (Right, Ctrl),
        "Od" => (Left, Ctrl),
        "Oe" => (Clear, Ctrl),

        "[2^" => (Insert, Ctrl),
        "[3^" => (Delete, Ctrl),
        "[5^" => (PageUp, Ctrl),
        "[6^" => (PageDown, Ctrl),
        "[7^" => (Home, Ctrl),
        "[8^" => (End, Ctrl),

        // Misc.
        "[Z" => (Tab, Shift),

        _ => return None,
    };

    Some(it)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;

    #[test_case("[A", KeyName::Up, KeyCodeModifier::None)]
    #[test_case("OA", KeyName::Up, KeyCodeModifier::None)]
    #[test_case("[[E", KeyName::Function(5), KeyCodeModifier::None)]
    #[test_case("[24~", KeyName::Function(12), KeyCodeModifier::None)]
    #[test_case("[8$", KeyName::End, KeyCodeModifier::Shift)]
    #[test_case("Oe", KeyName::Clear, KeyCodeModifier::Ctrl)]
    #[test_case("[Z", KeyName::Tab, KeyCodeModifier::Shift)]
    fn test_lookup(code: &str, name: KeyName, modifier: KeyCodeModifier) {
        assert_eq!(lookup_key_code(code), Some((name, modifier)));
    }

    #[test_case("")]
    #[test_case("[")]
    #[test_case("[9~")]
    #[test_case("Oz")]
    fn test_lookup_unknown(code: &str) {
        assert_eq!(lookup_key_code(code), None);
    }
}
