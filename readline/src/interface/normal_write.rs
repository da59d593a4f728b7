// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::time::Instant;

use super::{Interface, find_line_ending};

impl Interface {
    /// Non-terminal input: split into lines, keeping an unterminated tail for the next
    /// chunk. A chunk ending in `\r` followed by one starting with `\n` (within the CRLF
    /// delay) is a single line ending.
    pub(super) fn normal_write(&mut self, chunk: &str) {
        let mut text = chunk;
        if let Some(saw_return_at) = self.saw_return_at.take()
            && saw_return_at.elapsed() <= self.crlf_delay
        {
            text = text.strip_prefix('\n').unwrap_or(text);
        }

        if find_line_ending(text).is_none() {
            self.line_buffer.push_str(text);
            return;
        }

        let mut buffer = std::mem::take(&mut self.line_buffer);
        buffer.push_str(text);

        if buffer.ends_with('\r') {
            self.saw_return_at = Some(Instant::now());
        }

        let mut rest = buffer.as_str();
        while let Some((start, end)) = find_line_ending(rest) {
            self.on_line(rest[..start].to_string());
            rest = &rest[end..];
        }
        self.line_buffer = rest.to_string();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use pretty_assertions::assert_eq;

    use crate::{InputDevice, Interface, InterfaceEvent, InterfaceEventKind,
                InterfaceOptions};

    fn collect_lines(interface: &mut Interface) -> Arc<Mutex<Vec<String>>> {
        let lines = Arc::new(Mutex::new(vec![]));
        let lines_clone = lines.clone();
        interface
            .on(InterfaceEventKind::Line, move |event| {
                if let InterfaceEvent::Line(line) = event {
                    lines_clone.lock().unwrap().push(line.clone());
                }
            })
            .unwrap();
        lines
    }

    fn new_interface() -> Interface {
        Interface::try_new(
            InputDevice::new_detached(),
            None,
            None,
            InterfaceOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_crlf_split_across_chunks() {
        let mut interface = new_interface();
        let lines = collect_lines(&mut interface);

        interface.feed(b"a\r").unwrap();
        interface.feed(b"\nb\n").unwrap();

        assert_eq!(*lines.lock().unwrap(), ["a", "b"]);
    }

    #[test]
    fn test_all_line_endings() {
        let mut interface = new_interface();
        let lines = collect_lines(&mut interface);

        interface.feed(b"one\ntwo\r\nthree\rfour").unwrap();
        assert_eq!(*lines.lock().unwrap(), ["one", "two", "three"]);

        interface.feed(b" and more\n").unwrap();
        assert_eq!(*lines.lock().unwrap(), ["one", "two", "three", "four and more"]);
    }

    #[test]
    fn test_blank_lines_are_emitted() {
        let mut interface = new_interface();
        let lines = collect_lines(&mut interface);

        interface.feed(b"\n\n").unwrap();
        assert_eq!(*lines.lock().unwrap(), ["", ""]);
    }

    #[test]
    fn test_tail_is_emitted_at_end_of_input() {
        let mut interface = new_interface();
        let lines = collect_lines(&mut interface);

        interface.feed(b"partial").unwrap();
        assert!(lines.lock().unwrap().is_empty());

        interface.end_of_input().unwrap();
        assert_eq!(*lines.lock().unwrap(), ["partial"]);
        assert!(interface.is_closed());
    }

    #[test]
    fn test_split_utf8() {
        let mut interface = new_interface();
        let lines = collect_lines(&mut interface);

        let bytes = "héllo\n".as_bytes();
        interface.feed(&bytes[..2]).unwrap();
        interface.feed(&bytes[2..]).unwrap();
        assert_eq!(*lines.lock().unwrap(), ["héllo"]);
    }
}
