// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io::Write;

use crate::{SendRawTerminal, StdoutMock};

/// Where the line editor writes prompts, echoed text and control sequences, plus the
/// width of the terminal behind it.
#[allow(missing_debug_implementations)]
pub struct OutputDevice {
    pub resource: Box<SendRawTerminal>,
    /// Terminal width in columns. `None` means unknown, which the renderer treats as
    /// unbounded (no wrapping).
    pub columns: Option<usize>,
    pub is_mock: bool,
}

impl OutputDevice {
    /// Stdout, with its width queried from the terminal.
    #[must_use]
    pub fn new_stdout() -> Self {
        Self {
            resource: Box::new(std::io::stdout()),
            columns: query_terminal_columns(),
            is_mock: false,
        }
    }

    #[must_use]
    pub fn new_stderr() -> Self {
        Self {
            resource: Box::new(std::io::stderr()),
            columns: query_terminal_columns(),
            is_mock: false,
        }
    }

    #[must_use]
    pub fn new_writer(writer: impl Write + Send + 'static, columns: Option<usize>) -> Self {
        Self {
            resource: Box::new(writer),
            columns,
            is_mock: false,
        }
    }

    /// Returns the device and a handle to read back everything written to it.
    #[must_use]
    pub fn new_mock(columns: Option<usize>) -> (Self, StdoutMock) {
        let stdout_mock = StdoutMock::default();
        let this = Self {
            resource: Box::new(stdout_mock.clone()),
            columns,
            is_mock: true,
        };
        (this, stdout_mock)
    }
}

/// Terminal width from `crossterm`, `None` if stdout isn't a terminal.
#[must_use]
pub fn query_terminal_columns() -> Option<usize> {
    crossterm::terminal::size()
        .ok()
        .map(|(columns, _rows)| usize::from(columns))
        .filter(|&it| it > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_output_device() {
        let (mut device, mock) = OutputDevice::new_mock(Some(80));
        device.resource.write_all(b"Hello, world!\n").unwrap();
        assert_eq!(mock.get_copy_of_buffer_as_string(), "Hello, world!\n");
        assert!(device.is_mock);
        assert_eq!(device.columns, Some(80));
    }
}
