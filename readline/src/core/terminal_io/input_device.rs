// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use tokio::io::AsyncRead;

use crate::{CrosstermRawMode, PinnedInputStream, RawModeSwitch, ReadlineResult};

/// Where input bytes come from, and how to put that source into raw mode.
///
/// - The byte stream is optional. Without one, bytes are delivered by calling
///   [`crate::Interface::feed()`] directly.
/// - [`crate::run()`] takes the stream out of the device and pumps it.
#[allow(missing_debug_implementations)]
#[derive(Default)]
pub struct InputDevice {
    pub resource: Option<PinnedInputStream>,
    pub raw_mode: Option<Box<dyn RawModeSwitch>>,
}

impl InputDevice {
    /// Stdin, with raw mode toggled through `crossterm`.
    #[must_use]
    pub fn new_stdin() -> Self {
        Self {
            resource: Some(Box::pin(tokio::io::stdin())),
            raw_mode: Some(Box::new(CrosstermRawMode)),
        }
    }

    /// Any async byte stream, eg: a socket, a pipe, or a [`std::io::Cursor`] in tests.
    #[must_use]
    pub fn new_stream(reader: impl AsyncRead + Send + 'static) -> Self {
        Self {
            resource: Some(Box::pin(reader)),
            raw_mode: None,
        }
    }

    /// No stream at all, the caller feeds bytes by hand.
    #[must_use]
    pub fn new_detached() -> Self { Self::default() }

    #[must_use]
    pub fn with_raw_mode(mut self, raw_mode: impl RawModeSwitch + 'static) -> Self {
        self.raw_mode = Some(Box::new(raw_mode));
        self
    }

    pub fn take_stream(&mut self) -> Option<PinnedInputStream> { self.resource.take() }

    /// Does nothing when there is no [`RawModeSwitch`].
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal mode can't be changed.
    pub fn set_raw_mode(&mut self, enabled: bool) -> ReadlineResult<()> {
        match self.raw_mode.as_mut() {
            Some(raw_mode) => raw_mode.set_raw_mode(enabled),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RawModeMock;

    #[test]
    fn test_raw_mode_switch_is_optional() {
        let mut device = InputDevice::new_detached();
        assert!(device.set_raw_mode(true).is_ok());

        let raw_mode_mock = RawModeMock::default();
        let mut device = InputDevice::new_detached().with_raw_mode(raw_mode_mock.clone());
        device.set_raw_mode(true).unwrap();
        device.set_raw_mode(false).unwrap();
        assert_eq!(raw_mode_mock.get_history(), vec![true, false]);
    }

    #[test]
    fn test_take_stream_only_once() {
        let mut device = InputDevice::new_stream(std::io::Cursor::new(b"abc".to_vec()));
        assert!(device.take_stream().is_some());
        assert!(device.take_stream().is_none());
    }
}
