// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{AbortSignal, DEFAULT_ESCAPE_CODE_TIMEOUT, DEFAULT_HISTORY_SIZE,
            DEFAULT_PROMPT, DEFAULT_TAB_SIZE, ReadlineError, ReadlineResult};

/// Lower bound for [`InterfaceOptions::crlf_delay_ms`].
pub const MIN_CRLF_DELAY: Duration = Duration::from_millis(100);

/// Everything [`crate::Interface::try_new()`] needs besides the devices and the
/// completer. Missing fields take their defaults when deserializing, so a partial JSON
/// config works:
///
/// ```
/// use r3bl_readline::InterfaceOptions;
///
/// let options = InterfaceOptions::try_from_json(r#"{ "prompt": "$ ", "tab_size": 4 }"#)
///     .unwrap();
/// assert_eq!(options.prompt, "$ ");
/// assert_eq!(options.history_size, 30);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InterfaceOptions {
    /// Decode keypresses and edit in raw mode. Otherwise input is read line by line.
    pub terminal: bool,
    /// Initial history, most recent first.
    pub history: Vec<String>,
    /// 0 disables history.
    pub history_size: usize,
    pub remove_history_duplicates: bool,
    /// How long after a `\r` a `\n` is treated as part of the same line ending. Values
    /// below 100 are raised to 100.
    pub crlf_delay_ms: u64,
    pub prompt: String,
    /// How long to wait after a lone `ESC` before treating it as the escape key.
    pub escape_code_timeout_ms: u64,
    pub tab_size: usize,
    /// `TERM=dumb`: no cursor movement, text is echoed as typed.
    pub dumb_terminal: bool,
    /// Closes the interface when aborted.
    #[serde(skip)]
    pub signal: Option<AbortSignal>,
}

impl Default for InterfaceOptions {
    fn default() -> Self {
        Self {
            terminal: false,
            history: vec![],
            history_size: DEFAULT_HISTORY_SIZE,
            remove_history_duplicates: false,
            crlf_delay_ms: duration_to_ms(MIN_CRLF_DELAY),
            prompt: DEFAULT_PROMPT.to_string(),
            escape_code_timeout_ms: duration_to_ms(DEFAULT_ESCAPE_CODE_TIMEOUT),
            tab_size: DEFAULT_TAB_SIZE,
            dumb_terminal: false,
            signal: None,
        }
    }
}

impl InterfaceOptions {
    /// # Errors
    ///
    /// [`ReadlineError::InvalidOption`] if the JSON is malformed, has a field of the wrong
    /// type (eg a negative `history_size` or a non list `history`), or fails
    /// [`Self::validate()`].
    pub fn try_from_json(json: &str) -> ReadlineResult<Self> {
        let options: Self =
            serde_json::from_str(json).map_err(|error| ReadlineError::InvalidOption {
                name: "json",
                reason: error.to_string(),
            })?;
        options.validate()?;
        Ok(options)
    }

    /// # Errors
    ///
    /// [`ReadlineError::InvalidOption`] if `tab_size` or `escape_code_timeout_ms` is 0.
    pub fn validate(&self) -> ReadlineResult<()> {
        if self.tab_size == 0 {
            return Err(ReadlineError::InvalidOption {
                name: "tab_size",
                reason: "must be at least 1".into(),
            });
        }
        if self.escape_code_timeout_ms == 0 {
            return Err(ReadlineError::InvalidOption {
                name: "escape_code_timeout_ms",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn crlf_delay(&self) -> Duration {
        Duration::from_millis(self.crlf_delay_ms).max(MIN_CRLF_DELAY)
    }

    #[must_use]
    pub fn escape_code_timeout(&self) -> Duration {
        Duration::from_millis(self.escape_code_timeout_ms)
    }
}

fn duration_to_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
