// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io;

use miette::Diagnostic;

/// Errors returned by the public API of [`crate::Interface`], the ANSI helpers and the
/// [`crate::TransactionalWriter`].
///
/// Malformed escape sequences are never errors; they decode to a
/// [`crate::KeyEvent`] without a name.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum ReadlineError {
    /// Writing to the output sink (or reading the input stream) failed.
    #[error(transparent)]
    #[diagnostic(code(r3bl_readline::io))]
    IO(#[from] io::Error),

    /// A method was called after [`crate::Interface::close()`], or a pending question
    /// or completion was cancelled because the interface closed.
    #[error("readline interface was closed")]
    #[diagnostic(
        code(r3bl_readline::closed),
        help("A closed interface can't be reused, create a new one")
    )]
    Closed,

    /// An absolute cursor move was requested with a row but no column.
    #[error("invalid cursor position: a row was given without a column")]
    #[diagnostic(
        code(r3bl_readline::invalid_cursor_position),
        help("Pass a column (x) whenever a row (y) is given")
    )]
    InvalidCursorPosition,

    /// Construction options failed validation.
    #[error("invalid option `{name}`: {reason}")]
    #[diagnostic(code(r3bl_readline::invalid_option))]
    InvalidOption { name: &'static str, reason: String },

    /// The abort signal passed to a question fired before an answer arrived.
    #[error("the question was aborted")]
    #[diagnostic(code(r3bl_readline::question_aborted))]
    QuestionAborted,

    /// [`crate::Interface::question()`] was called while another question is waiting.
    #[error("a question is already waiting for an answer")]
    #[diagnostic(
        code(r3bl_readline::question_pending),
        help("Await the pending answer before asking another question")
    )]
    QuestionPending,

    /// A thread panicked while holding the interface lock.
    #[error("readline interface mutex poisoned")]
    #[diagnostic(code(r3bl_readline::lock_poisoned))]
    LockPoisoned,

    /// [`crate::run()`] was called on an interface without an input stream, or twice.
    #[error("no input stream is attached to the interface")]
    #[diagnostic(
        code(r3bl_readline::input_stream_missing),
        help("Construct the interface with InputDevice::new_stream(..)")
    )]
    InputStreamMissing,
}

/// For convenience, convert [`miette::Report`] to [`ReadlineError`], so that
/// `into_diagnostic()` works.
impl From<miette::Report> for ReadlineError {
    fn from(report: miette::Report) -> Self {
        ReadlineError::IO(io::Error::other(format!("{report}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_converts_to_io_variant() {
        let error = ReadlineError::from(miette::miette!("boom"));
        assert!(matches!(error, ReadlineError::IO(_)));
        assert_eq!(error.to_string(), "boom");
    }

    #[test]
    fn test_invalid_option_message_names_the_option() {
        let error = ReadlineError::InvalidOption {
            name: "tab_size",
            reason: "must be at least 1".into(),
        };
        assert_eq!(
            error.to_string(),
            "invalid option `tab_size`: must be at least 1"
        );
    }
}
