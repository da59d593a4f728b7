// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::MutexGuard;

use tokio::io::AsyncReadExt;

use super::{CompletionRequest, Interface, SafeInterface, wait_for_abort};
use crate::{ReadlineError, ReadlineResult};

pub const READ_BUFFER_SIZE: usize = 1024;

/// Locks the interface, mapping a poisoned mutex to [`ReadlineError::LockPoisoned`].
///
/// # Errors
///
/// [`ReadlineError::LockPoisoned`] if a thread panicked while holding the lock.
pub fn lock_interface(
    safe_interface: &SafeInterface,
) -> ReadlineResult<MutexGuard<'_, Interface>> {
    safe_interface
        .lock()
        .map_err(|_| ReadlineError::LockPoisoned)
}

/// Pumps the interface's input stream until it ends or the interface closes.
///
/// Besides input, this waits on the escape key deadline, the interface's abort signal,
/// the pending question's abort signal and any async completion. It returns as soon as
/// the interface is closed from anywhere, even mid-read or mid-completion. The lock is
/// only held for each synchronous step, never across an `.await`, so other tasks can
/// call into the interface while this runs.
///
/// # Errors
///
/// - [`ReadlineError::InputStreamMissing`] if the stream was already taken.
/// - Read or write errors, and errors from key handling.
pub async fn run(safe_interface: SafeInterface) -> ReadlineResult<()> {
    let (mut stream, signal, closed) = {
        let mut interface = lock_interface(&safe_interface)?;
        let stream = interface
            .input
            .take_stream()
            .ok_or(ReadlineError::InputStreamMissing)?;
        (stream, interface.abort_signal(), interface.closed_signal())
    };

    let mut buffer = [0_u8; READ_BUFFER_SIZE];

    loop {
        let (pending_completion, escape_deadline, question_signal) = {
            let mut interface = lock_interface(&safe_interface)?;
            if interface.is_closed() {
                return Ok(());
            }
            (
                interface.take_pending_completion(),
                interface.escape_deadline(),
                interface.question_abort_signal(),
            )
        };

        // Input stays unread until the completer answers.
        if let Some(CompletionRequest {
            future,
            last_keypress_was_tab,
        }) = pending_completion
        {
            tokio::select! {
                result = future => {
                    lock_interface(&safe_interface)?
                        .finish_completion(result, last_keypress_was_tab)?;
                }
                () = wait_for_abort(signal.clone()) => {
                    lock_interface(&safe_interface)?.close()?;
                }
                // Closed elsewhere: the completion is dropped unanswered.
                () = closed.aborted() => return Ok(()),
            }
            continue;
        }

        tokio::select! {
            // This branch is cancel safe because `read` is cancel safe.
            result_read = stream.read(&mut buffer) => {
                let count = result_read?;
                let mut interface = lock_interface(&safe_interface)?;
                if interface.is_closed() {
                    return Ok(());
                }
                if count == 0 {
                    tracing::debug!(message = "input stream ended");
                    return interface.end_of_input();
                }
                interface.feed(&buffer[..count])?;
            }

            () = sleep_until_deadline(escape_deadline) => {
                lock_interface(&safe_interface)?.fire_escape_timeout()?;
            }

            () = wait_for_abort(signal.clone()) => {
                lock_interface(&safe_interface)?.close()?;
            }

            () = wait_for_abort(question_signal) => {
                lock_interface(&safe_interface)?.cancel_aborted_question()?;
            }

            () = closed.aborted() => return Ok(()),
        }
    }
}

async fn sleep_until_deadline(deadline: Option<std::time::Instant>) {
    match deadline {
        Some(deadline) => {
            tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
        }
        None => std::future::pending::<()>().await,
    }
}
