// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{collections::VecDeque,
          io::Write,
          sync::Arc,
          time::{Duration, Instant}};

use tokio::sync::{mpsc, oneshot};

use super::{AbortController, AbortSignal, EventListeners, InterfaceEvent,
            InterfaceEventKind, InterfaceOptions, PendingQuestion, QuestionAnswer};
use crate::{CommittedLine, Completer, CompletionFuture, DisplayPosition, ESC, History,
            InputDevice, KeyDecoder, KeyEvent, Keypress, LineEditor, OutputDevice,
            ReadlineError, ReadlineResult, StdMutex, Utf8ChunkDecoder};

pub type SafeInterface = Arc<StdMutex<Interface>>;

/// An async completion that [`crate::run()`] has to await outside the lock.
#[allow(missing_debug_implementations)]
pub struct CompletionRequest {
    pub future: CompletionFuture,
    pub last_keypress_was_tab: bool,
}

/// The line editing interface. It is a synchronous state machine: bytes go in through
/// [`Self::feed()`], output is written to the [`OutputDevice`] as a side effect, and
/// [`InterfaceEvent`]s are delivered to listeners registered with [`Self::on()`].
///
/// 1. In terminal mode input is decoded into keys which edit the line. `Enter` commits
///    it to history and emits [`InterfaceEvent::Line`].
/// 2. Otherwise input is split into lines on `\n`, `\r\n` and `\r`.
///
/// [`crate::run()`] pumps an async input stream into a [`SafeInterface`]. Listeners run
/// while the interface is locked, so they must not lock it again.
///
/// Every public method fails with [`ReadlineError::Closed`] once the interface is
/// closed, except [`Self::close()`] itself and the accessors.
#[allow(missing_debug_implementations)]
pub struct Interface {
    pub(super) input: InputDevice,
    pub(super) output: Option<OutputDevice>,
    pub(super) completer: Option<Completer>,
    pub(super) editor: LineEditor,
    pub(super) key_decoder: KeyDecoder,
    pub(super) utf8_decoder: Utf8ChunkDecoder,
    pub(super) terminal: bool,
    pub(super) dumb_terminal: bool,
    pub(super) crlf_delay: Duration,
    pub(super) saw_return_at: Option<Instant>,
    pub(super) previous_key: Option<KeyEvent>,
    /// Tab only completes when it is the last key of its chunk. A pasted tab is text.
    pub(super) completion_enabled: bool,
    /// Unterminated input in non-terminal mode.
    pub(super) line_buffer: String,
    pub(super) paused: bool,
    pub(super) closed: bool,
    /// Bytes fed while paused, replayed on resume.
    pub(super) paused_input: Vec<u8>,
    pub(super) listeners: EventListeners,
    pub(super) line_senders: Vec<mpsc::UnboundedSender<String>>,
    pub(super) question: Option<PendingQuestion>,
    pub(super) pending_completion: Option<CompletionRequest>,
    pub(super) signal: Option<AbortSignal>,
    /// Fired by [`Self::close()`] so that [`crate::run()`] stops waiting.
    pub(super) closed_controller: AbortController,
}

impl Interface {
    /// In terminal mode this puts the input device into raw mode right away. If
    /// [`InterfaceOptions::signal`] is already aborted the interface starts out closed.
    ///
    /// # Errors
    ///
    /// [`ReadlineError::InvalidOption`] if the options don't validate, or an error from
    /// the input device's raw mode switch.
    pub fn try_new(
        input: InputDevice,
        output: Option<OutputDevice>,
        completer: Option<Completer>,
        options: InterfaceOptions,
    ) -> ReadlineResult<Self> {
        options.validate()?;

        let columns = output.as_ref().and_then(|it| it.columns);
        let history = History::new(
            options.history.clone(),
            options.history_size,
            options.remove_history_duplicates,
        );

        let mut this = Self {
            input,
            output,
            completer,
            editor: LineEditor::new(
                options.prompt.clone(),
                history,
                columns,
                options.tab_size,
            ),
            key_decoder: KeyDecoder::new(options.escape_code_timeout()),
            utf8_decoder: Utf8ChunkDecoder::default(),
            terminal: options.terminal,
            dumb_terminal: options.dumb_terminal,
            crlf_delay: options.crlf_delay(),
            saw_return_at: None,
            previous_key: None,
            completion_enabled: true,
            line_buffer: String::new(),
            paused: false,
            closed: false,
            paused_input: vec![],
            listeners: EventListeners::default(),
            line_senders: vec![],
            question: None,
            pending_completion: None,
            signal: options.signal,
            closed_controller: AbortController::new(),
        };

        if this.terminal {
            this.input.set_raw_mode(true)?;
        }

        if this.signal.as_ref().is_some_and(AbortSignal::is_aborted) {
            this.close()?;
        }

        Ok(this)
    }

    /// Stdin and stdout. `TERM=dumb` turns on [`InterfaceOptions::dumb_terminal`].
    ///
    /// # Errors
    ///
    /// See [`Self::try_new()`].
    pub fn for_stdio(
        completer: Option<Completer>,
        mut options: InterfaceOptions,
    ) -> ReadlineResult<Self> {
        if std::env::var("TERM").is_ok_and(|it| it == "dumb") {
            options.dumb_terminal = true;
        }
        Self::try_new(
            InputDevice::new_stdin(),
            Some(OutputDevice::new_stdout()),
            completer,
            options,
        )
    }

    #[must_use]
    pub fn into_safe(self) -> SafeInterface { Arc::new(StdMutex::new(self)) }

    /// Delivers a chunk of input bytes. Chunks may split UTF-8 sequences and escape
    /// sequences anywhere.
    ///
    /// # Errors
    ///
    /// [`ReadlineError::Closed`] after close, or an output error. A failed key resets
    /// the key decoder before the error is returned.
    pub fn feed(&mut self, bytes: &[u8]) -> ReadlineResult<()> {
        self.check_open()?;

        if self.paused {
            self.paused_input.extend_from_slice(bytes);
            return Ok(());
        }

        let text = self.utf8_decoder.decode(bytes);
        if text.is_empty() {
            return Ok(());
        }

        if self.terminal {
            self.feed_keys(&text)
        } else {
            self.normal_write(&text);
            Ok(())
        }
    }

    /// Injects text and/or a key as if it had been typed. In terminal mode the key goes
    /// straight to key handling (an absent key inserts `data`). Otherwise `data` is split
    /// into lines.
    ///
    /// # Errors
    ///
    /// [`ReadlineError::Closed`] after close, or an output error.
    pub fn write(&mut self, data: Option<&str>, key: Option<&KeyEvent>) -> ReadlineResult<()> {
        self.check_open()?;
        self.resume_inner()?;

        if self.terminal {
            let keypress = Keypress {
                text: data.map(str::to_string),
                key: key.cloned().unwrap_or_default(),
            };
            self.handle_keypress(keypress)
        } else {
            if let Some(data) = data {
                self.normal_write(data);
            }
            Ok(())
        }
    }

    /// Shows the prompt and resumes input. In terminal mode the line is redrawn with the
    /// cursor at 0, or where it was if `preserve_cursor` is set.
    ///
    /// # Errors
    ///
    /// [`ReadlineError::Closed`] after close, or an output error.
    pub fn prompt(&mut self, preserve_cursor: bool) -> ReadlineResult<()> {
        self.check_open()?;
        self.resume_inner()?;

        if self.terminal && !self.dumb_terminal {
            if !preserve_cursor {
                self.editor.line_state.set_cursor(0);
            }
            self.edit(LineEditor::refresh_line)
        } else {
            let prompt = self.editor.prompt.clone();
            self.write_output(&prompt)
        }
    }

    /// # Errors
    ///
    /// [`ReadlineError::Closed`] after close.
    pub fn set_prompt(&mut self, prompt: impl Into<String>) -> ReadlineResult<()> {
        self.check_open()?;
        self.editor.prompt = prompt.into();
        Ok(())
    }

    #[must_use]
    pub fn get_prompt(&self) -> &str { &self.editor.prompt }

    /// Moves past the current line and empties it without committing.
    ///
    /// # Errors
    ///
    /// [`ReadlineError::Closed`] after close, or an output write error.
    pub fn clear_line(&mut self) -> ReadlineResult<()> {
        self.check_open()?;
        self.edit(LineEditor::clear_line)
    }

    /// Shows `query` as the prompt. The next committed line answers it instead of being
    /// emitted as [`InterfaceEvent::Line`], and the old prompt comes back.
    ///
    /// # Errors
    ///
    /// - [`ReadlineError::Closed`] after close.
    /// - [`ReadlineError::QuestionPending`] if a question is already waiting. The prompt
    ///   is redrawn.
    pub fn question(&mut self, query: impl Into<String>) -> ReadlineResult<QuestionAnswer> {
        self.ask(query.into(), None)
    }

    /// Like [`Self::question()`], but aborting `signal` restores the old prompt, clears
    /// the line and fails the answer with [`ReadlineError::QuestionAborted`].
    ///
    /// # Errors
    ///
    /// [`ReadlineError::QuestionAborted`] right away if `signal` is already aborted,
    /// otherwise the same as [`Self::question()`].
    pub fn question_with_signal(
        &mut self,
        query: impl Into<String>,
        signal: AbortSignal,
    ) -> ReadlineResult<QuestionAnswer> {
        self.ask(query.into(), Some(signal))
    }

    fn ask(
        &mut self,
        query: String,
        signal: Option<AbortSignal>,
    ) -> ReadlineResult<QuestionAnswer> {
        self.check_open()?;

        if signal.as_ref().is_some_and(AbortSignal::is_aborted) {
            return Err(ReadlineError::QuestionAborted);
        }

        if self.question.is_some() {
            self.prompt(false)?;
            return Err(ReadlineError::QuestionPending);
        }

        let (sender, receiver) = oneshot::channel();
        let old_prompt = std::mem::replace(&mut self.editor.prompt, query);
        self.question = Some(PendingQuestion {
            sender,
            old_prompt,
            signal: signal.clone(),
        });
        self.prompt(false)?;

        Ok(QuestionAnswer::new(receiver, signal))
    }

    /// Drops the pending question if its signal was aborted.
    ///
    /// # Errors
    ///
    /// Returns an error if the output can't be written to.
    pub fn cancel_aborted_question(&mut self) -> ReadlineResult<()> {
        if !self.question.as_ref().is_some_and(PendingQuestion::is_aborted) {
            return Ok(());
        }
        if let Some(question) = self.question.take() {
            self.editor.prompt = question.old_prompt;
            self.edit(LineEditor::clear_line)?;
        }
        Ok(())
    }

    /// Stops processing input, which is buffered until [`Self::resume()`]. Emits
    /// [`InterfaceEvent::Pause`] if this changed anything.
    ///
    /// # Errors
    ///
    /// [`ReadlineError::Closed`] after close.
    pub fn pause(&mut self) -> ReadlineResult<()> {
        self.check_open()?;
        self.pause_inner();
        Ok(())
    }

    /// Emits [`InterfaceEvent::Resume`] if paused, then processes buffered input.
    ///
    /// # Errors
    ///
    /// [`ReadlineError::Closed`] after close, or an error from the buffered input.
    pub fn resume(&mut self) -> ReadlineResult<()> {
        self.check_open()?;
        self.resume_inner()
    }

    pub(super) fn pause_inner(&mut self) {
        if self.paused {
            return;
        }
        self.paused = true;
        self.listeners.emit(&InterfaceEvent::Pause);
    }

    pub(super) fn resume_inner(&mut self) -> ReadlineResult<()> {
        if !self.paused {
            return Ok(());
        }
        self.paused = false;
        self.listeners.emit(&InterfaceEvent::Resume);
        self.replay_paused_input()
    }

    pub(super) fn replay_paused_input(&mut self) -> ReadlineResult<()> {
        let buffered = std::mem::take(&mut self.paused_input);
        if buffered.is_empty() {
            Ok(())
        } else {
            self.feed(&buffered)
        }
    }

    /// Pauses, leaves raw mode, emits [`InterfaceEvent::Close`] and drops every listener.
    /// A pending question or completion fails with [`ReadlineError::Closed`], and every
    /// [`Self::lines()`] receiver ends. Closing twice does nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode can't be turned off. The interface is closed anyway.
    pub fn close(&mut self) -> ReadlineResult<()> {
        if self.closed {
            return Ok(());
        }

        self.pause_inner();
        self.key_decoder.reset();
        let raw_mode_result = if self.terminal {
            self.input.set_raw_mode(false)
        } else {
            Ok(())
        };

        self.closed = true;
        self.closed_controller.abort();
        self.question = None;
        self.pending_completion = None;
        self.paused_input.clear();

        tracing::debug!(message = "readline interface closed", terminal = self.terminal);
        self.listeners.emit(&InterfaceEvent::Close);
        self.listeners.clear();
        self.line_senders.clear();

        raw_mode_result
    }

    /// The input stream ended. Whatever is left of the line is emitted, then the
    /// interface closes.
    ///
    /// # Errors
    ///
    /// Returns an error from the last keys or from [`Self::close()`].
    pub fn end_of_input(&mut self) -> ReadlineResult<()> {
        if self.closed {
            return Ok(());
        }

        let tail = self.utf8_decoder.finish();
        if self.terminal {
            if !tail.is_empty() {
                self.feed_keys(&tail)?;
            }
            if !self.closed && !self.editor.text().is_empty() {
                let line = self.editor.text().to_string();
                self.emit_line(line);
            }
        } else {
            self.normal_write(&tail);
            let line = std::mem::take(&mut self.line_buffer);
            if !line.is_empty() {
                self.emit_line(line);
            }
        }

        self.close()
    }

    /// The terminal width changed. `None` means unknown.
    ///
    /// # Errors
    ///
    /// [`ReadlineError::Closed`] after close, or an output error.
    pub fn resize(&mut self, columns: Option<usize>) -> ReadlineResult<()> {
        self.check_open()?;
        self.editor.columns = columns;
        if let Some(output) = self.output.as_mut() {
            output.columns = columns;
        }
        if self.terminal && !self.dumb_terminal {
            self.edit(LineEditor::refresh_line)?;
        }
        Ok(())
    }

    /// The process was continued after `Ctrl+Z` suspended it. Pauses (emitting
    /// [`InterfaceEvent::Sigcont`] if it wasn't paused), re-enters raw mode and redraws.
    ///
    /// # Errors
    ///
    /// [`ReadlineError::Closed`] after close, a raw mode error, or an output error.
    pub fn on_sigcont(&mut self) -> ReadlineResult<()> {
        self.check_open()?;
        if !self.paused {
            self.pause_inner();
            self.listeners.emit(&InterfaceEvent::Sigcont);
        }
        self.input.set_raw_mode(true)?;
        self.edit(LineEditor::refresh_line)
    }

    /// # Errors
    ///
    /// [`ReadlineError::Closed`] after close.
    pub fn on(
        &mut self,
        kind: InterfaceEventKind,
        listener: impl FnMut(&InterfaceEvent) + Send + 'static,
    ) -> ReadlineResult<()> {
        self.check_open()?;
        self.listeners.add(kind, Box::new(listener));
        Ok(())
    }

    #[must_use]
    pub fn listener_count(&self, kind: InterfaceEventKind) -> usize {
        self.listeners.count(kind)
    }

    /// Every line emitted from now on. The receiver ends when the interface closes.
    ///
    /// # Errors
    ///
    /// [`ReadlineError::Closed`] after close.
    pub fn lines(&mut self) -> ReadlineResult<mpsc::UnboundedReceiver<String>> {
        self.check_open()?;
        let (sender, receiver) = mpsc::unbounded_channel();
        self.line_senders.push(sender);
        Ok(receiver)
    }

    #[must_use]
    pub fn line(&self) -> &str { self.editor.text() }

    /// Byte offset of the cursor in [`Self::line()`].
    #[must_use]
    pub fn cursor(&self) -> usize { self.editor.cursor() }

    /// Row and column of the cursor, counting the prompt and wrapping.
    #[must_use]
    pub fn cursor_position(&self) -> DisplayPosition { self.editor.cursor_position() }

    /// Most recent first.
    #[must_use]
    pub fn history(&self) -> &VecDeque<String> { &self.editor.history.entries }

    #[must_use]
    pub fn is_closed(&self) -> bool { self.closed }

    #[must_use]
    pub fn is_paused(&self) -> bool { self.paused }

    #[must_use]
    pub fn is_terminal(&self) -> bool { self.terminal }

    #[must_use]
    pub fn abort_signal(&self) -> Option<AbortSignal> { self.signal.clone() }

    /// Aborted once the interface closes, whoever closed it.
    #[must_use]
    pub fn closed_signal(&self) -> AbortSignal { self.closed_controller.signal() }

    #[must_use]
    pub fn question_abort_signal(&self) -> Option<AbortSignal> {
        self.question.as_ref().and_then(|it| it.signal.clone())
    }

    /// When a lone `ESC` should be taken as the escape key, if one is waiting.
    #[must_use]
    pub fn escape_deadline(&self) -> Option<Instant> { self.key_decoder.escape_deadline() }

    /// Finishes a lone `ESC` as the escape key.
    ///
    /// # Errors
    ///
    /// [`ReadlineError::Closed`] after close, or an output error.
    pub fn fire_escape_timeout(&mut self) -> ReadlineResult<()> {
        self.check_open()?;
        match self.key_decoder.on_escape_timeout() {
            Some(keypress) => self.handle_keypress_or_reset(keypress),
            None => Ok(()),
        }
    }

    /// Calls [`Self::fire_escape_timeout()`] if the deadline has passed at `now`.
    ///
    /// # Errors
    ///
    /// See [`Self::fire_escape_timeout()`].
    pub fn poll_escape_timeout(&mut self, now: Instant) -> ReadlineResult<()> {
        match self.escape_deadline() {
            Some(deadline) if now >= deadline => self.fire_escape_timeout(),
            _ => Ok(()),
        }
    }

    pub(super) fn check_open(&mut self) -> ReadlineResult<()> {
        if !self.closed && self.signal.as_ref().is_some_and(AbortSignal::is_aborted) {
            self.close()?;
        }
        self.cancel_aborted_question()?;
        if self.closed {
            return Err(ReadlineError::Closed);
        }
        Ok(())
    }

    pub(super) fn feed_keys(&mut self, text: &str) -> ReadlineResult<()> {
        self.key_decoder.cancel_escape_timer();

        let char_count = text.chars().count();
        for (index, ch) in text.chars().enumerate() {
            self.completion_enabled = index + 1 == char_count;
            if let Some(keypress) = self.key_decoder.feed(ch) {
                self.handle_keypress_or_reset(keypress)?;
            }
            if self.closed {
                return Ok(());
            }
        }

        if text.ends_with(ESC) {
            self.key_decoder.arm_escape_timer(Instant::now());
        }
        Ok(())
    }

    fn handle_keypress_or_reset(&mut self, keypress: Keypress) -> ReadlineResult<()> {
        let result = self.handle_keypress(keypress);
        if let Err(error) = &result {
            self.key_decoder.reset();
            tracing::warn!(message = "key handling failed, decoder reset", error = %error);
        }
        result
    }

    pub(super) fn handle_keypress(&mut self, keypress: Keypress) -> ReadlineResult<()> {
        let Keypress { text, key } = keypress;
        if self.dumb_terminal {
            self.tty_write_dumb(text.as_deref(), &key)
        } else {
            self.tty_write(text.as_deref(), &key)
        }
    }

    /// Commits the line: history, then a fresh row, then the line goes out.
    pub(super) fn commit_line(&mut self) -> ReadlineResult<()> {
        let CommittedLine {
            line,
            history_updated,
        } = self.editor.add_history();

        if history_updated {
            let entries = self.editor.history.entries.iter().cloned().collect();
            self.listeners.emit(&InterfaceEvent::History(entries));
        }

        self.editor.undo_redo.clear();
        self.edit(LineEditor::clear_line)?;
        self.on_line(line);
        Ok(())
    }

    /// A pending question takes the line, otherwise it is emitted.
    pub(super) fn on_line(&mut self, line: String) {
        match self.question.take() {
            Some(question) => {
                self.editor.prompt = question.old_prompt;
                // The answer future may have been dropped.
                let _unused = question.sender.send(line);
            }
            None => self.emit_line(line),
        }
    }

    pub(super) fn emit_line(&mut self, line: String) {
        self.listeners.emit(&InterfaceEvent::Line(line.clone()));
        self.line_senders
            .retain(|sender| sender.send(line.clone()).is_ok());
    }

    /// `Ctrl+C`: [`InterfaceEvent::Sigint`] if anyone listens, otherwise close.
    pub(super) fn interrupt(&mut self) -> ReadlineResult<()> {
        if self.listeners.count(InterfaceEventKind::Sigint) > 0 {
            self.listeners.emit(&InterfaceEvent::Sigint);
            Ok(())
        } else {
            self.close()
        }
    }

    /// Runs a [`LineEditor`] operation against the output, then flushes.
    pub(super) fn edit<R>(
        &mut self,
        op: impl FnOnce(&mut LineEditor, &mut dyn Write) -> ReadlineResult<R>,
    ) -> ReadlineResult<R> {
        match self.output.as_mut() {
            Some(output) => {
                let result = op(&mut self.editor, &mut *output.resource)?;
                output.resource.flush()?;
                Ok(result)
            }
            None => op(&mut self.editor, &mut std::io::sink()),
        }
    }

    pub(super) fn write_output(&mut self, text: &str) -> ReadlineResult<()> {
        if let Some(output) = self.output.as_mut() {
            output.resource.write_all(text.as_bytes())?;
            output.resource.flush()?;
        }
        Ok(())
    }

    pub(super) fn take_pending_completion(&mut self) -> Option<CompletionRequest> {
        self.pending_completion.take()
    }
}
