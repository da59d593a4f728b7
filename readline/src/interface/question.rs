// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{pin::Pin,
          task::{Context, Poll}};

use futures_util::{FutureExt, future::BoxFuture};
use tokio::sync::oneshot;

use crate::{AbortSignal, ReadlineError, ReadlineResult, wait_for_abort};

/// The question waiting for its answer, and the prompt to put back afterwards.
#[derive(Debug)]
pub struct PendingQuestion {
    pub sender: oneshot::Sender<String>,
    pub old_prompt: String,
    pub signal: Option<AbortSignal>,
}

impl PendingQuestion {
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.signal.as_ref().is_some_and(AbortSignal::is_aborted)
    }
}

/// Resolves with the next committed line.
///
/// - [`ReadlineError::Closed`] if the interface closes first.
/// - [`ReadlineError::QuestionAborted`] if the question's signal is aborted first.
#[allow(missing_debug_implementations)]
pub struct QuestionAnswer {
    inner: BoxFuture<'static, ReadlineResult<String>>,
}

impl QuestionAnswer {
    #[must_use]
    pub fn new(receiver: oneshot::Receiver<String>, signal: Option<AbortSignal>) -> Self {
        let inner = async move {
            tokio::select! {
                biased;
                result = receiver => result.map_err(|_| {
                    // Cancelling an aborted question drops the sender.
                    if signal.as_ref().is_some_and(AbortSignal::is_aborted) {
                        ReadlineError::QuestionAborted
                    } else {
                        ReadlineError::Closed
                    }
                }),
                () = wait_for_abort(signal.clone()) => Err(ReadlineError::QuestionAborted),
            }
        }
        .boxed();
        Self { inner }
    }
}

impl Future for QuestionAnswer {
    type Output = ReadlineResult<String>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.poll_unpin(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AbortController;

    #[tokio::test]
    async fn test_answer() {
        let (sender, receiver) = oneshot::channel();
        let answer = QuestionAnswer::new(receiver, None);
        sender.send("42".to_string()).unwrap();
        assert_eq!(answer.await.unwrap(), "42");
    }

    #[tokio::test]
    async fn test_dropped_sender_means_closed() {
        let (sender, receiver) = oneshot::channel::<String>();
        let answer = QuestionAnswer::new(receiver, None);
        drop(sender);
        assert!(matches!(answer.await, Err(ReadlineError::Closed)));
    }

    #[tokio::test]
    async fn test_dropped_sender_after_abort() {
        let controller = AbortController::new();
        let (sender, receiver) = oneshot::channel::<String>();
        let answer = QuestionAnswer::new(receiver, Some(controller.signal()));
        controller.abort();
        drop(sender);
        assert!(matches!(answer.await, Err(ReadlineError::QuestionAborted)));
    }

    #[tokio::test]
    async fn test_abort() {
        let controller = AbortController::new();
        let (_sender, receiver) = oneshot::channel::<String>();
        let answer = QuestionAnswer::new(receiver, Some(controller.signal()));
        controller.abort();
        assert!(matches!(answer.await, Err(ReadlineError::QuestionAborted)));
    }
}
