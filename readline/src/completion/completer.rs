// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use futures_util::{FutureExt, future::BoxFuture};

/// What a completer returns for the text left of the cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    /// Possible completions. An empty string starts a new group in the listing.
    pub candidates: Vec<String>,
    /// The part of the input the candidates complete, eg the last word.
    pub matched: String,
}

impl Completion {
    pub fn new(
        candidates: impl IntoIterator<Item = impl Into<String>>,
        matched: impl Into<String>,
    ) -> Self {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
            matched: matched.into(),
        }
    }
}

pub type CompletionResult = miette::Result<Completion>;
pub type CompletionFuture = BoxFuture<'static, CompletionResult>;
/// Handed to callback style completers. Call it exactly once.
pub type CompletionCallback = Box<dyn FnOnce(CompletionResult) + Send>;

/// A user supplied tab completer. It receives the text left of the cursor.
#[allow(missing_debug_implementations)]
pub enum Completer {
    Sync(Box<dyn FnMut(&str) -> CompletionResult + Send>),
    Async(Box<dyn FnMut(String) -> CompletionFuture + Send>),
}

/// A completion that either finished synchronously or has to be awaited.
#[allow(missing_debug_implementations)]
pub enum PendingCompletion {
    Ready(CompletionResult),
    Waiting(CompletionFuture),
}

impl Completer {
    pub fn new_sync(
        completer: impl FnMut(&str) -> CompletionResult + Send + 'static,
    ) -> Self {
        Completer::Sync(Box::new(completer))
    }

    pub fn new_async<F>(mut completer: impl FnMut(String) -> F + Send + 'static) -> Self
    where
        F: Future<Output = CompletionResult> + Send + 'static,
    {
        Completer::Async(Box::new(move |line| completer(line).boxed()))
    }

    /// Adapts a completer that reports through a callback. A callback that is dropped
    /// without being called fails the completion.
    pub fn from_callback(
        mut completer: impl FnMut(&str, CompletionCallback) + Send + 'static,
    ) -> Self {
        Completer::Async(Box::new(move |line| {
            let (sender, receiver) = tokio::sync::oneshot::channel::<CompletionResult>();
            completer(
                &line,
                Box::new(move |result| {
                    // The receiver is gone if the interface closed meanwhile.
                    let _unused = sender.send(result);
                }),
            );
            async move {
                receiver
                    .await
                    .unwrap_or_else(|_| Err(miette::miette!("completer dropped its callback")))
            }
            .boxed()
        }))
    }

    pub fn complete(&mut self, line: &str) -> PendingCompletion {
        match self {
            Completer::Sync(completer) => PendingCompletion::Ready(completer(line)),
            Completer::Async(completer) => PendingCompletion::Waiting(completer(line.to_string())),
        }
    }
}

/// Longest common prefix of `strings`, compared char by char between the
/// lexicographically smallest and largest entries.
pub fn common_prefix<'a>(strings: impl IntoIterator<Item = &'a str>) -> String {
    let mut iter = strings.into_iter();
    let Some(first) = iter.next() else {
        return String::new();
    };

    let (min, max) = iter.fold((first, first), |(min, max), it| (min.min(it), max.max(it)));

    let len = min
        .char_indices()
        .zip(max.chars())
        .find(|((_, lhs), rhs)| lhs != rhs)
        .map_or(min.len(), |((index, _), _)| index);

    min[..len].to_string()
}
