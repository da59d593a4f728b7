// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use tokio::sync::watch;

/// Owner side of a cancellation signal. Aborting is permanent.
#[derive(Debug)]
pub struct AbortController {
    sender: watch::Sender<bool>,
}

/// Observer side, cheap to clone. Pass it in [`crate::InterfaceOptions::signal`] or to
/// [`crate::Interface::question_with_signal()`].
#[derive(Debug, Clone)]
pub struct AbortSignal {
    receiver: watch::Receiver<bool>,
}

impl Default for AbortController {
    fn default() -> Self { Self::new() }
}

impl AbortController {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _receiver) = watch::channel(false);
        Self { sender }
    }

    #[must_use]
    pub fn signal(&self) -> AbortSignal {
        AbortSignal {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn abort(&self) {
        self.sender.send_replace(true);
    }

    #[must_use]
    pub fn is_aborted(&self) -> bool { *self.sender.borrow() }
}

impl AbortSignal {
    #[must_use]
    pub fn is_aborted(&self) -> bool { *self.receiver.borrow() }

    /// Resolves once aborted. Never resolves if the controller is dropped without
    /// aborting.
    pub async fn aborted(&self) {
        let mut receiver = self.receiver.clone();
        let aborted = receiver.wait_for(|it| *it).await.is_ok();
        if !aborted {
            std::future::pending::<()>().await;
        }
    }
}

/// Waits on an optional signal. `None` never resolves, which makes it usable as a
/// `tokio::select!` branch.
pub async fn wait_for_abort(signal: Option<AbortSignal>) {
    match signal {
        Some(signal) => signal.aborted().await,
        None => std::future::pending::<()>().await,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_abort_wakes_waiters() {
        let controller = AbortController::new();
        let signal = controller.signal();
        assert!(!signal.is_aborted());

        let waiter = tokio::spawn({
            let signal = signal.clone();
            async move { signal.aborted().await }
        });
        controller.abort();
        waiter.await.unwrap();

        assert!(signal.is_aborted());
        assert!(controller.is_aborted());
        // Already aborted resolves right away.
        signal.aborted().await;
    }

    #[tokio::test]
    async fn test_dropped_controller_never_aborts() {
        let signal = AbortController::new().signal();
        let result = tokio::time::timeout(Duration::from_millis(20), signal.aborted()).await;
        assert!(result.is_err());
        assert!(!signal.is_aborted());
    }

    #[tokio::test]
    async fn test_wait_for_none_is_pending() {
        let result = tokio::time::timeout(Duration::from_millis(20), wait_for_abort(None)).await;
        assert!(result.is_err());
    }
}
