// ABOUTME: Caller-supplied cancellation signal for polling waits.
// ABOUTME: Built on a tokio watch channel; cloning shares the same signal.

use std::sync::Arc;
use tokio::sync::watch;

/// A cancellation signal handed to long-running convergence operations.
///
/// Cancellation only stops the local polling wait. A mutation already
/// submitted to the platform keeps running on the remote side; the next
/// invocation observes whatever state it produced.
#[derive(Debug, Clone)]
pub struct CancelToken {
    signal: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            signal: Arc::new(tx),
        }
    }

    /// Request cancellation. All clones of this token observe it.
    pub fn cancel(&self) {
        self.signal.send_replace(true);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        *self.signal.borrow()
    }

    /// Resolves once cancellation is requested. Never resolves otherwise.
    pub async fn cancelled(&self) {
        let mut rx = self.signal.subscribe();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                // All senders gone; we hold one, so this is unreachable in
                // practice. Park forever rather than spin.
                std::future::pending::<()>().await;
            }
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
