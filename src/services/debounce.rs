use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Cancellable quiescence timer.
///
/// `schedule` replaces whatever was pending: only the last scheduled action
/// runs, and only after `window` has passed without another `schedule`.
/// Dropping the debouncer cancels the pending action.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Runs `action` once the window elapses, cancelling any earlier action.
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&mut self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let window = self.window;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            action.await;
        }));
    }

    /// Aborts the pending action, including one already past its timer
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
