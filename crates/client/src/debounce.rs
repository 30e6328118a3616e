//! Trailing-edge debouncing for rapid UI events.
//!
//! A [`Debouncer`] owns a background task. Each [`Debouncer::call`] restarts
//! the quiet window; once the window passes without another call, the handler
//! runs once with the last value. Calls made while the handler is running are
//! queued and debounced again afterwards.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Coalesces bursts of values into a single handler call.
///
/// Must be created inside a Tokio runtime. Dropping the debouncer cancels any
/// pending call.
pub struct Debouncer<T> {
    window: Duration,
    sender: mpsc::UnboundedSender<T>,
    task: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawn a debouncer that runs `handler` after `window` of quiet.
    pub fn new<F, Fut>(window: Duration, mut handler: F) -> Self
    where
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (sender, mut receiver) = mpsc::unbounded_channel::<T>();

        let task = tokio::spawn(async move {
            while let Some(mut latest) = receiver.recv().await {
                loop {
                    match tokio::time::timeout(window, receiver.recv()).await {
                        Ok(Some(newer)) => latest = newer,
                        // Every sender is gone; the pending value is dropped
                        Ok(None) => return,
                        Err(_) => break,
                    }
                }
                handler(latest).await;
            }
        });

        Self {
            window,
            sender,
            task,
        }
    }

    /// Record an event, restarting the quiet window.
    pub fn call(&self, value: T) {
        if self.sender.send(value).is_err() {
            debug!("Debouncer task has stopped; event dropped");
        }
    }

    /// Length of the quiet window.
    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn recording_debouncer(window_ms: u64) -> (Debouncer<u32>, Arc<Mutex<Vec<u32>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        let debouncer = Debouncer::new(Duration::from_millis(window_ms), move |value| {
            let sink = Arc::clone(&sink);
            async move {
                sink.lock().unwrap().push(value);
            }
        });
        (debouncer, calls)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_produces_one_call_with_last_value() {
        let (debouncer, calls) = recording_debouncer(500);

        for value in 0..10 {
            debouncer.call(value);
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(*calls.lock().unwrap(), vec![9]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_produce_separate_calls() {
        let (debouncer, calls) = recording_debouncer(100);

        debouncer.call(1);
        debouncer.call(2);
        tokio::time::sleep(Duration::from_millis(250)).await;
        debouncer.call(3);
        tokio::time::sleep(Duration::from_millis(250)).await;

        assert_eq!(*calls.lock().unwrap(), vec![2, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_fires_before_window_elapses() {
        let (debouncer, calls) = recording_debouncer(250);

        debouncer.call(7);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(calls.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(*calls.lock().unwrap(), vec![7]);
        assert_eq!(debouncer.window(), Duration::from_millis(250));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_call() {
        let (debouncer, calls) = recording_debouncer(100);

        debouncer.call(1);
        drop(debouncer);
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert!(calls.lock().unwrap().is_empty());
    }
}
