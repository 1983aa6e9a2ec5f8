/// Debounced search input
///
/// Raw keystrokes go in through [`DebouncedInput::set`]; the settled text comes
/// out of a `watch` channel only after the input has been quiet for the whole
/// interval. Each keystroke restarts the wait, so intermediate values typed
/// in quick succession are never published.
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

pub struct DebouncedInput {
    input_tx: watch::Sender<String>,
    settled_rx: watch::Receiver<String>,
    task: JoinHandle<()>,
}

impl DebouncedInput {
    /// Starts the debounce task. Must be called inside a Tokio runtime.
    pub fn spawn(interval: Duration) -> Self {
        let (input_tx, input_rx) = watch::channel(String::new());
        let (settled_tx, settled_rx) = watch::channel(String::new());

        let task = tokio::spawn(debounce_loop(input_rx, settled_tx, interval));

        Self {
            input_tx,
            settled_rx,
            task,
        }
    }

    /// Records the live text value; cancels any pending publish
    pub fn set(&self, text: impl Into<String>) {
        self.input_tx.send_replace(text.into());
    }

    /// Most recently settled text
    pub fn settled(&self) -> String {
        self.settled_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.settled_rx.clone()
    }
}

impl Drop for DebouncedInput {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn debounce_loop(
    mut input_rx: watch::Receiver<String>,
    settled_tx: watch::Sender<String>,
    interval: Duration,
) {
    while input_rx.changed().await.is_ok() {
        loop {
            match tokio::time::timeout(interval, input_rx.changed()).await {
                Ok(Ok(())) => continue,
                Ok(Err(_)) => return,
                Err(_) => break,
            }
        }

        let latest = input_rx.borrow_and_update().clone();
        let published = settled_tx.send_if_modified(|current| {
            if *current == latest {
                return false;
            }
            *current = latest.clone();
            true
        });

        if published {
            tracing::debug!(query = %latest, "Search text settled");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{sleep, Instant};

    const INTERVAL: Duration = Duration::from_millis(1000);

    #[tokio::test(start_paused = true)]
    async fn test_publishes_after_quiet_interval() {
        let tracker = DebouncedInput::spawn(INTERVAL);
        let mut settled = tracker.subscribe();
        let start = Instant::now();

        tracker.set("dune");
        settled.changed().await.unwrap();

        assert_eq!(*settled.borrow(), "dune");
        assert!(start.elapsed() >= INTERVAL);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_typing_publishes_only_final_value() {
        let tracker = DebouncedInput::spawn(INTERVAL);
        let mut settled = tracker.subscribe();

        for text in ["b", "ba", "bat", "batm", "batman"] {
            tracker.set(text);
            sleep(Duration::from_millis(300)).await;
        }

        // 300ms since the last keystroke: nothing yet
        assert!(!settled.has_changed().unwrap());

        sleep(Duration::from_millis(699)).await;
        assert!(!settled.has_changed().unwrap());

        sleep(Duration::from_millis(2)).await;
        assert!(settled.has_changed().unwrap());
        assert_eq!(*settled.borrow_and_update(), "batman");

        // No late publish of an intermediate value
        sleep(Duration::from_secs(5)).await;
        assert!(!settled.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_returning_to_same_text_does_not_republish() {
        let tracker = DebouncedInput::spawn(INTERVAL);
        let mut settled = tracker.subscribe();

        tracker.set("alien");
        settled.changed().await.unwrap();
        settled.borrow_and_update();

        tracker.set("aliens");
        sleep(Duration::from_millis(200)).await;
        tracker.set("alien");
        sleep(Duration::from_secs(2)).await;

        assert!(!settled.has_changed().unwrap());
        assert_eq!(tracker.settled(), "alien");
    }

    #[tokio::test(start_paused = true)]
    async fn test_clearing_text_publishes_empty() {
        let tracker = DebouncedInput::spawn(INTERVAL);
        let mut settled = tracker.subscribe();

        tracker.set("heat");
        settled.changed().await.unwrap();
        tracker.set("");
        settled.changed().await.unwrap();

        assert_eq!(*settled.borrow(), "");
    }
}
