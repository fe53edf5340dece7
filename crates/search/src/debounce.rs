//! `SearchDebouncer` — a two-state (idle/pending) timing policy.
//!
//! Every new input value restarts a fixed-delay timer and moves the
//! debouncer to *pending*; when the timer expires the latest value is
//! committed and the debouncer returns to *idle*. A value arriving before
//! expiry cancels the previous timer — last value wins, never the first.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::debug;

/// Delay before a pending value is committed.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(300);

/// Handle feeding input values into the debounce task.
///
/// Committed values arrive on the receiver returned by [`SearchDebouncer::new`];
/// the caller dispatches one search per committed value, so at most one
/// search is ever in flight per debouncer from the caller's perspective.
pub struct SearchDebouncer {
    input: mpsc::UnboundedSender<String>,
}

impl SearchDebouncer {
    /// Spawn the debounce task with the given delay.
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();
        let (commit_tx, commit_rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            // idle: wait for the first value of a burst
            while let Some(mut latest) = input_rx.recv().await {
                // pending: each newer value restarts the timer
                loop {
                    let timer = tokio::time::sleep(delay);
                    tokio::pin!(timer);
                    tokio::select! {
                        newer = input_rx.recv() => match newer {
                            Some(value) => {
                                debug!(%value, "timer restarted by newer input");
                                latest = value;
                            }
                            // Input handle dropped mid-burst; nothing more
                            // to commit.
                            None => return,
                        },
                        _ = &mut timer => {
                            if commit_tx.send(latest).is_err() {
                                return;
                            }
                            break;
                        }
                    }
                }
            }
        });

        (Self { input: input_tx }, commit_rx)
    }

    /// Spawn with [`DEFAULT_DELAY`].
    pub fn with_default_delay() -> (Self, mpsc::UnboundedReceiver<String>) {
        Self::new(DEFAULT_DELAY)
    }

    /// Feed a new input value, (re)starting the pending timer.
    pub fn input(&self, value: impl Into<String>) {
        // A send failure means the task is gone; keystrokes after teardown
        // are silently dropped.
        let _ = self.input.send(value.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::error::TryRecvError;
    use tokio::task::yield_now;
    use tokio::time::advance;

    const DELAY: Duration = Duration::from_millis(300);

    #[tokio::test(start_paused = true)]
    async fn commits_after_the_delay_not_before() {
        let (debouncer, mut committed) = SearchDebouncer::new(DELAY);

        debouncer.input("a");
        yield_now().await;

        advance(Duration::from_millis(299)).await;
        yield_now().await;
        assert!(matches!(committed.try_recv(), Err(TryRecvError::Empty)));

        advance(Duration::from_millis(2)).await;
        assert_eq!(committed.recv().await.as_deref(), Some("a"));
    }

    #[tokio::test(start_paused = true)]
    async fn last_value_wins_within_a_burst() {
        let (debouncer, mut committed) = SearchDebouncer::new(DELAY);

        for (value, pause) in [("a", 100), ("ab", 100), ("abc", 0)] {
            debouncer.input(value);
            yield_now().await;
            advance(Duration::from_millis(pause)).await;
        }

        // Only the latest value commits, one delay after the last keystroke.
        advance(Duration::from_millis(301)).await;
        assert_eq!(committed.recv().await.as_deref(), Some("abc"));
        yield_now().await;
        assert!(matches!(committed.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test(start_paused = true)]
    async fn separate_bursts_commit_separately() {
        let (debouncer, mut committed) = SearchDebouncer::new(DELAY);

        debouncer.input("first");
        yield_now().await;
        advance(Duration::from_millis(301)).await;
        assert_eq!(committed.recv().await.as_deref(), Some("first"));

        debouncer.input("second");
        yield_now().await;
        advance(Duration::from_millis(301)).await;
        assert_eq!(committed.recv().await.as_deref(), Some("second"));
    }

    #[tokio::test(start_paused = true)]
    async fn keystroke_restarts_the_timer() {
        let (debouncer, mut committed) = SearchDebouncer::new(DELAY);

        debouncer.input("a");
        yield_now().await;
        advance(Duration::from_millis(250)).await;

        // 250ms in, a new keystroke: the old timer must not fire at 300ms.
        debouncer.input("ab");
        yield_now().await;
        advance(Duration::from_millis(250)).await;
        yield_now().await;
        assert!(matches!(committed.try_recv(), Err(TryRecvError::Empty)));

        advance(Duration::from_millis(51)).await;
        assert_eq!(committed.recv().await.as_deref(), Some("ab"));
    }
}
