//! Transaction stop state and the self-re-arming deadline timer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

use crate::error::ClientError;

/// Shared terminal state of one transaction.
///
/// The read loop and the timeout governor both race to stop the
/// transaction; [`stop`](Self::stop) lets exactly one of them win. The
/// recorded outcome never changes after the first writer.
pub(crate) struct TxState {
    stopped: AtomicBool,
    timed_out: AtomicBool,
    outcome: Mutex<Option<ClientError>>,
    abort: Notify,
}

impl TxState {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            stopped: AtomicBool::new(false),
            timed_out: AtomicBool::new(false),
            outcome: Mutex::new(None),
            abort: Notify::new(),
        })
    }

    pub(crate) fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    pub(crate) fn timed_out(&self) -> bool {
        self.timed_out.load(Ordering::SeqCst)
    }

    pub(crate) fn outcome(&self) -> Option<ClientError> {
        *self.outcome.lock().expect("outcome mutex poisoned")
    }

    /// Stop the transaction. The first writer wins and records the
    /// outcome; later calls change nothing. Returns whether this call won.
    pub(crate) fn stop(&self, outcome: Option<ClientError>, timed_out: bool) -> bool {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return false;
        }
        if timed_out {
            self.timed_out.store(true, Ordering::SeqCst);
        }
        *self.outcome.lock().expect("outcome mutex poisoned") = outcome;
        // notify_one stores a permit, so a stop between two read-loop
        // iterations is still observed by the single waiter.
        self.abort.notify_one();
        true
    }

    /// Resolves once the transaction has been stopped.
    pub(crate) async fn aborted(&self) {
        self.abort.notified().await;
    }
}

/// The self-re-arming deadline timer for one transaction.
///
/// Armed once per read phase; wakes at the deadline, checks the clock
/// rather than trusting the wakeup (a level check, tolerant of early
/// wakes), and on true expiry stops the transaction as timed out.
pub(crate) struct TimeoutGovernor {
    task: JoinHandle<()>,
}

impl TimeoutGovernor {
    pub(crate) fn arm(timeout: Duration, tx: Arc<TxState>) -> Self {
        let deadline = Instant::now() + timeout;
        let task = tokio::spawn(async move {
            loop {
                sleep_until(deadline).await;
                if tx.is_stopped() {
                    return;
                }
                if Instant::now() >= deadline {
                    tracing::warn!(timeout_secs = timeout.as_secs(), "transaction timed out");
                    tx.stop(Some(ClientError::SocketRead), true);
                    return;
                }
                // Woken before the deadline: back to sleep.
            }
        });
        Self { task }
    }

    /// Cancel the timer. A no-op if it already fired.
    pub(crate) fn disarm(self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_stop_wins_and_later_stops_are_noops() {
        let tx = TxState::new();

        assert!(tx.stop(Some(ClientError::Http), false));
        assert!(!tx.stop(Some(ClientError::SocketRead), true));

        assert!(tx.is_stopped());
        assert_eq!(tx.outcome(), Some(ClientError::Http));
        assert!(!tx.timed_out());
    }

    #[test]
    fn successful_stop_records_no_outcome() {
        let tx = TxState::new();
        assert!(tx.stop(None, false));
        assert_eq!(tx.outcome(), None);
    }

    #[tokio::test]
    async fn governor_trips_after_the_deadline() {
        let tx = TxState::new();
        let governor = TimeoutGovernor::arm(Duration::from_millis(20), tx.clone());

        tx.aborted().await;

        assert!(tx.is_stopped());
        assert!(tx.timed_out());
        assert_eq!(tx.outcome(), Some(ClientError::SocketRead));
        governor.disarm();
    }

    #[tokio::test]
    async fn stopped_transaction_silences_the_governor() {
        let tx = TxState::new();
        let governor = TimeoutGovernor::arm(Duration::from_millis(20), tx.clone());

        assert!(tx.stop(None, false));
        tokio::time::sleep(Duration::from_millis(60)).await;

        assert!(!tx.timed_out());
        assert_eq!(tx.outcome(), None);
        governor.disarm();
    }
}
