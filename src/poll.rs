//! Fixed-interval refresh loops.
//!
//! A screen that polls implements [`Refresh`] and is moved into a
//! [`Poller`] task. Snapshots are published on a `watch` channel; the loop
//! stops when the handle is stopped or dropped. There is no backoff and no
//! deduplication: a failed refresh publishes nothing and the next tick
//! tries again.

use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

/// Something that can reload its state from the remote services
#[async_trait]
pub trait Refresh: Send + 'static {
    /// Snapshot published after every successful refresh
    type Output: Clone + Send + Sync + 'static;

    /// Reload; `None` means the refresh failed or was skipped
    async fn refresh(&mut self) -> Option<Self::Output>;
}

/// Spawns refresh loops
pub struct Poller;

impl Poller {
    /// Refresh immediately, then every `period`
    pub fn spawn<R: Refresh>(mut source: R, period: Duration) -> PollHandle<R::Output> {
        let (tx, rx) = watch::channel(None);

        let task = tokio::spawn(async move {
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if tx.is_closed() {
                    log::debug!("poller has no subscribers left, stopping");
                    break;
                }
                if let Some(snapshot) = source.refresh().await {
                    tx.send_replace(Some(snapshot));
                }
            }
        });

        PollHandle { rx, task }
    }
}

/// Handle to a running refresh loop
pub struct PollHandle<T> {
    rx: watch::Receiver<Option<T>>,
    task: JoinHandle<()>,
}

impl<T: Clone> PollHandle<T> {
    /// The most recent snapshot
    pub fn latest(&self) -> Option<T> {
        self.rx.borrow().clone()
    }

    /// Wait for the next snapshot
    pub async fn changed(&mut self) -> Option<T> {
        self.rx.changed().await.ok()?;
        self.rx.borrow_and_update().clone()
    }

    /// Stop the loop
    pub fn stop(self) {
        self.task.abort();
    }
}

impl<T> Drop for PollHandle<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}
