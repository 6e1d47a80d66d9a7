//! Cancellable delayed actions.
//!
//! Each call to [`Debouncer::schedule`] replaces whatever is still waiting, so a
//! burst of triggers runs only the last action once the burst goes quiet. An
//! action that has started is never interrupted.

use std::future::Future;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::debug;

pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

#[derive(Debug)]
struct Pending {
    cancel: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<Pending>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `action` after the delay, cancelling any action still waiting.
    pub fn schedule<F>(&mut self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();

        let delay = self.delay;
        let (cancel, cancelled) = oneshot::channel();
        let task = tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = cancelled => return,
            }
            action.await;
        });

        self.pending = Some(Pending { cancel, task });
    }

    /// Drop the waiting action, if any. Returns true if one was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                let cancelled = pending.cancel.send(()).is_ok();
                if cancelled {
                    debug!("Cancelled pending debounced action");
                }
                cancelled
            }
            None => false,
        }
    }

    /// True while the last scheduled action is waiting or running.
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| !pending.task.is_finished())
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_DEBOUNCE_MS))
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
