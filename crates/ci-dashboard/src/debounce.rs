//! Cancellable delayed tasks.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

struct Pending {
  handle: JoinHandle<()>,
  started: Arc<AtomicBool>,
}

/// Runs only the last task of a burst.
///
/// Each [`schedule`](Debouncer::schedule) waits out the delay before running
/// its future, and cancels the previous task if that one is still waiting.
/// A task that already started is left to finish.
pub struct Debouncer {
  delay: Duration,
  pending: Mutex<Option<Pending>>,
}

impl Debouncer {
  pub fn new(delay: Duration) -> Self {
    Self { delay, pending: Mutex::new(None) }
  }

  /// Must be called from within a tokio runtime.
  pub fn schedule<F>(&self, task: F)
  where
    F: Future<Output = ()> + Send + 'static,
  {
    let delay = self.delay;
    let started = Arc::new(AtomicBool::new(false));
    let flag = started.clone();

    let handle = tokio::spawn(async move {
      tokio::time::sleep(delay).await;
      flag.store(true, Ordering::SeqCst);
      task.await;
    });

    let previous = self.lock().replace(Pending { handle, started });
    if let Some(previous) = previous {
      abort_if_waiting(previous);
    }
  }

  /// Drop the pending task, if it has not started yet.
  pub fn cancel(&self) {
    if let Some(previous) = self.lock().take() {
      abort_if_waiting(previous);
    }
  }

  /// Whether a scheduled task is still waiting out its delay
  pub fn is_pending(&self) -> bool {
    self
      .lock()
      .as_ref()
      .is_some_and(|p| !p.started.load(Ordering::SeqCst) && !p.handle.is_finished())
  }

  fn lock(&self) -> std::sync::MutexGuard<'_, Option<Pending>> {
    self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }
}

fn abort_if_waiting(pending: Pending) {
  if !pending.started.load(Ordering::SeqCst) {
    pending.handle.abort();
  }
}

impl Drop for Debouncer {
  fn drop(&mut self) {
    self.cancel();
  }
}
