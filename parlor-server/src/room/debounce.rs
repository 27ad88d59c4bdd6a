//! Single-slot debounce timer
//!
//! Holds at most one pending task. Scheduling again cancels the pending one
//! and restarts the delay, so a burst of triggers runs the task once, `delay`
//! after the last trigger.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;

#[derive(Debug, Default)]
pub struct DebounceSlot {
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl DebounceSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` after `delay`, replacing any pending task
    ///
    /// Only the wait is cancellable. Once the delay elapses the task is
    /// spawned on its own and runs to completion even if the slot is
    /// rescheduled while it is running.
    pub fn schedule<F>(&self, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(task);
        });

        let previous = self
            .pending
            .lock()
            .expect("debounce slot lock")
            .replace(handle);

        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Whether a task is still waiting for its delay to elapse
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .expect("debounce slot lock")
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for DebounceSlot {
    fn drop(&mut self) {
        if let Ok(pending) = self.pending.get_mut()
            && let Some(handle) = pending.take()
        {
            handle.abort();
        }
    }
}
