//! Completion tracking for detached workers.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::matrix::dense::Matrix;
use crate::matrix::slots::RowSlots;

#[derive(Debug, Default)]
struct Countdown {
    remaining: Mutex<usize>,
    done: Condvar,
}

impl Countdown {
    fn lock(&self) -> MutexGuard<'_, usize> {
        // The counter is a plain integer, so a poisoned lock is still usable.
        self.remaining.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Held by one detached worker; releases its slot in the countdown when
/// dropped, whether the worker returned or panicked.
#[derive(Debug)]
pub struct CompletionGuard {
    countdown: Arc<Countdown>,
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        let mut remaining = self.countdown.lock();
        *remaining = remaining.saturating_sub(1);
        if *remaining == 0 {
            self.countdown.done.notify_all();
        }
    }
}

/// Handle on a group of detached workers.
///
/// Spawning returns immediately; the caller is free to ignore this handle.
/// Keeping it lets shutdown wait for the group instead of relying on the
/// process staying alive long enough. The handle also shares ownership of
/// the group's [`RowSlots`], which are released once the handle and every
/// worker are gone.
#[derive(Debug, Clone)]
pub struct DetachedHandle {
    countdown: Arc<Countdown>,
    slots: Arc<RowSlots>,
}

impl DetachedHandle {
    pub(crate) fn new(slots: Arc<RowSlots>) -> Self {
        Self {
            countdown: Arc::new(Countdown::default()),
            slots,
        }
    }

    /// Registers one more outstanding worker.
    pub(crate) fn guard(&self) -> CompletionGuard {
        *self.countdown.lock() += 1;
        CompletionGuard {
            countdown: Arc::clone(&self.countdown),
        }
    }

    /// Detached workers still running.
    pub fn outstanding(&self) -> usize {
        *self.countdown.lock()
    }

    pub fn is_finished(&self) -> bool {
        self.outstanding() == 0
    }

    /// Blocks until every detached worker has exited.
    pub fn wait(&self) {
        let remaining = self.countdown.lock();
        let _remaining = self
            .countdown
            .done
            .wait_while(remaining, |r| *r > 0)
            .unwrap_or_else(PoisonError::into_inner);
    }

    /// Like [`wait`](Self::wait) but gives up after `timeout`. Returns
    /// whether every worker finished.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let remaining = self.countdown.lock();
        let (remaining, _) = self
            .countdown
            .done
            .wait_timeout_while(remaining, timeout, |r| *r > 0)
            .unwrap_or_else(PoisonError::into_inner);
        *remaining == 0
    }

    pub fn slots(&self) -> &Arc<RowSlots> {
        &self.slots
    }

    /// The full result, once every row range has been published.
    pub fn result(&self) -> Option<Matrix> {
        self.slots.to_matrix()
    }
}
