use std::sync::Arc;

use crossbeam_channel::Sender;
use tracing::debug;

use super::lifecycle::DetachedHandle;
use super::report::{Role, WorkerReport};
use super::unit::{Operands, SelfCheckingUnit};
use crate::error::Result;
use crate::matrix::slots::RowSlots;

pub const STRATEGY: &str = "detached";

/// Starts `workers` detached threads and returns straight away.
///
/// Nothing here waits on the workers. Each one verifies its own rows and
/// reports when it is done. The returned handle is the only way to know
/// they have all finished; the result must not be read as complete before
/// [`DetachedHandle::wait`] (or a successful `wait_timeout`) says so.
pub fn spawn_detached(
    operands: &Operands,
    workers: usize,
    reports: &Sender<WorkerReport>,
) -> Result<DetachedHandle> {
    let slots = Arc::new(RowSlots::new(operands.size(), workers));
    let handle = DetachedHandle::new(Arc::clone(&slots));

    for worker in 0..workers {
        let unit = SelfCheckingUnit {
            strategy: STRATEGY,
            worker,
            role: Role::Detached,
            operands: operands.clone(),
            slots: Arc::clone(&slots),
            reports: reports.clone(),
        };
        drop(unit.spawn(Some(handle.guard()))?);
        debug!(worker, "spawned detached worker");
    }

    Ok(handle)
}
