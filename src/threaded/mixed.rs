use std::sync::Arc;

use crossbeam_channel::Sender;
use tracing::debug;

use super::lifecycle::DetachedHandle;
use super::report::{Role, WorkerReport};
use super::unit::{Operands, SelfCheckingUnit};
use crate::error::{Error, Result};
use crate::matrix::slots::RowSlots;

pub const STRATEGY: &str = "mixed";

/// Half detached, half joined.
///
/// Workers `0..workers / 2` are detached: they are started and never waited
/// on here. The rest are joined before this returns. Every worker times and
/// verifies its own rows and sends a [`WorkerReport`]; detached reports may
/// arrive at any later point, including after this function has returned.
///
/// The returned handle covers the detached half only. The joined half's rows
/// are already in `handle.slots()` when this returns.
pub fn multiply_mixed(
    operands: &Operands,
    workers: usize,
    reports: &Sender<WorkerReport>,
) -> Result<DetachedHandle> {
    let slots = Arc::new(RowSlots::new(operands.size(), workers));
    let handle = DetachedHandle::new(Arc::clone(&slots));
    let detached = workers / 2;

    let unit = |worker: usize, role: Role| SelfCheckingUnit {
        strategy: STRATEGY,
        worker,
        role,
        operands: operands.clone(),
        slots: Arc::clone(&slots),
        reports: reports.clone(),
    };

    for worker in 0..detached {
        // Dropping the join handle detaches the thread.
        drop(unit(worker, Role::Detached).spawn(Some(handle.guard()))?);
        debug!(worker, "spawned detached worker");
    }

    let joined = (detached..workers)
        .map(|worker| Ok((worker, unit(worker, Role::Joined).spawn(None)?)))
        .collect::<Result<Vec<_>>>()?;

    for (worker, thread) in joined {
        thread.join().map_err(|_| Error::WorkerPanicked(worker))?;
        debug!(worker, "joined worker");
    }

    Ok(handle)
}
