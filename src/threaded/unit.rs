use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crossbeam_channel::Sender;
use tracing::{debug, warn};

use super::lifecycle::CompletionGuard;
use super::report::{Role, WorkerReport};
use crate::error::{Error, Result};
use crate::matrix::dense::Matrix;
use crate::matrix::naive_ijk::multiply_range;
use crate::matrix::slots::RowSlots;
use crate::matrix::verify::{Verdict, verify_rows};

/// Read-only data shared by every self-checking worker: both inputs and
/// the sequential baseline they verify against.
#[derive(Clone, Debug)]
pub struct Operands {
    pub a: Arc<Matrix>,
    pub b: Arc<Matrix>,
    pub baseline: Arc<Matrix>,
}

impl Operands {
    pub fn new(a: Arc<Matrix>, b: Arc<Matrix>, baseline: Arc<Matrix>) -> Self {
        Self { a, b, baseline }
    }

    pub fn size(&self) -> usize {
        self.a.size()
    }
}

/// One worker that times itself, checks its own rows and reports.
pub(crate) struct SelfCheckingUnit {
    pub strategy: &'static str,
    pub worker: usize,
    pub role: Role,
    pub operands: Operands,
    pub slots: Arc<RowSlots>,
    pub reports: Sender<WorkerReport>,
}

impl SelfCheckingUnit {
    /// Starts the unit on its own named thread. `guard` is held until the
    /// thread exits.
    pub fn spawn(self, guard: Option<CompletionGuard>) -> Result<JoinHandle<()>> {
        let worker = self.worker;
        thread::Builder::new()
            .name(format!("{}-{}-{}", self.strategy, self.role, worker))
            .spawn(move || {
                let _guard = guard;
                self.run();
            })
            .map_err(|source| Error::ThreadSpawn { worker, source })
    }

    fn run(self) {
        let range = self.slots.range(self.worker);

        let start = Instant::now();
        let cells = multiply_range(&self.operands.a, &self.operands.b, range);
        let elapsed = start.elapsed();

        if !self.slots.fill(self.worker, cells) {
            warn!(worker = self.worker, %range, "row slot already filled");
        }
        let verdict = match self.slots.rows(self.worker) {
            Some(rows) => verify_rows(rows, &self.operands.baseline, range),
            None => Verdict::Divergent,
        };

        debug!(
            strategy = self.strategy,
            worker = self.worker,
            role = %self.role,
            %range,
            ?elapsed,
            "worker finished"
        );

        let report = WorkerReport {
            strategy: self.strategy,
            worker: self.worker,
            role: self.role,
            elapsed,
            verdict,
        };
        if self.reports.send(report).is_err() {
            debug!(worker = self.worker, "report receiver gone, dropping report");
        }
    }
}
