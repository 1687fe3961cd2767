use std::sync::Arc;

use super::dense::Matrix;
use super::slots::RowSlots;
use super::verify::{Verdict, verify};

/// Inputs and per-strategy results of one run.
///
/// A and B are shared read-only by every strategy. Each strategy writes only
/// its own result; the mixed and detached results are [`RowSlots`] because
/// their writers may still be running after the pool call returns.
#[derive(Debug)]
pub struct MatrixStore {
    pub a: Arc<Matrix>,
    pub b: Arc<Matrix>,
    pub baseline: Option<Arc<Matrix>>,
    pub processes: Option<Matrix>,
    pub joined: Option<Matrix>,
    pub mixed: Option<Arc<RowSlots>>,
    pub detached: Option<Arc<RowSlots>>,
}

impl MatrixStore {
    /// # Panics
    ///
    /// Panics if A and B differ in size.
    pub fn new(a: Matrix, b: Matrix) -> Self {
        assert_eq!(a.size(), b.size(), "A and B must have the same size");
        Self {
            a: Arc::new(a),
            b: Arc::new(b),
            baseline: None,
            processes: None,
            joined: None,
            mixed: None,
            detached: None,
        }
    }

    pub fn size(&self) -> usize {
        self.a.size()
    }

    /// Verdict of every strategy result against the baseline, in run order.
    ///
    /// `None` marks a strategy that aborted, or whose detached workers have
    /// not published every row yet. Empty until the baseline is set.
    pub fn verdicts(&self) -> Vec<(&'static str, Option<Verdict>)> {
        let Some(baseline) = self.baseline.as_deref() else {
            return Vec::new();
        };
        let check = |m: &Matrix| verify(m, baseline);
        let check_slots = |slots: &Arc<RowSlots>| slots.to_matrix().map(|m| check(&m));

        vec![
            ("processes", self.processes.as_ref().map(check)),
            ("joined", self.joined.as_ref().map(check)),
            ("mixed", self.mixed.as_ref().and_then(check_slots)),
            ("detached", self.detached.as_ref().and_then(check_slots)),
        ]
    }
}
